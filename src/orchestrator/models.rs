use std::path::PathBuf;

use serde::Serialize;

use crate::common::logger::PrettyLogger;
use crate::common::utils::FormatTool;

#[derive(Debug, Clone, Serialize)]
pub struct ProducedFile {
    pub task: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskFailure {
    pub task: String,
    pub error: String,
}

/// 一次运行中所有任务的结果汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunResult {
    pub outputs: Vec<ProducedFile>,
    pub failures: Vec<TaskFailure>,
}

impl RunResult {
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn print_summary(&self) {
        PrettyLogger::separator();
        PrettyLogger::title("运行结果");

        if self.outputs.is_empty() {
            crate::log_warning!("没有生成任何文件");
        } else {
            crate::log_success!("成功生成 {} 个文件:", self.outputs.len());
            for output in &self.outputs {
                PrettyLogger::file_info(output.path.display().to_string(), FormatTool::format_size(output.size));
            }
        }

        if !self.failures.is_empty() {
            crate::log_error!("{} 个任务失败:", self.failures.len());
            for failure in &self.failures {
                crate::log_error!("{}: {}", failure.task, failure.error);
            }
        }
        PrettyLogger::separator();
    }
}
