use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("没有可合并的分片: {0:?}")]
    NoSegments(std::path::PathBuf),
    #[error("未检测到 ffmpeg: {0}")]
    FfmpegNotFound(String),
    #[error("ffmpeg 合并失败: {0}")]
    Ffmpeg(String),
}

/// 按清单顺序无损拼接媒体文件
#[async_trait]
pub trait Muxer: Send + Sync {
    async fn concat(&self, list_file: &Path, output_path: &Path) -> Result<(), MergeError>;
}

pub struct FfmpegMuxer {
    ffmpeg_cmd: String,
}

impl FfmpegMuxer {
    pub fn new(ffmpeg_cmd: impl Into<String>) -> Self {
        Self {
            ffmpeg_cmd: ffmpeg_cmd.into(),
        }
    }

    // 检查 ffmpeg 是否可用
    async fn check_available(&self) -> Result<(), MergeError> {
        debug!("检查系统中是否安装了 ffmpeg...");
        let ffmpeg_check = Command::new(&self.ffmpeg_cmd)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match ffmpeg_check {
            Ok(status) if status.success() => Ok(()),
            _ => {
                error!("❌ 未检测到 ffmpeg，请确保系统中已安装并配置了 ffmpeg 可执行路径。");
                error!("或者设置环境变量 FFMPEG_PATH 指向 ffmpeg 可执行文件路径");
                Err(MergeError::FfmpegNotFound(self.ffmpeg_cmd.clone()))
            }
        }
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn concat(&self, list_file: &Path, output_path: &Path) -> Result<(), MergeError> {
        self.check_available().await?;

        let output = Command::new(&self.ffmpeg_cmd)
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .args(["-f", "concat"])
            .args(["-safe", "0"])
            .arg("-i")
            .arg(list_file)
            .args(["-c", "copy"]) // 直接复制流，不重新编码
            .arg("-y")
            .arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let err_msg = String::from_utf8_lossy(&output.stderr);
            error!("❌ ffmpeg 合并失败，错误日志如下：\n{}", err_msg);
            return Err(MergeError::Ffmpeg(err_msg.to_string()));
        }

        info!("✅ 分片合并成功，输出文件: {:?}", output_path);
        Ok(())
    }
}
