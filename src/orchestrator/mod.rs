use std::path::PathBuf;
use std::sync::Arc;

use errors::{RunError, TaskError};
use models::{ProducedFile, RunResult, TaskFailure};
use tracing::{debug, error, info, warn};
use workspace::WorkspaceGuard;

use crate::config::Config;
use crate::decrypt::cipher::{Aes128CbcCipher, SegmentCipher};
use crate::decrypt::{SegmentDecryptor, load_key};
use crate::discovery::TaskDiscovery;
use crate::discovery::models::Task;
use crate::downloader::SegmentDownloader;
use crate::downloader::core::{HttpFetcher, SegmentFetcher};
use crate::downloader::models::Segment;
use crate::parser::PlaylistParser;
use crate::post_process::Concatenator;
use crate::post_process::merger::{FfmpegMuxer, Muxer};
use crate::{log_complete, log_error, log_step};

pub mod errors;
pub mod models;
pub mod workspace;

/// 依次处理每个任务：解析 -> 下载 -> 解密 -> 合并。
///
/// 单个任务失败只记录，不影响后续任务；工作目录在任何情况下都会被删除，
/// 包括 Ctrl-C 和 future 被丢弃。
pub struct Orchestrator {
    config: Config,
    parser: PlaylistParser,
    downloader: SegmentDownloader,
    decryptor: SegmentDecryptor,
    concatenator: Concatenator,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Self, RunError> {
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
        let muxer = Arc::new(FfmpegMuxer::new(config.ffmpeg_path.clone()));
        Ok(Self::with_components(config, fetcher, Arc::new(Aes128CbcCipher), muxer))
    }

    pub fn with_components(
        config: Config,
        fetcher: Arc<dyn SegmentFetcher>,
        cipher: Arc<dyn SegmentCipher>,
        muxer: Arc<dyn Muxer>,
    ) -> Self {
        Self {
            parser: PlaylistParser::new(config.segment_marker.clone()),
            downloader: SegmentDownloader::new(fetcher, config.max_workers, config.show_progress),
            decryptor: SegmentDecryptor::new(cipher),
            concatenator: Concatenator::new(muxer),
            config,
        }
    }

    pub async fn run(&self) -> Result<RunResult, RunError> {
        let workspace = WorkspaceGuard::new(&self.config.workspace_dir);

        tokio::select! {
            result = self.run_tasks(&workspace) => result,
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("收到 Ctrl+C，停止处理");
                Err(RunError::Interrupted)
            }
        }
    }

    async fn run_tasks(&self, workspace: &WorkspaceGuard) -> Result<RunResult, RunError> {
        let input_dir = &self.config.input_dir;
        let input_exists = tokio::fs::try_exists(input_dir)
            .await
            .map_err(|source| RunError::InputAccess {
                path: input_dir.clone(),
                source,
            })?;
        if !input_exists {
            return Err(RunError::InputNotFound(input_dir.clone()));
        }

        workspace.reset().await?;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let tasks = TaskDiscovery::new(&self.config)?.find_tasks().await?;

        let mut result = RunResult::default();
        for task in &tasks {
            log_step!("处理任务 {}", task);
            match self.process_task(task).await {
                Ok(output) => {
                    log_complete!("已生成 {}", output.path.display());
                    result.outputs.push(output);
                }
                Err(e) => {
                    log_error!("处理 {} 失败: {}", task, e);
                    result.failures.push(TaskFailure {
                        task: task.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(result)
    }

    /// 处理单个任务，返回生成的文件
    pub async fn process_task(&self, task: &Task) -> Result<ProducedFile, TaskError> {
        let key = load_key(&task.key).await?;
        let playlist = self.parser.parse(&task.playlist).await?;
        let segments = Segment::for_task(task, &playlist.segments);
        debug!("任务 {} IV={} 分片数={}", task, playlist.iv_hex(), segments.len());

        self.downloader.download(&segments, &task.downloaded_dir).await?;

        info!("解密分片...");
        self.decryptor
            .decrypt_all(&segments, &task.decrypted_dir, &key, &playlist.iv)
            .await?;

        info!("生成 {:?}", task.output_file);
        let output = self
            .concatenator
            .concatenate(&task.decrypted_dir, &task.output_file)
            .await?;

        produced_file(task, output).await
    }

    /// 将运行结果写成 JSON
    pub async fn write_report(&self, result: &RunResult) {
        let Some(report) = &self.config.report else {
            return;
        };
        let json = match serde_json::to_vec_pretty(result) {
            Ok(json) => json,
            Err(e) => {
                error!("序列化运行报告失败: {}", e);
                return;
            }
        };
        match tokio::fs::write(report, json).await {
            Ok(()) => info!("运行报告已写入 {:?}", report),
            Err(e) => error!("写入运行报告失败 {:?}: {}", report, e),
        }
    }
}

async fn produced_file(task: &Task, output: PathBuf) -> Result<ProducedFile, TaskError> {
    let metadata = tokio::fs::metadata(&output)
        .await
        .map_err(|source| TaskError::Output {
            path: output.clone(),
            source,
        })?;
    let path = tokio::fs::canonicalize(&output).await.unwrap_or(output);
    Ok(ProducedFile {
        task: task.to_string(),
        path,
        size: metadata.len(),
    })
}
