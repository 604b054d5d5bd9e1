use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use self::core::SegmentFetcher;
use self::error::DownloadError;
use self::models::{Segment, SegmentStatus};

pub mod core;
pub mod error;
pub mod models;

/// 并发下载一个任务的全部分片，并发数由信号量限制
pub struct SegmentDownloader {
    fetcher: Arc<dyn SegmentFetcher>,
    max_workers: usize,
    show_progress: bool,
}

impl SegmentDownloader {
    pub fn new(fetcher: Arc<dyn SegmentFetcher>, max_workers: usize, show_progress: bool) -> Self {
        Self {
            fetcher,
            max_workers: max_workers.max(1),
            show_progress,
        }
    }

    /// 下载全部分片；任意分片缺失时在所有下载结束后返回错误
    pub async fn download(&self, segments: &[Segment], download_dir: &Path) -> Result<(), DownloadError> {
        let statuses = self.download_all(segments, download_dir).await?;

        let missing: Vec<usize> = segments
            .iter()
            .zip(&statuses)
            .filter(|(_, status)| **status != SegmentStatus::Completed)
            .map(|(segment, _)| segment.index)
            .collect();

        if !missing.is_empty() {
            return Err(DownloadError::IncompleteSegments {
                missing,
                total: segments.len(),
            });
        }

        info!("全部 {} 个分片下载完成", segments.len());
        Ok(())
    }

    /// 尽力下载：单个分片失败只记录日志，不会取消其它分片。
    /// 返回值与 `segments` 一一对应。
    pub async fn download_all(
        &self,
        segments: &[Segment],
        download_dir: &Path,
    ) -> Result<Vec<SegmentStatus>, DownloadError> {
        tokio::fs::create_dir_all(download_dir).await?;

        info!("开始下载 {} 个分片 (并发数: {})", segments.len(), self.max_workers);
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let pb = self.progress_bar(segments.len() as u64);

        let handles: Vec<_> = segments
            .iter()
            .cloned()
            .map(|segment| {
                let semaphore = Arc::clone(&semaphore);
                let fetcher = Arc::clone(&self.fetcher);
                let pb = pb.clone();
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| DownloadError::SegmentFailed {
                            index: segment.index,
                            reason: e.to_string(),
                        })?;
                    let result = Self::download_one(fetcher.as_ref(), &segment).await;
                    pb.inc(1);
                    result
                })
            })
            .collect();
        let _abort = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

        let results = join_all(handles).await;
        pb.finish_and_clear();

        let statuses = segments
            .iter()
            .zip(results)
            .map(|(segment, result)| match result {
                Ok(Ok(())) => SegmentStatus::Completed,
                Ok(Err(e)) => {
                    warn!("分片 {} 下载失败: {}", segment.index, e);
                    SegmentStatus::Failed(e.to_string())
                }
                Err(e) => {
                    warn!("分片 {} 下载任务异常退出: {}", segment.index, e);
                    SegmentStatus::Failed(e.to_string())
                }
            })
            .collect();

        Ok(statuses)
    }

    async fn download_one(fetcher: &dyn SegmentFetcher, segment: &Segment) -> Result<(), DownloadError> {
        let bytes = fetcher.fetch(&segment.url).await?;
        if let Err(e) = tokio::fs::write(&segment.downloaded_path, &bytes).await {
            // 不保留写了一半的文件
            let _ = tokio::fs::remove_file(&segment.downloaded_path).await;
            return Err(e.into());
        }
        debug!("分片 {} 已保存: {:?}", segment.index, segment.downloaded_path);
        Ok(())
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} 分片 ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

// 调用方放弃等待时取消仍在进行的分片下载
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}
