use std::path::PathBuf;
use thiserror::Error;

use crate::decrypt::error::DecryptError;
use crate::discovery::DiscoveryError;
use crate::downloader::error::DownloadError;
use crate::parser::errors::ParseError;
use crate::post_process::merger::MergeError;

/// 只影响单个任务的错误
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("解析失败: {0}")]
    Parse(#[from] ParseError),
    #[error("下载失败: {0}")]
    Download(#[from] DownloadError),
    #[error("解密失败: {0}")]
    Decrypt(#[from] DecryptError),
    #[error("合并失败: {0}")]
    Merge(#[from] MergeError),
    #[error("输出文件不可用 {path:?}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// 中止整个运行的错误
#[derive(Debug, Error)]
pub enum RunError {
    #[error("输入目录不存在: {0:?}")]
    InputNotFound(PathBuf),
    #[error("无法访问输入目录 {path:?}: {source}")]
    InputAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("工作目录操作失败: {0}")]
    Workspace(#[from] std::io::Error),
    #[error("创建 HTTP 客户端失败: {0}")]
    Client(#[from] DownloadError),
    #[error("运行被中断")]
    Interrupted,
}
