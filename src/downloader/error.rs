use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP错误: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),
    #[error("无效的URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP 请求失败，状态码: {status}，URL: {url}")]
    HttpStatus { status: u16, url: String },
    #[error("分片 {index} 下载失败: {reason}")]
    SegmentFailed { index: usize, reason: String },
    #[error("分片下载不完整: {}/{total} 个失败，缺失序号 {missing:?}", .missing.len())]
    IncompleteSegments { missing: Vec<usize>, total: usize },
}
