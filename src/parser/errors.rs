use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("读取播放列表失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("播放列表中未找到 IV: {0}")]
    MissingIv(PathBuf),
    #[error("无效的 IV: {0}")]
    InvalidIv(String),
    #[error("播放列表中没有分片: {0}")]
    NoSegments(PathBuf),
}
