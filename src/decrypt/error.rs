use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("密钥长度错误: 需要 1 到 {expected} 字节，实际 {actual} 字节")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("分片 {index} 不存在: {path:?}")]
    MissingSegment { index: usize, path: PathBuf },
    #[error("分片序号不连续: 第 {position} 个分片的序号为 {found}")]
    NonContiguous { position: usize, found: usize },
    #[error("分片 {index} 解密失败: {reason}")]
    Cipher { index: usize, reason: String },
}
