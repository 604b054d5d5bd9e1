use std::path::Path;
use std::sync::Arc;

use self::cipher::{KEY_LEN, SegmentCipher};
use self::error::DecryptError;
use tracing::{debug, info, warn};

use crate::downloader::models::Segment;

pub mod cipher;
pub mod error;

/// 读取密钥文件（原始二进制）。
///
/// 与 IV 同样处理：不足 16 字节时末尾补零，为空或超过 16 字节时报错。
pub async fn load_key(path: &Path) -> Result<[u8; KEY_LEN], DecryptError> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() || bytes.len() > KEY_LEN {
        return Err(DecryptError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        });
    }
    if bytes.len() < KEY_LEN {
        warn!("密钥长度不足 {} 字节，末尾补零: {:?}", KEY_LEN, path);
    }

    let mut key = [0u8; KEY_LEN];
    key[..bytes.len()].copy_from_slice(&bytes);
    debug!("已读取密钥 {:?}: {}", path, hex::encode(key));
    Ok(key)
}

/// 按序号顺序逐个解密分片
pub struct SegmentDecryptor {
    cipher: Arc<dyn SegmentCipher>,
}

impl SegmentDecryptor {
    pub fn new(cipher: Arc<dyn SegmentCipher>) -> Self {
        Self { cipher }
    }

    pub async fn decrypt_all(
        &self,
        segments: &[Segment],
        decrypted_dir: &Path,
        key: &[u8; KEY_LEN],
        iv: &[u8; KEY_LEN],
    ) -> Result<(), DecryptError> {
        let mut ordered: Vec<&Segment> = segments.iter().collect();
        ordered.sort_by_key(|s| s.index);
        validate_contiguous(&ordered)?;

        // 先确认所有分片都在，避免产生残缺的输出
        for segment in &ordered {
            if !tokio::fs::try_exists(&segment.downloaded_path).await? {
                return Err(DecryptError::MissingSegment {
                    index: segment.index,
                    path: segment.downloaded_path.clone(),
                });
            }
        }

        tokio::fs::create_dir_all(decrypted_dir).await?;
        info!("开始解密 {} 个分片", ordered.len());

        for segment in ordered {
            let data = tokio::fs::read(&segment.downloaded_path).await?;
            let plain = self
                .cipher
                .decrypt(data, key, iv)
                .map_err(|reason| DecryptError::Cipher {
                    index: segment.index,
                    reason,
                })?;
            tokio::fs::write(&segment.decrypted_path, plain).await?;
            debug!("分片 {} 解密完成", segment.index);
        }

        Ok(())
    }
}

// 序号必须从 1 开始连续
fn validate_contiguous(ordered: &[&Segment]) -> Result<(), DecryptError> {
    for (i, segment) in ordered.iter().enumerate() {
        if segment.index != i + 1 {
            return Err(DecryptError::NonContiguous {
                position: i + 1,
                found: segment.index,
            });
        }
    }
    Ok(())
}
