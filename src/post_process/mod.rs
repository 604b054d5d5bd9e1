pub mod merger;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use merger::{MergeError, Muxer};
use tracing::{debug, info};

use crate::common::utils::segment_index_of;

pub const FILE_LIST_NAME: &str = "filelist.txt";

/// 把解密后的分片按序号写入清单，再交给 muxer 合并
pub struct Concatenator {
    muxer: Arc<dyn Muxer>,
}

impl Concatenator {
    pub fn new(muxer: Arc<dyn Muxer>) -> Self {
        Self { muxer }
    }

    pub async fn concatenate(&self, decrypted_dir: &Path, output_path: &Path) -> Result<PathBuf, MergeError> {
        let segments = collect_segments(decrypted_dir).await?;
        if segments.is_empty() {
            return Err(MergeError::NoSegments(decrypted_dir.to_path_buf()));
        }

        let list_file = decrypted_dir.join(FILE_LIST_NAME);
        tokio::fs::write(&list_file, build_file_list(&segments)).await?;
        debug!("已写入分片清单: {:?} ({} 个分片)", list_file, segments.len());

        info!("开始合并 -> {:?}", output_path);
        self.muxer.concat(&list_file, output_path).await?;
        Ok(output_path.to_path_buf())
    }
}

/// 列出目录中的 `segment<N>.ts`，按 N 的数值排序（目录遍历顺序不可靠）
pub async fn collect_segments(dir: &Path) -> Result<Vec<(usize, PathBuf)>, MergeError> {
    let mut segments = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(index) = segment_index_of(&path) {
            segments.push((index, path));
        }
    }
    segments.sort_by_key(|(index, _)| *index);
    Ok(segments)
}

/// ffmpeg concat 清单格式，路径相对清单文件所在目录
pub fn build_file_list(segments: &[(usize, PathBuf)]) -> String {
    segments
        .iter()
        .filter_map(|(_, path)| path.file_name().and_then(|n| n.to_str()))
        .map(|name| format!("file '{}'\n", name))
        .collect()
}
