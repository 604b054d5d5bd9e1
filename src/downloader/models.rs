use std::path::PathBuf;

use crate::common::utils::segment_file_name;
use crate::discovery::models::Task;
use crate::parser::models::SegmentRef;

/// 属于某个任务的一个分片，序号决定下载和解密后的文件名
#[derive(Debug, Clone)]
pub struct Segment {
    pub index: usize,
    pub url: String,
    pub downloaded_path: PathBuf,
    pub decrypted_path: PathBuf,
}

impl Segment {
    pub fn new(task: &Task, segment: &SegmentRef) -> Self {
        let name = segment_file_name(segment.index);
        Self {
            index: segment.index,
            url: segment.url.clone(),
            downloaded_path: task.downloaded_dir.join(&name),
            decrypted_path: task.decrypted_dir.join(&name),
        }
    }

    pub fn for_task(task: &Task, segments: &[SegmentRef]) -> Vec<Self> {
        segments.iter().map(|s| Self::new(task, s)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentStatus {
    Completed,
    Failed(String),
}
