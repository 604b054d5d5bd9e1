use std::path::Path;

pub struct FormatTool;

impl FormatTool {
    // 格式化文件大小 (MB, 两位小数)
    pub fn format_size(size: u64) -> String {
        format!("{:.2} MB", size as f64 / 1024.0 / 1024.0)
    }
}

/// 从 `segment<N>.ts` 形式的文件名中提取分片序号
pub fn segment_index_of(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix("segment")?
        .strip_suffix(".ts")?
        .parse()
        .ok()
}

pub fn segment_file_name(index: usize) -> String {
    format!("segment{}.ts", index)
}
