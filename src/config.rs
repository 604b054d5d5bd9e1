use std::path::PathBuf;
use std::time::Duration;

/// 一次批处理运行的全部配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 存放 播放列表/密钥 文件对的输入目录
    pub input_dir: PathBuf,
    /// 临时工作目录，运行结束后整体删除
    pub workspace_dir: PathBuf,
    /// 合并后的输出文件目录
    pub output_dir: PathBuf,
    /// 单个任务内分片下载的最大并发数
    pub max_workers: usize,
    /// 单个分片请求的超时时间
    pub fetch_timeout: Duration,
    pub manifest_ext: String,
    pub key_ext: String,
    pub output_ext: String,
    /// 播放列表中用于识别分片行的标记
    pub segment_marker: String,
    pub ffmpeg_path: String,
    pub show_progress: bool,
    /// JSON 运行报告的输出路径（可选）
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputfiles"),
            workspace_dir: PathBuf::from("processing"),
            output_dir: PathBuf::from("."),
            max_workers: 50,
            fetch_timeout: Duration::from_secs(60),
            manifest_ext: "m3u8".to_string(),
            key_ext: "bin".to_string(),
            output_ext: "mp4".to_string(),
            segment_marker: ".ts?".to_string(),
            ffmpeg_path: default_ffmpeg_path(),
            show_progress: true,
            report: None,
        }
    }
}

// 获取 ffmpeg 路径（支持环境变量）
pub fn default_ffmpeg_path() -> String {
    std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string())
}
