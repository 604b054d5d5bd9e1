use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, default_ffmpeg_path};

/// 加密分片流批量处理工具
#[derive(Parser, Debug)]
#[command(name = "batchdecrypt")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "批量下载、解密并合并加密的分片流", long_about = None)]
pub struct Cli {
    /// 输入目录 (包含 播放列表/密钥 文件对)
    #[arg(long, value_name = "DIR")]
    #[arg(default_value = "inputfiles")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input_dir: PathBuf,

    /// 临时工作目录 (运行结束后删除)
    #[arg(long, value_name = "DIR")]
    #[arg(default_value = "processing")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub workspace_dir: PathBuf,

    /// 输出文件保存目录
    #[arg(long, value_name = "DIR")]
    #[arg(default_value = ".")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    #[arg(long, value_name = "并发数", default_value_t = 50)]
    pub max_workers: usize,

    /// 单个分片请求超时 (秒)
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub timeout: u64,

    #[arg(long, default_value = "m3u8")]
    pub manifest_ext: String,
    #[arg(long, default_value = "bin")]
    pub key_ext: String,
    #[arg(long, default_value = "mp4")]
    pub output_ext: String,

    /// 分片行标记
    #[arg(long, value_name = "MARKER", default_value = ".ts?")]
    pub segment_marker: String,

    /// ffmpeg 可执行文件路径 (默认读取 FFMPEG_PATH 环境变量)
    #[arg(long, value_name = "PATH")]
    #[arg(value_hint = clap::ValueHint::ExecutablePath)]
    pub ffmpeg: Option<String>,

    /// 将运行结果以 JSON 写入指定文件
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    #[arg(long, help = "关闭下载进度条")]
    pub no_progress: bool,

    #[arg(short, long, help = "输出调试日志")]
    pub verbose: bool,
}

impl From<Cli> for Config {
    fn from(args: Cli) -> Self {
        Config {
            input_dir: args.input_dir,
            workspace_dir: args.workspace_dir,
            output_dir: args.output_dir,
            max_workers: args.max_workers.max(1),
            fetch_timeout: Duration::from_secs(args.timeout),
            manifest_ext: args.manifest_ext,
            key_ext: args.key_ext,
            output_ext: args.output_ext,
            segment_marker: args.segment_marker,
            ffmpeg_path: args.ffmpeg.unwrap_or_else(default_ffmpeg_path),
            show_progress: !args.no_progress,
            report: args.report,
        }
    }
}
