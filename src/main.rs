use anyhow::Context;
use batchdecrypt::{Config, Orchestrator, cli};
use clap::Parser;
use colored::Colorize;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let args = cli::Cli::parse();

    // 初始化日志
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::from(args);
    info!("输入目录: {:?}", config.input_dir);

    let orchestrator = Orchestrator::new(config).context("初始化失败")?;
    let result = orchestrator.run().await.map_err(|e| {
        error!("运行中止: {}", e);
        e
    })?;

    result.print_summary();
    orchestrator.write_report(&result).await;

    if result.is_complete_success() {
        info!("{}", "全部任务完成！".green());
    }
    Ok(())
}
