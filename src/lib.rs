pub mod cli;
pub mod common;
pub mod config;
pub mod decrypt;
pub mod discovery;
pub mod downloader;
pub mod orchestrator;
pub mod parser;
pub mod post_process;

pub use config::Config;
pub use orchestrator::Orchestrator;
pub use orchestrator::models::RunResult;
