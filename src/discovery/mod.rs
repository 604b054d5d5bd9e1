use std::path::{Path, PathBuf};

use models::{Task, Version};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod models;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("扫描输入目录失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("缺少密钥文件: {0}")]
    MissingKey(PathBuf),
    #[error("在 {0} 中没有找到有效的 播放列表/密钥 文件对")]
    NoTasks(PathBuf),
    #[error("无效的文件名规则: {0}")]
    Pattern(#[from] regex::Error),
}

pub struct TaskDiscovery<'a> {
    config: &'a Config,
    pattern: Regex,
}

impl<'a> TaskDiscovery<'a> {
    pub fn new(config: &'a Config) -> Result<Self, DiscoveryError> {
        // <base><major>.<minor>.<ext>
        let pattern = Regex::new(&format!(
            r"^(?P<base>.+?)(?P<version>\d+\.\d+)\.{}$",
            regex::escape(&config.manifest_ext)
        ))?;
        Ok(Self { config, pattern })
    }

    /// 扫描输入目录，按版本号升序返回所有任务
    pub async fn find_tasks(&self) -> Result<Vec<Task>, DiscoveryError> {
        let input_dir = &self.config.input_dir;
        let mut matched: Vec<(String, Version, PathBuf, PathBuf)> = Vec::new();

        let mut entries = tokio::fs::read_dir(input_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !self.has_manifest_ext(&path) {
                continue;
            }
            // 跟随符号链接
            match tokio::fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!("跳过无法读取的文件 {:?}: {}", path, e);
                    continue;
                }
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                warn!("跳过无法识别的文件名: {:?}", path);
                continue;
            };

            let Some((base_name, version)) = self.match_filename(filename) else {
                warn!("跳过不符合命名规则的文件: {}", filename);
                continue;
            };

            let key_path = input_dir.join(format!(
                "{}{}.{}",
                base_name,
                version.label(),
                self.config.key_ext
            ));
            if !tokio::fs::try_exists(&key_path).await? {
                return Err(DiscoveryError::MissingKey(key_path));
            }

            debug!("找到文件对: {} <-> {:?}", filename, key_path);
            matched.push((base_name, version, path, key_path));
        }

        // 按版本号各段整数排序，版本相同时按名称
        matched.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let tasks: Vec<Task> = matched
            .into_iter()
            .enumerate()
            .map(|(i, (base_name, version, playlist, key))| {
                self.build_task(i + 1, base_name, version, playlist, key)
            })
            .collect();

        if tasks.is_empty() {
            return Err(DiscoveryError::NoTasks(input_dir.clone()));
        }

        info!("共发现 {} 个任务", tasks.len());
        Ok(tasks)
    }

    fn has_manifest_ext(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.config.manifest_ext)
    }

    fn match_filename(&self, filename: &str) -> Option<(String, Version)> {
        let captures = self.pattern.captures(filename)?;
        let version = captures["version"].parse().ok()?;
        Some((captures["base"].to_string(), version))
    }

    fn build_task(
        &self,
        position: usize,
        base_name: String,
        version: Version,
        playlist: PathBuf,
        key: PathBuf,
    ) -> Task {
        let workspace = &self.config.workspace_dir;
        let output_file = self.config.output_dir.join(format!(
            "{} {}.{}",
            base_name,
            version.label(),
            self.config.output_ext
        ));
        Task {
            downloaded_dir: workspace.join(format!("downloaded_{}_{}", position, version)),
            decrypted_dir: workspace.join(format!("decrypted_{}_{}", position, version)),
            base_name,
            version,
            output_file,
            playlist,
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_orders_numerically() {
        let mut versions: Vec<Version> = ["1.10", "1.9", "10.0", "2.0"]
            .iter()
            .map(|v| v.parse().unwrap())
            .collect();
        versions.sort();
        let labels: Vec<&str> = versions.iter().map(Version::label).collect();
        assert_eq!(labels, vec!["1.9", "1.10", "2.0", "10.0"]);
    }

    #[test]
    fn test_match_filename() {
        let config = Config::default();
        let discovery = TaskDiscovery::new(&config).unwrap();

        let (base, version) = discovery.match_filename("Lecture Part1.2.m3u8").unwrap();
        assert_eq!(base, "Lecture Part");
        assert_eq!(version.label(), "1.2");

        // 版本号必须有前缀名称
        assert!(discovery.match_filename("1.2.m3u8").is_none());
        assert!(discovery.match_filename("playlist.m3u8").is_none());
        assert!(discovery.match_filename("Show1.2.bin").is_none());
    }
}
