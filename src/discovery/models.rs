use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 点分数字版本号，按各段整数比较（1.9 < 1.10）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    label: String,
    parts: Vec<u64>,
}

impl Version {
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for Version {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: s.to_string(),
            parts,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// 一个 播放列表/密钥 文件对及其工作目录
#[derive(Debug, Clone)]
pub struct Task {
    pub base_name: String,
    pub version: Version,
    pub output_file: PathBuf,
    pub playlist: PathBuf,
    pub key: PathBuf,
    pub downloaded_dir: PathBuf,
    pub decrypted_dir: PathBuf,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base_name, self.version)
    }
}
