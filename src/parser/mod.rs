use std::path::Path;

use errors::ParseError;
use models::{IV_LEN, PlaylistInfo, SegmentRef};
use tracing::{debug, warn};

pub mod errors;
pub mod models;

const KEY_TAG: &str = "#EXT-X-KEY";

/// 最小子集的 m3u8 解析器：只关心 `#EXT-X-KEY` 上的 IV 和分片行
pub struct PlaylistParser {
    segment_marker: String,
}

impl PlaylistParser {
    pub fn new(segment_marker: impl Into<String>) -> Self {
        Self {
            segment_marker: segment_marker.into(),
        }
    }

    // 解析入口
    pub async fn parse(&self, playlist_path: &Path) -> Result<PlaylistInfo, ParseError> {
        let content = tokio::fs::read_to_string(playlist_path).await?;
        self.parse_str(&content, playlist_path)
    }

    pub fn parse_str(&self, content: &str, playlist_path: &Path) -> Result<PlaylistInfo, ParseError> {
        let mut iv: Option<String> = None;
        let mut segments = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with(KEY_TAG) {
                if let Some(value) = find_iv_attribute(line) {
                    if let Some(prev) = &iv {
                        if prev != &value {
                            // 只支持整个播放列表共用一个 IV，后出现的覆盖前面的
                            warn!("播放列表声明了多个不同的 IV，使用最后一个: {}", value);
                        }
                    }
                    iv = Some(value);
                }
            } else if line.contains(&self.segment_marker) {
                segments.push(SegmentRef {
                    index: segments.len() + 1,
                    url: line.to_string(),
                });
            }
        }

        let iv = iv
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ParseError::MissingIv(playlist_path.to_path_buf()))?;
        let iv = decode_iv(&iv)?;

        if segments.is_empty() {
            return Err(ParseError::NoSegments(playlist_path.to_path_buf()));
        }

        debug!(
            "解析播放列表 {:?}: IV={}, 分片数={}",
            playlist_path,
            hex::encode(iv),
            segments.len()
        );

        Ok(PlaylistInfo { iv, segments })
    }
}

/// 从 `#EXT-X-KEY:METHOD=AES-128,URI="...",IV=0x...` 中取出去掉引号和 0x 前缀的 IV
fn find_iv_attribute(line: &str) -> Option<String> {
    let (_, attributes) = line.split_once(':')?;
    split_attributes(attributes).into_iter().find_map(|attr| {
        let (name, value) = attr.split_once('=')?;
        if name.trim() != "IV" {
            return None;
        }
        let value = value.trim().trim_matches('"');
        let value = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        Some(value.to_string())
    })
}

// 按逗号切分属性列表，引号内的逗号不切分
fn split_attributes(attributes: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in attributes.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&attributes[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&attributes[start..]);
    parts
}

fn decode_iv(value: &str) -> Result<[u8; IV_LEN], ParseError> {
    let bytes = hex::decode(value).map_err(|e| ParseError::InvalidIv(format!("{}: {}", value, e)))?;
    if bytes.len() > IV_LEN {
        return Err(ParseError::InvalidIv(format!(
            "{}: 长度 {} 字节，超过 {} 字节",
            value,
            bytes.len(),
            IV_LEN
        )));
    }
    if bytes.len() < IV_LEN {
        warn!("IV 长度不足 {} 字节，末尾补零: {}", IV_LEN, value);
    }
    let mut iv = [0u8; IV_LEN];
    iv[..bytes.len()].copy_from_slice(&bytes);
    Ok(iv)
}
