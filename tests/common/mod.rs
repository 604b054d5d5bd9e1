#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aes::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use async_trait::async_trait;
use batchdecrypt::Config;
use batchdecrypt::downloader::core::SegmentFetcher;
use batchdecrypt::downloader::error::DownloadError;
use batchdecrypt::post_process::merger::{MergeError, Muxer};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

pub const KEY: [u8; 16] = *b"0123456789abcdef";
pub const IV: [u8; 16] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];

pub fn encrypt(plain: &[u8]) -> Vec<u8> {
    Aes128CbcEnc::new(&KEY.into(), &IV.into()).encrypt_padded_vec_mut::<Pkcs7>(plain)
}

/// 按 URL 返回预设内容的获取器，未登记的 URL 返回错误
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Vec<u8>>,
    pub attempts: Mutex<Vec<String>>,
    pub delivered: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeFetcher {
    pub fn insert(&mut self, url: impl Into<String>, body: Vec<u8>) {
        self.responses.insert(url.into(), body);
    }

    pub fn remove(&mut self, url: &str) {
        self.responses.remove(url);
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// 同时进行中的请求数的最大值
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SegmentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.attempts.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.responses.get(url) {
            Some(body) => {
                self.delivered.fetch_add(1, Ordering::SeqCst);
                Ok(body.clone())
            }
            None => Err(DownloadError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// 永远不返回的获取器，用来模拟卡住的下载
pub struct HangingFetcher;

#[async_trait]
impl SegmentFetcher for HangingFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, DownloadError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

/// 按清单顺序直接拼接字节，代替 ffmpeg
pub struct ConcatMuxer;

#[async_trait]
impl Muxer for ConcatMuxer {
    async fn concat(&self, list_file: &Path, output_path: &Path) -> Result<(), MergeError> {
        let base = list_file.parent().unwrap_or(Path::new("."));
        let list = tokio::fs::read_to_string(list_file).await?;
        let mut output = Vec::new();
        for line in list.lines() {
            let name = line
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .ok_or_else(|| MergeError::Ffmpeg(format!("无法解析清单行: {}", line)))?;
            output.extend(tokio::fs::read(base.join(name)).await?);
        }
        tokio::fs::write(output_path, output).await?;
        Ok(())
    }
}

/// 总是失败的 muxer
pub struct FailingMuxer;

#[async_trait]
impl Muxer for FailingMuxer {
    async fn concat(&self, _list_file: &Path, _output_path: &Path) -> Result<(), MergeError> {
        Err(MergeError::Ffmpeg("exit status 1".to_string()))
    }
}

pub struct TestDirs {
    pub root: tempfile::TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("input")).unwrap();
        Self { root }
    }

    pub fn input(&self) -> PathBuf {
        self.root.path().join("input")
    }

    pub fn workspace(&self) -> PathBuf {
        self.root.path().join("processing")
    }

    pub fn output(&self) -> PathBuf {
        self.root.path().join("output")
    }

    pub fn config(&self) -> Config {
        Config {
            input_dir: self.input(),
            workspace_dir: self.workspace(),
            output_dir: self.output(),
            max_workers: 2,
            show_progress: false,
            ..Config::default()
        }
    }
}

pub fn segment_url(name: &str, index: usize) -> String {
    format!("https://cdn.test/{}/seg{}.ts?token=abc", name.replace(' ', "_"), index)
}

pub fn manifest(iv: Option<&str>, urls: &[String]) -> String {
    let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n");
    match iv {
        Some(iv) => text.push_str(&format!(
            "#EXT-X-KEY:METHOD=AES-128,URI=\"https://keys.test/k?id=1,2\",IV={}\n",
            iv
        )),
        None => text.push_str("#EXT-X-KEY:METHOD=AES-128,URI=\"https://keys.test/k\"\n"),
    }
    for url in urls {
        text.push_str("#EXTINF:10.0,\n");
        text.push_str(url);
        text.push('\n');
    }
    text.push_str("#EXT-X-ENDLIST\n");
    text
}

pub fn plain_segment(name: &str, index: usize) -> Vec<u8> {
    format!("<{} segment {} payload {}>", name, index, "x".repeat(index * 7)).into_bytes()
}

/// 在输入目录写入一个任务（播放列表 + 密钥），并把加密后的分片登记到获取器。
/// 返回按序拼接的明文。
pub fn add_task(
    dirs: &TestDirs,
    fetcher: &mut FakeFetcher,
    base: &str,
    version: &str,
    segments: usize,
    with_iv: bool,
) -> Vec<u8> {
    let name = format!("{}{}", base, version);
    let urls: Vec<String> = (1..=segments).map(|i| segment_url(&name, i)).collect();
    let iv_hex = format!("0x{}", hex::encode(IV));
    let iv = with_iv.then_some(iv_hex.as_str());

    std::fs::write(dirs.input().join(format!("{}.m3u8", name)), manifest(iv, &urls)).unwrap();
    std::fs::write(dirs.input().join(format!("{}.bin", name)), KEY).unwrap();

    let mut expected = Vec::new();
    for (i, url) in urls.iter().enumerate() {
        let plain = plain_segment(&name, i + 1);
        fetcher.insert(url.clone(), encrypt(&plain));
        expected.extend(plain);
    }
    expected
}
