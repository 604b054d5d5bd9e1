use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use super::error::DownloadError;

/// 获取单个分片内容的能力
#[async_trait]
pub trait SegmentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// 基于 reqwest 的分片获取器，每个请求都带有独立的超时
#[derive(Clone)]
pub struct HttpFetcher {
    inner: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let inner = ClientBuilder::new().timeout(timeout).build()?;
        Ok(Self { inner })
    }

    // 检查响应状态
    fn check_response_status(response: &reqwest::Response, url: &str) -> Result<(), DownloadError> {
        let status = response.status();
        debug!("Response Status: {} ({})", status, url);

        match status {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::FORBIDDEN => {
                warn!("🚫 检测到 403 Forbidden 状态码，分片链接可能已过期: {}", url);
                Err(DownloadError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
            _ => {
                warn!("❌ 非成功状态码: {}", status);
                Err(DownloadError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl SegmentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let parsed = url::Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.inner.get(parsed).send().await?;
        Self::check_response_status(&response, url)?;

        let bytes = response.bytes().await?;
        debug!("分片下载完成: {} ({} 字节)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
