//! ImgBB image hosting client
//!
//! Uploads screenshots through the ImgBB v1 API and returns the public URL.

use super::publisher::{ImageHost, UploadOutcome};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::path::Path;

/// Default ImgBB upload endpoint
pub const IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

/// ImgBB API client
pub struct ImgBbHost {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl ImgBbHost {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(IMGBB_UPLOAD_URL, api_key)
    }

    /// Client posting to a custom endpoint
    pub fn with_endpoint(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn try_upload(&self, path: &Path) -> anyhow::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let params = [
            ("key", self.api_key.clone()),
            ("image", STANDARD.encode(&bytes)),
            ("name", name),
        ];

        let resp = self.client.post(&self.endpoint).form(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("ImgBB returned {}: {}", status, body);
        }

        let parsed: UploadResponse = resp.json().await?;
        Ok(parsed.data.url)
    }
}

#[async_trait]
impl ImageHost for ImgBbHost {
    async fn upload(&self, path: &Path) -> UploadOutcome {
        match self.try_upload(path).await {
            Ok(url) => {
                log::debug!("Uploaded {} to {}", path.display(), url);
                UploadOutcome::Uploaded(url)
            }
            Err(e) => UploadOutcome::Failed(e.to_string()),
        }
    }
}
