use super::resolver::{Screenshot, DEFAULT_SCREENSHOT_DIR};
use crate::utils::config::CiConfig;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Value older upload helpers returned in place of a URL when the upload failed
pub const UPLOAD_FAILED_SENTINEL: &str = "Screenshot upload failed";

/// Result of handing a screenshot to an image host
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Uploaded(String),
    Failed(String),
}

/// Third-party image hosting
///
/// Implementations must not return transport errors; every failure is reported
/// as `UploadOutcome::Failed`.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, path: &Path) -> UploadOutcome;
}

/// Where a published screenshot can be viewed
#[derive(Debug, Clone, PartialEq)]
pub enum PublishedScreenshot {
    /// Archived artifact of the current CI build
    CiArtifact(String),
    /// Public URL returned by the image host
    Hosted(String),
    /// Relative path into the local screenshot directory
    LocalFallback(String),
}

impl PublishedScreenshot {
    pub fn url(&self) -> &str {
        match self {
            Self::CiArtifact(url) | Self::Hosted(url) | Self::LocalFallback(url) => url,
        }
    }
}

impl fmt::Display for PublishedScreenshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// Turns resolved screenshots into URLs a TestRail reader can open
pub struct ScreenshotPublisher {
    ci: Option<CiConfig>,
    host: Option<Box<dyn ImageHost>>,
}

impl ScreenshotPublisher {
    pub fn new(ci: Option<CiConfig>, host: Option<Box<dyn ImageHost>>) -> Self {
        Self { ci, host }
    }

    /// Publisher that never touches the network
    pub fn offline() -> Self {
        Self::new(None, None)
    }

    /// Best-effort publish; always yields a URL
    pub async fn publish(&self, screenshot: &Screenshot) -> PublishedScreenshot {
        if let Some(url) = self
            .ci
            .as_ref()
            .and_then(|ci| ci.artifact_url(&screenshot.name))
        {
            return PublishedScreenshot::CiArtifact(url);
        }

        let Some(host) = &self.host else {
            log::debug!("No image host configured, using local path for {}", screenshot.name);
            return local_fallback(screenshot);
        };

        match host.upload(&screenshot.path).await {
            UploadOutcome::Uploaded(url) if !url.is_empty() && url != UPLOAD_FAILED_SENTINEL => {
                PublishedScreenshot::Hosted(url)
            }
            UploadOutcome::Uploaded(url) => {
                log::warn!(
                    "Image host returned unusable URL '{}' for {}",
                    url,
                    screenshot.name
                );
                local_fallback(screenshot)
            }
            UploadOutcome::Failed(reason) => {
                log::warn!("Screenshot upload failed for {}: {}", screenshot.name, reason);
                local_fallback(screenshot)
            }
        }
    }
}

fn local_fallback(screenshot: &Screenshot) -> PublishedScreenshot {
    PublishedScreenshot::LocalFallback(format!(
        "./{}/{}",
        DEFAULT_SCREENSHOT_DIR, screenshot.name
    ))
}
