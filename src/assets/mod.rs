//! Image availability checks: the settle step before exports and the
//! profile picture fallback.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;

pub const PROFILE_PLACEHOLDER: &str = "assets/images/profile-placeholder.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    Loaded,
    Failed,
}

/// Resolves once an image source has either loaded or failed.
#[async_trait(?Send)]
pub trait ImageProbe {
    async fn settle(&self, src: &str) -> ImageLoad;
}

/// Fetches remote images over HTTP and decodes local ones relative to `base_dir`.
#[derive(Debug, Clone)]
pub struct SourceImageProbe {
    client: Client,
    base_dir: PathBuf,
}

impl SourceImageProbe {
    pub fn new(client: Client, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            base_dir: base_dir.into(),
        }
    }

    async fn probe_remote(&self, url: &str) -> ImageLoad {
        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "image request rejected");
                return ImageLoad::Failed;
            }
            Err(err) => {
                tracing::debug!(url, %err, "image request failed");
                return ImageLoad::Failed;
            }
        };
        match response.bytes().await {
            Ok(bytes) if image::guess_format(&bytes).is_ok() => ImageLoad::Loaded,
            Ok(_) => ImageLoad::Failed,
            Err(err) => {
                tracing::debug!(url, %err, "image body unreadable");
                ImageLoad::Failed
            }
        }
    }

    fn probe_local(&self, path: &Path) -> ImageLoad {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        match image::image_dimensions(&path) {
            Ok(_) => ImageLoad::Loaded,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "local image unreadable");
                ImageLoad::Failed
            }
        }
    }
}

#[async_trait(?Send)]
impl ImageProbe for SourceImageProbe {
    async fn settle(&self, src: &str) -> ImageLoad {
        let src = src.trim();
        if src.is_empty() {
            return ImageLoad::Failed;
        }
        if src.starts_with("data:") {
            return ImageLoad::Loaded;
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            return self.probe_remote(src).await;
        }
        let local = src.strip_prefix("file://").unwrap_or(src);
        self.probe_local(Path::new(local))
    }
}
