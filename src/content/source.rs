use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CV data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the raw CV document comes from.
#[async_trait(?Send)]
pub trait ContentSource {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<String, ContentError>;
}

#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: Client,
    url: String,
}

impl HttpContentSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait(?Send)]
impl ContentSource for HttpContentSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, ContentError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ContentError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[derive(Debug, Clone)]
pub struct FileContentSource {
    path: PathBuf,
}

impl FileContentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait(?Send)]
impl ContentSource for FileContentSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, ContentError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ContentError::Read {
                path: self.path.clone(),
                source,
            })
    }
}

pub fn content_source_for(client: &Client, location: &str) -> Box<dyn ContentSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpContentSource::new(client.clone(), location))
    } else {
        Box::new(FileContentSource::new(location))
    }
}
