use crate::catalog::PublicationCatalog;
use crate::config::{HTTP_TIMEOUT_SECS, USER_AGENT};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl LoadError {
    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Fetches a listing from an `http(s)://` URL or a local path.
pub struct Loader {
    client: Client,
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(LoadError::Client)?;
        Ok(Self { client })
    }

    pub async fn fetch_text(&self, source: &str) -> Result<String, LoadError> {
        if is_remote(source) {
            self.fetch_remote(source).await
        } else {
            tokio::fs::read_to_string(source)
                .await
                .map_err(|e| LoadError::Io {
                    path: PathBuf::from(source),
                    source: e,
                })
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<String, LoadError> {
        let transport = |e| LoadError::Transport {
            url: url.to_string(),
            source: e,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }

    /// Fetches `source`, parses it, and computes every derived view.
    pub async fn load(&self, source: &str) -> Result<PublicationCatalog, LoadError> {
        let text = self.fetch_text(source).await.inspect_err(|e| {
            error!(source, error = %e, "Error loading CSV file");
        })?;

        let catalog = PublicationCatalog::from_csv(&text);
        info!(
            source,
            bytes = text.len(),
            publications = catalog.len(),
            skipped = catalog.skipped_lines,
            "Loaded publication listing"
        );
        Ok(catalog)
    }
}

/// One-shot [`Loader::load`] with the default configuration.
pub async fn load_publications(source: &str) -> Result<PublicationCatalog, LoadError> {
    let loader = Loader::new(LoaderConfig::default()).inspect_err(|e| {
        error!(source, error = %e, "Error loading CSV file");
    })?;
    loader.load(source).await
}
