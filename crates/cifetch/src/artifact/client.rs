use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use log::debug;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use super::parse;
use crate::sanitize;

/// Header GitLab expects the private access token on.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Outcome of the metadata probe: the artifact's real filename plus the
/// numeric job id recovered from the post-redirect URL (observability only).
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub filename: String,
    pub job_id: Option<String>,
}

/// Probe failures. "No artifact produced" and "could not reach the service"
/// deliberately share one error kind; the variants only shape the message.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no attachment in response from {url} (status {status})")]
    NoAttachment { url: String, status: u16 },

    #[error("could not reach artifact endpoint {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write artifact to '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP client for one artifact endpoint.
pub struct ArtifactClient {
    http: Client,
    endpoint: String,
    token: SecretString,
}

impl ArtifactClient {
    pub fn new(endpoint: impl Into<String>, token: SecretString) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Metadata-only probe: HEAD the endpoint and read the artifact filename
    /// out of the `content-disposition` attachment header. No body transfer.
    pub async fn probe(&self) -> Result<ResolvedArtifact, ProbeError> {
        let response = self
            .http
            .head(&self.endpoint)
            .header(TOKEN_HEADER, self.token.expose_secret())
            .send()
            .await
            .map_err(|e| ProbeError::Transport {
                url: sanitize::redact_url(&self.endpoint),
                source: e,
            })?;

        let status = response.status();
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse::attachment_filename);

        match filename {
            Some(filename) => {
                let final_url = response.url().as_str();
                let job_id = parse::job_id(final_url);
                debug!(
                    "resolved artifact '{}' from {}",
                    filename,
                    sanitize::redact_url(final_url)
                );
                Ok(ResolvedArtifact { filename, job_id })
            }
            None => Err(ProbeError::NoAttachment {
                url: sanitize::redact_url(&self.endpoint),
                status: status.as_u16(),
            }),
        }
    }

    /// Full GET, streaming the body to `dest_dir/<filename>`. The file is
    /// flushed and closed before this returns. On failure a partial file may
    /// remain on disk.
    pub async fn download(&self, filename: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
        let transport = |e: reqwest::Error| DownloadError::Transport {
            url: sanitize::redact_url(&self.endpoint),
            source: e,
        };

        let response = self
            .http
            .get(&self.endpoint)
            .header(TOKEN_HEADER, self.token.expose_secret())
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let path = dest_dir.join(filename);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| DownloadError::WriteFile {
                path: path.clone(),
                source: e,
            })?;

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::WriteFile {
                    path: path.clone(),
                    source: e,
                })?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| DownloadError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        drop(file);

        debug!("downloaded {} bytes to {}", written, path.display());
        Ok(path)
    }
}
