use std::path::PathBuf;

use thiserror::Error;

/// The closed set of ways a fetch run fails. Provisioning failures are not
/// here: they are warnings on the session, never pipeline failures.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::error::ConfigError),

    #[error("Build artifact not found: {0}")]
    ArtifactNotFound(#[from] crate::artifact::ProbeError),

    #[error("Artifact download failed: {0}")]
    Download(#[from] crate::artifact::DownloadError),

    #[error("Failed to clear output path '{path}': {source}")]
    Clear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive extraction failed: {0}")]
    Unpack(#[from] crate::archive::UnpackError),
}

#[derive(Debug, Clone)]
pub enum PipelineWarning {
    ProvisionFailed { error: String },
}
