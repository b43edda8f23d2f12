use std::path::PathBuf;

use crate::artifact::ResolvedArtifact;
use crate::config::FetcherConfig;

use super::error::PipelineWarning;

/// The single stateful value threaded through the pipeline stages.
pub struct Session {
    /// Derived artifact endpoint for this run.
    pub endpoint: String,

    /// Destination directory, replaced by the unpacked artifact.
    pub output_path: PathBuf,

    /// Directory the archive is downloaded to and unpacked in.
    pub work_dir: PathBuf,

    /// Resolve stage result — guaranteed Some after the resolve stage.
    pub resolved: Option<ResolvedArtifact>,

    /// Fetch stage result: the downloaded archive on disk — guaranteed Some
    /// after the fetch stage.
    pub archive: Option<PathBuf>,

    /// Non-fatal warnings (provisioning failures).
    pub warnings: Vec<PipelineWarning>,
}

impl Session {
    pub fn new(config: &FetcherConfig) -> Self {
        Self {
            endpoint: config.artifact_endpoint(),
            output_path: config.output_path.clone(),
            work_dir: config.work_dir.clone(),
            resolved: None,
            archive: None,
            warnings: Vec::new(),
        }
    }

    /// The output path resolved against the working directory.
    pub fn absolute_output_path(&self) -> PathBuf {
        if self.output_path.is_absolute() {
            self.output_path.clone()
        } else {
            self.work_dir.join(&self.output_path)
        }
    }
}
