pub mod archive;
pub mod artifact;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provision;
pub mod reporter;
pub mod sanitize;
pub mod secrets;

pub use archive::{Extractor, UnpackError};
pub use artifact::{ArtifactClient, DownloadError, ProbeError, ResolvedArtifact};
pub use config::{load_config, load_config_from_str, FetcherConfig, FileConfig};
pub use error::ConfigError;
pub use pipeline::{Fetcher, PipelineError, PipelineWarning, Session};
pub use provision::{ProvisionError, Provisioner};
pub use reporter::{NullReporter, RecordingReporter, Reporter};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
