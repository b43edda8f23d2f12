use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ConfigError;

/// Resolved settings for one fetch run.
///
/// `token` and `repo` are optional here so a config can be assembled from
/// partial sources (flags, file, environment); the pipeline refuses to run
/// without them.
#[derive(Clone)]
pub struct FetcherConfig {
    /// CI service root, e.g. `https://gitlab.com`.
    pub url: String,
    /// Private access token, sent as a `PRIVATE-TOKEN` header on every request.
    pub token: Option<SecretString>,
    /// Repository identifier (`namespace/project`), embedded verbatim in the artifact URL path.
    pub repo: Option<String>,
    /// Branch name for artifact lookup.
    pub branch: String,
    /// CI job name whose latest artifact is fetched.
    pub job: String,
    /// Local output directory, replaced by the unpacked artifact.
    pub output_path: PathBuf,
    /// Directory the archive is downloaded to and unpacked in.
    pub work_dir: PathBuf,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            token: None,
            repo: None,
            branch: "master".to_string(),
            job: "build".to_string(),
            output_path: PathBuf::from("dist"),
            work_dir: PathBuf::from("."),
        }
    }
}

impl FetcherConfig {
    /// URL of the latest successful artifact for the configured repo/branch/job.
    pub fn artifact_endpoint(&self) -> String {
        format!(
            "{}/{}/-/jobs/artifacts/{}/download?job={}",
            self.url.trim_end_matches('/'),
            self.repo.as_deref().unwrap_or(""),
            self.branch,
            self.job
        )
    }

    /// The pre-I/O gate: both `repo` and `token` must be present and non-empty.
    pub fn require_credentials(&self) -> Result<(&str, &SecretString), ConfigError> {
        let repo = match self.repo.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => return Err(ConfigError::MissingOption { name: "repo" }),
        };
        let token = match &self.token {
            Some(t) if !t.expose_secret().is_empty() => t,
            _ => return Err(ConfigError::MissingOption { name: "token" }),
        };
        Ok((repo, token))
    }

    /// Applies non-empty values from a config file over this config.
    pub fn merge_file(&mut self, file: FileConfig) {
        if let Some(url) = file.url {
            self.url = url;
        }
        if let Some(token) = file.token {
            self.token = Some(SecretString::from(token));
        }
        if let Some(repo) = file.repo {
            self.repo = Some(repo);
        }
        if let Some(branch) = file.branch {
            self.branch = branch;
        }
        if let Some(job) = file.job {
            self.job = job;
        }
        if let Some(path) = file.path {
            self.output_path = PathBuf::from(path);
        }
        if let Some(work_dir) = file.work_dir {
            self.work_dir = PathBuf::from(work_dir);
        }
    }
}

/// On-disk config file shape. All fields optional; missing ones keep their
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub job: Option<String>,
    pub path: Option<String>,
    pub work_dir: Option<String>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<FileConfig, ConfigError> {
    let config: FileConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &FileConfig) -> Result<(), ConfigError> {
    if let Some(repo) = &config.repo {
        if !repo.contains('/') {
            return Err(ConfigError::Validation {
                message: format!("Repo '{}' must be of the form 'namespace/project'", repo),
            });
        }
    }

    for (name, value) in [
        ("url", &config.url),
        ("branch", &config.branch),
        ("job", &config.job),
        ("path", &config.path),
    ] {
        if let Some(v) = value {
            if v.is_empty() {
                return Err(ConfigError::Validation {
                    message: format!("Option '{}' must not be empty", name),
                });
            }
        }
    }

    Ok(())
}
