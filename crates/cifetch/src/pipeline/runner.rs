use std::sync::Arc;

use tracing::{debug, info_span, warn, Instrument};

use crate::archive::Extractor;
use crate::artifact::ArtifactClient;
use crate::config::FetcherConfig;
use crate::provision::Provisioner;
use crate::reporter::Reporter;

use super::error::{PipelineError, PipelineWarning};
use super::session::Session;

/// The build fetcher: five strictly sequential stages sharing one `Session`.
///
/// resolve → clear → fetch → unpack → provision
///
/// Stages 1–4 fail fast and halt the run. Stage 5 failure is reported and
/// recorded as a warning; the run still resolves with the output path. There
/// are no retries, no rollback of earlier stages, and no internal timeouts —
/// a hung probe or download stalls the run indefinitely.
pub struct Fetcher {
    config: Arc<FetcherConfig>,
    extractor: Extractor,
    provisioner: Provisioner,
}

impl Fetcher {
    /// Production constructor — yarn provisioning, zip extraction.
    pub fn from_config(config: Arc<FetcherConfig>) -> Self {
        Self {
            config,
            extractor: Extractor::new(),
            provisioner: Provisioner::yarn(),
        }
    }

    /// Constructor with injected sub-components (alternate package manager,
    /// stub commands in tests).
    pub fn with_components(
        config: Arc<FetcherConfig>,
        extractor: Extractor,
        provisioner: Provisioner,
    ) -> Self {
        Self {
            config,
            extractor,
            provisioner,
        }
    }

    /// Run the full pipeline. On success returns the configured output path,
    /// now holding the unpacked artifact.
    pub async fn run(
        &self,
        session: &mut Session,
        reporter: &dyn Reporter,
    ) -> Result<std::path::PathBuf, PipelineError> {
        // Hard gate, checked before any I/O: both repo and token must be set.
        let (repo, token) = match self.config.require_credentials() {
            Ok(pair) => pair,
            Err(e) => {
                reporter.write_error("no repo or token provided; not fetching build");
                return Err(e.into());
            }
        };

        let client = ArtifactClient::new(session.endpoint.clone(), token.clone());

        // Stage 1: Resolve
        self.step_resolve(&client, repo, session, reporter)
            .instrument(info_span!("resolve", repo = %repo))
            .await?;

        // Stage 2: Clear
        self.step_clear(session, reporter)
            .instrument(info_span!("clear"))
            .await?;

        // Stage 3: Fetch
        self.step_fetch(&client, session, reporter)
            .instrument(info_span!("fetch"))
            .await?;

        // Stage 4: Unpack
        {
            let _step = info_span!("unpack").entered();
            self.step_unpack(session, reporter)?;
        }

        // Stage 5: Provision — reported, never propagated
        self.step_provision(session, reporter)
            .instrument(info_span!("provision"))
            .await;

        Ok(session.output_path.clone())
    }

    async fn step_resolve(
        &self,
        client: &ArtifactClient,
        repo: &str,
        session: &mut Session,
        reporter: &dyn Reporter,
    ) -> Result<(), PipelineError> {
        reporter.write_line(&format!("domain     : {}", self.config.url));
        reporter.write_line(&format!("repository : {}", repo));
        reporter.write_line(&format!("branch     : {}", self.config.branch));
        reporter.write_line(&format!("job        : {}", self.config.job));

        let resolved = match client.probe().await {
            Ok(resolved) => resolved,
            Err(e) => {
                reporter.write_error("no build artifact found; aborting");
                return Err(e.into());
            }
        };

        reporter.write_line(&format!("found build artifact: {}", resolved.filename));
        if let Some(id) = &resolved.job_id {
            reporter.write_line(&format!("pipeline job id: {}", id));
        }

        session.resolved = Some(resolved);
        Ok(())
    }

    /// Recursively removes the output path. Absence is not an error; a plain
    /// file at the path is removed the same as a directory.
    async fn step_clear(
        &self,
        session: &Session,
        reporter: &dyn Reporter,
    ) -> Result<(), PipelineError> {
        let path = session.absolute_output_path();
        reporter.write_line(&format!("removing {}", session.output_path.display()));

        let result = match tokio::fs::metadata(&path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => Err(e),
            Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(&path).await,
            Ok(_) => tokio::fs::remove_file(&path).await,
        };

        result.map_err(|e| PipelineError::Clear { path, source: e })
    }

    async fn step_fetch(
        &self,
        client: &ArtifactClient,
        session: &mut Session,
        reporter: &dyn Reporter,
    ) -> Result<(), PipelineError> {
        let filename = session
            .resolved
            .as_ref()
            .expect("resolve stage completed")
            .filename
            .clone();

        reporter.write_line(&format!(
            "saving artifact to {}",
            session.work_dir.join(&filename).display()
        ));

        let archive = client.download(&filename, &session.work_dir).await?;
        session.archive = Some(archive);
        Ok(())
    }

    fn step_unpack(
        &self,
        session: &Session,
        reporter: &dyn Reporter,
    ) -> Result<(), PipelineError> {
        let archive = session.archive.as_ref().expect("fetch stage completed");

        self.extractor.extract(archive, &session.work_dir)?;

        let name = session
            .resolved
            .as_ref()
            .expect("resolve stage completed")
            .filename
            .clone();
        reporter.write_line(&format!("unpacked {}", name));
        debug!("unpacked {} into {}", name, session.work_dir.display());
        Ok(())
    }

    /// A broken dependency install must not block delivery of the unpacked
    /// artifact: the failure is reported and recorded, the run succeeds.
    async fn step_provision(&self, session: &mut Session, reporter: &dyn Reporter) {
        let output = session.absolute_output_path();

        match self.provisioner.install(&output).await {
            Ok(()) => {
                reporter.write_line(&format!(
                    "installed dependencies via {}",
                    self.provisioner.command_line()
                ));
            }
            Err(e) => {
                warn!("provisioning failed: {}", e);
                reporter.write_error(&format!(
                    "unable to install dependencies via {}: {}",
                    self.provisioner.command_line(),
                    e
                ));
                session.warnings.push(PipelineWarning::ProvisionFailed {
                    error: e.to_string(),
                });
            }
        }
    }
}
