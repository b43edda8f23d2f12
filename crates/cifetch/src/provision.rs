use std::path::Path;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
}

/// Runs the package-manager install command inside the unpacked output path.
///
/// The program and arguments are injectable so callers can swap `yarn` for
/// `npm` (or tests for a stub).
pub struct Provisioner {
    program: String,
    args: Vec<String>,
}

impl Provisioner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn yarn() -> Self {
        Self::new("yarn", vec!["install".to_string()])
    }

    /// The full command line, for progress and error messages.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    pub async fn install(&self, dir: &Path) -> Result<(), ProvisionError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| ProvisionError::Spawn {
                command: self.command_line(),
                source: e,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ProvisionError::CommandFailed {
                command: self.command_line(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Default for Provisioner {
    fn default() -> Self {
        Self::yarn()
    }
}
