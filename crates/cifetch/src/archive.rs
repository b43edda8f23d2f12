use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnpackError {
    #[error("failed to open archive '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to unpack archive '{path}': {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Unpacks a downloaded artifact archive in place, preserving the archive's
/// internal layout. The output directory is whatever the archive contains;
/// the extractor does not impose one.
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<(), UnpackError> {
        let file = std::fs::File::open(archive).map_err(|e| UnpackError::Open {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip = zip::ZipArchive::new(file).map_err(|e| UnpackError::Extract {
            path: archive.to_path_buf(),
            source: e,
        })?;

        zip.extract(dest).map_err(|e| UnpackError::Extract {
            path: archive.to_path_buf(),
            source: e,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
