//! Test harness for isolated pipeline runs: a temp working directory, zip
//! fixtures, and a canned loopback HTTP server standing in for the CI
//! service.

#![allow(dead_code)]

pub mod server;

pub use server::{StubResponse, StubServer};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::SecretString;
use tempfile::TempDir;

use cifetch::{Extractor, Fetcher, FetcherConfig, Provisioner};

/// The artifact endpoint path for the harness defaults
/// (repo `g/p`, branch `main`, job `build`).
pub const ENDPOINT_PATH: &str = "/g/p/-/jobs/artifacts/main/download?job=build";

pub struct TestHarness {
    temp_dir: TempDir,
    pub work_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().join("work");
        std::fs::create_dir_all(&work_dir).expect("Failed to create work dir");

        Self { temp_dir, work_dir }
    }

    /// A config pointed at `service_url` with the harness defaults.
    pub fn config(&self, service_url: &str) -> FetcherConfig {
        FetcherConfig {
            url: service_url.to_string(),
            token: Some(SecretString::from("t")),
            repo: Some("g/p".to_string()),
            branch: "main".to_string(),
            job: "build".to_string(),
            output_path: PathBuf::from("dist"),
            work_dir: self.work_dir.clone(),
        }
    }

    /// A fetcher whose provisioning step runs `install_program` instead of
    /// yarn.
    pub fn fetcher(&self, config: FetcherConfig, install_program: &str) -> Fetcher {
        Fetcher::with_components(
            Arc::new(config),
            Extractor::new(),
            Provisioner::new(install_program, vec![]),
        )
    }

    /// The output directory as materialized inside the working directory.
    pub fn dist(&self) -> PathBuf {
        self.work_dir.join("dist")
    }

    /// Pre-populates the output directory with a stale file.
    pub fn seed_stale_output(&self) -> PathBuf {
        let stale = self.dist().join("stale.txt");
        std::fs::create_dir_all(self.dist()).expect("Failed to create dist");
        std::fs::write(&stale, b"left over from a previous run").expect("Failed to seed dist");
        stale
    }

    pub fn list_work_dir(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.work_dir)
            .expect("Failed to read work dir")
            .map(|e| e.expect("dir entry").path())
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a zip archive in memory from `(name, content)` entries; names
/// ending in `/` become directories.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("add directory");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(content).expect("write entry");
        }
    }

    writer.finish().expect("finish zip").into_inner()
}

/// A typical build artifact: a `dist/` directory with an index page and a
/// package manifest.
pub fn dist_zip() -> Vec<u8> {
    build_zip(&[
        ("dist/", b""),
        ("dist/index.html", b"<html><body>ok</body></html>"),
        ("dist/package.json", b"{\"name\":\"app\",\"private\":true}"),
    ])
}

pub fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read file")
}
