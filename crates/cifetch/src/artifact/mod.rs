//! Artifact endpoint client: metadata probe and streamed download.

pub mod client;
pub mod parse;

pub use client::{ArtifactClient, DownloadError, ProbeError, ResolvedArtifact};
