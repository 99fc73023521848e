//! Artifact storage for generated conversion outputs
//!
//! This module owns the on-disk directory holding rendered videos, QR images
//! and ffmpeg logs. Every artifact name carries the request identifier, so
//! concurrent or repeated conversions never collide on paths.

use crate::error::{StorageError, StorageResult};
use crate::request_id::RequestId;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Store for generated conversion artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    generated_dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `root`, creating the generated directory
    pub fn open(root: &Path) -> StorageResult<Self> {
        let generated_dir = root.join("generated");
        fs::create_dir_all(&generated_dir)
            .map_err(|e| StorageError::CreateDir(generated_dir.clone(), e))?;

        info!("Artifact store opened at {}", generated_dir.display());

        Ok(Self { generated_dir })
    }

    /// Directory holding generated artifacts
    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }

    /// File name for the rendered video of one conversion request
    pub fn video_file_name(brand_name: &str, id: &RequestId) -> String {
        format!("output_{}_{}.mp4", sanitize_file_name(brand_name), id)
    }

    /// File name for the QR image of one conversion request
    pub fn qr_file_name(id: &RequestId) -> String {
        format!("qr_{id}.png")
    }

    /// File name for the ffmpeg log accompanying a rendered video
    pub fn log_file_name(video_file_name: &str) -> String {
        format!("{video_file_name}.log")
    }

    /// Absolute path for a generated file name
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.generated_dir.join(file_name)
    }

    /// Write an artifact into the store
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.generated_dir.join(file_name);
        fs::write(&path, bytes).map_err(|e| StorageError::Write(path.clone(), e))?;

        Ok(path)
    }

    /// Resolve a client-supplied file name to an existing artifact path
    ///
    /// Returns `None` for unknown names and for names that would escape the
    /// generated directory.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return None;
        }

        let path = self.generated_dir.join(file_name);
        path.is_file().then_some(path)
    }
}

/// Reduce a string to characters that are safe inside a file name
///
/// Everything outside `[A-Za-z0-9._-]` is replaced with an underscore and
/// leading dots are stripped.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}
