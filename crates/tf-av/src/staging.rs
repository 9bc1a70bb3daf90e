//! Staged output files with atomic finalization.
//!
//! A [`StagedOutput`] names a uniquely named temporary file in the same
//! directory as the final destination. Tools write there; only
//! [`StagedOutput::finalize`] moves the result into place, using a rename
//! on the same filesystem so readers never observe a half-written file.

use std::path::{Path, PathBuf};

use tf_core::{Error, Result};
use uuid::Uuid;

/// A pending output file for `destination`.
///
/// Dropping a `StagedOutput` without finalizing removes the temp file, so
/// failed runs leave no artifact behind.
#[derive(Debug)]
pub struct StagedOutput {
    destination: PathBuf,
    temp_path: PathBuf,
    finalized: bool,
}

impl StagedOutput {
    /// Reserve a temp path next to `destination`. Nothing is created on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination directory does not exist.
    pub fn new(destination: &Path) -> Result<Self> {
        let dir = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(Error::Io {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("destination directory does not exist: {}", dir.display()),
                ),
            });
        }

        let stem = destination
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let ext = destination
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let temp_path = dir.join(format!(".{stem}.{}.tmp{ext}", Uuid::new_v4().simple()));

        Ok(Self {
            destination: destination.to_path_buf(),
            temp_path,
            finalized: false,
        })
    }

    /// Where the tool should write.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Move the temp file over the destination.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the destination untouched, if the temp
    /// file was never produced or the rename fails.
    pub fn finalize(mut self) -> Result<PathBuf> {
        if !self.temp_path.exists() {
            return Err(Error::Io {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no output was produced at {}", self.temp_path.display()),
                ),
            });
        }

        std::fs::rename(&self.temp_path, &self.destination)?;
        self.finalized = true;
        tracing::debug!(
            "moved {} to {}",
            self.temp_path.display(),
            self.destination.display()
        );
        Ok(self.destination.clone())
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if !self.finalized && self.temp_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                tracing::warn!("failed to remove {}: {}", self.temp_path.display(), e);
            }
        }
    }
}
