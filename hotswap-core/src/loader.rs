//! Module content loader
//!
//! Reads a module artifact into memory in one call. The file handle is opened
//! and closed inside [`read_module`], so an external build can overwrite or
//! delete the artifact the moment this returns.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from reading a module artifact
#[derive(Error, Debug)]
pub enum LoadError {
    /// Nothing exists at the path
    #[error("module not found at {}", .path.display())]
    NotFound { path: PathBuf },

    /// The path exists but could not be read
    #[error("failed to read module {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read the whole module artifact at `path` into memory.
///
/// No retry and no polling: a missing file is reported immediately.
pub fn read_module(path: &Path) -> Result<Vec<u8>, LoadError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "Read module artifact");
            Ok(bytes)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(LoadError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(LoadError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
