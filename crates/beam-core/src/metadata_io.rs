//! Loading `metadata.json` from a project directory.

use crate::paths;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Failure reading or parsing the metadata file. File-not-found and parse
/// failure are distinct so the user sees which one happened.
#[derive(Error, Debug)]
pub enum MetadataIoError {
    /// No `metadata.json` in the project directory.
    #[error("\"{}\" not found", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("error occurred while reading {}: {source}", path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid JSON.
    #[error("error occurred while parsing {}: {source}", path.display())]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse `metadata.json` from `project_dir` into an untyped value.
///
/// Validation is a separate step (`beam_schema::validate`); this only gets
/// the bytes off disk.
///
/// # Errors
///
/// Returns [`MetadataIoError`] when the file is missing, unreadable, or not
/// valid JSON.
pub async fn load(project_dir: &Path) -> Result<Value, MetadataIoError> {
    let path = paths::metadata_path(project_dir);

    if !path.exists() {
        return Err(MetadataIoError::NotFound(path));
    }

    let content = fs::read_to_string(&path)
        .await
        .map_err(|source| MetadataIoError::Read {
            path: path.clone(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| MetadataIoError::Parse { path, source })
}
