//! Well-known filesystem locations for a pipeline run.

use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Returns the beam configuration directory, or None if the user's home
/// cannot be resolved.
pub fn try_beam_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("BEAM_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".beam"))
}

/// The app's `metadata.json` in the project directory.
pub fn metadata_path(project_dir: &Path) -> PathBuf {
    project_dir.join("metadata.json")
}

/// Ephemeral staging directory holding the files to be packed.
///
/// Exclusively owned by the current run: removed before the pipeline starts
/// and again when an upload fails, so stale leftovers never leak into a
/// subsequent run.
pub fn staging_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".tmp")
}

/// Directory collecting one release archive per run.
pub fn releases_dir(project_dir: &Path) -> PathBuf {
    project_dir.join("releases")
}

/// Credential cache file: `~/.beam/credentials.json`.
pub fn credentials_path() -> Option<PathBuf> {
    try_beam_home().map(|home| home.join("credentials.json"))
}
