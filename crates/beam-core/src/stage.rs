//! Staging directory lifecycle and asset collection.
//!
//! The staging directory holds exactly the files that go into the release
//! archive. `metadata.json` and `static/` are always staged; apps that are
//! not externally hosted additionally ship their `src/` tree and the four
//! bundle artifacts.

use crate::config::BuildConfig;
use crate::error::PipelineError;
use crate::reporter::Reporter;
use std::path::Path;

/// Bundle artifacts shipped for locally hosted apps, relative to the build
/// folder.
const BUNDLE_ARTIFACTS: &[&str] = &[
    "appBundle.js",
    "appBundle.js.map",
    "appBundle.es5.js",
    "appBundle.es5.js.map",
];

/// Remove a folder and everything under it. Missing folders are fine.
///
/// # Errors
///
/// Returns an IO error if the folder exists but cannot be removed.
pub fn remove_folder(folder: &Path) -> std::io::Result<()> {
    if folder.exists() {
        std::fs::remove_dir_all(folder)?;
    }
    Ok(())
}

/// Create a folder (and parents) if it does not exist yet.
///
/// # Errors
///
/// Returns an IO error if creation fails.
pub fn ensure_folder_exists(folder: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(folder)
}

/// Copy the app's distributable files into the staging directory.
///
/// Always copies `metadata.json` and `static/`. When the app is not
/// externally hosted, also copies `src/` and the bundle artifacts from the
/// configured build folder.
///
/// # Errors
///
/// Any missing required file or directory is fatal and reported by path.
pub fn collect_assets<R: Reporter>(
    project_dir: &Path,
    staging: &Path,
    externally_hosted: bool,
    config: &BuildConfig,
    reporter: &R,
) -> Result<(), PipelineError> {
    reporter.step(&format!("Copying assets to \"{}\"", dir_name(staging)));

    copy_file(project_dir, staging, Path::new("metadata.json"))?;
    copy_dir(project_dir, staging, Path::new("static"))?;

    if !externally_hosted {
        copy_dir(project_dir, staging, Path::new("src"))?;
        for artifact in BUNDLE_ARTIFACTS {
            let rel = Path::new(&config.build_folder).join(artifact);
            copy_file(project_dir, staging, &rel)?;
        }
    }

    reporter.succeed();
    Ok(())
}

fn copy_file(project_dir: &Path, staging: &Path, rel: &Path) -> Result<(), PipelineError> {
    let source = project_dir.join(rel);
    if !source.is_file() {
        return Err(PipelineError::MissingAsset(rel.display().to_string()));
    }
    // Files land flat in the staging dir, regardless of their source folder.
    let file_name = source
        .file_name()
        .ok_or_else(|| PipelineError::MissingAsset(rel.display().to_string()))?;
    std::fs::copy(&source, staging.join(file_name))?;
    Ok(())
}

fn copy_dir(project_dir: &Path, staging: &Path, rel: &Path) -> Result<(), PipelineError> {
    let source = project_dir.join(rel);
    if !source.is_dir() {
        return Err(PipelineError::MissingAsset(rel.display().to_string()));
    }
    let options = fs_extra::dir::CopyOptions::new().overwrite(true);
    fs_extra::dir::copy(&source, staging, &options)
        .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;
    Ok(())
}

/// Last path component, for user-facing messages.
fn dir_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
