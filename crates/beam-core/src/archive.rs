//! Release packaging and the upload size guard.

use crate::error::PipelineError;
use crate::reporter::Reporter;
use beam_schema::Metadata;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Upload ceiling in decimal megabytes. The back office rejects anything
/// at or above this, so beam refuses to even try.
pub const MAX_UPLOAD_MB: u64 = 10;

/// Archive filename for a release: `{identifier}.{version}.tgz`, with any
/// whitespace replaced by underscores. Dots in the identifier are kept.
///
/// `com.example.App` + `1 2 3` -> `com.example.App.1_2_3.tgz`
pub fn archive_filename(metadata: &Metadata) -> String {
    format!("{}.{}.tgz", metadata.identifier, metadata.version)
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Compress the staging directory into a release archive and return its
/// path.
///
/// # Errors
///
/// Compression or IO failure is fatal ([`PipelineError::Pack`]).
pub fn pack<R: Reporter>(
    staging: &Path,
    releases_dir: &Path,
    metadata: &Metadata,
    reporter: &R,
) -> Result<PathBuf, PipelineError> {
    let filename = archive_filename(metadata);
    let target = releases_dir.join(&filename);

    reporter.step(&format!(
        "Creating release package \"{filename}\" in \"releases\" folder"
    ));

    compress(staging, &target).map_err(|e| {
        reporter.fail("Error occurred while creating release package");
        PipelineError::Pack(e)
    })?;

    reporter.succeed();
    Ok(target)
}

/// Tar the contents of `src` (at the archive root) and gzip into `dest`.
fn compress(src: &Path, dest: &Path) -> std::io::Result<()> {
    let file = File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", src)?;
    let encoder = builder.into_inner()?;
    encoder.finish()?;
    Ok(())
}

/// Enforce the upload size ceiling on a packed archive.
///
/// Size is measured in decimal megabytes (bytes / 1,000,000), matching the
/// back office's accounting, not in mebibytes.
///
/// # Errors
///
/// [`PipelineError::TooLarge`] when the archive is at or above
/// [`MAX_UPLOAD_MB`]; IO errors if the archive cannot be inspected.
pub fn check_upload_size(archive: &Path) -> Result<(), PipelineError> {
    let bytes = std::fs::metadata(archive)?.len();
    let size_mb = bytes as f64 / 1_000_000.0;

    if size_mb >= MAX_UPLOAD_MB as f64 {
        return Err(PipelineError::TooLarge {
            size_mb,
            limit_mb: MAX_UPLOAD_MB,
        });
    }
    Ok(())
}
