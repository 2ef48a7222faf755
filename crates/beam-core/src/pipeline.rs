//! The upload pipeline: build -> stage -> pack -> size-check -> upload.
//!
//! Stages run strictly top-to-bottom; each is awaited to completion before
//! the next begins. The staging directory is owned by the current run: it
//! is removed before the first stage and again when the upload fails, so a
//! failed run never corrupts the next one. The release archive itself is
//! never cleaned up.

use crate::api::{ApiClient, ApiError, User};
use crate::archive;
use crate::config::BuildConfig;
use crate::error::PipelineError;
use crate::paths;
use crate::reporter::Reporter;
use crate::stage;
use crate::toolchain;
use beam_schema::Metadata;
use std::path::{Path, PathBuf};

/// Run the full upload pipeline for a validated app and return the path of
/// the release archive it produced.
///
/// Externally hosted apps (those with `externalUrl` set) skip the install
/// and bundle stages entirely; everything else runs unconditionally.
///
/// # Errors
///
/// The first fatal stage error terminates the run. Tooling stages
/// soft-fail unless `config.strict` is set (see [`toolchain`]).
pub async fn run<R: Reporter>(
    project_dir: &Path,
    metadata: &Metadata,
    client: &ApiClient,
    user: &User,
    config: &BuildConfig,
    reporter: &R,
) -> Result<PathBuf, PipelineError> {
    let staging = paths::staging_dir(project_dir);
    let releases = paths::releases_dir(project_dir);

    // Drop any leftovers from a previous failed run.
    stage::remove_folder(&staging)?;

    if metadata.is_externally_hosted() {
        reporter.warning("Detected externally hosted app, skipping build steps");
    } else {
        toolchain::install_dependencies(project_dir, config, reporter).await?;
        toolchain::bundle_all(project_dir, config, metadata, reporter).await?;
    }

    stage::ensure_folder_exists(&staging)?;
    stage::collect_assets(
        project_dir,
        &staging,
        metadata.is_externally_hosted(),
        config,
        reporter,
    )?;

    stage::ensure_folder_exists(&releases)?;
    let archive_path = archive::pack(&staging, &releases, metadata, reporter)?;
    archive::check_upload_size(&archive_path)?;

    reporter.step("Uploading package to the app-store back office");
    let uploaded = client
        .upload(user, &metadata.identifier, &metadata.version, &archive_path)
        .await;

    match uploaded {
        Ok(()) => {
            reporter.succeed();
            cleanup_staging(&staging, reporter);
            Ok(archive_path)
        }
        Err(err) => {
            if let ApiError::Rejected(messages) = &err {
                for message in messages {
                    reporter.fail(message);
                }
            } else {
                reporter.fail(&err.to_string());
            }
            // The staging dir is cleaned even on failure; the release
            // archive is left in place.
            cleanup_staging(&staging, reporter);
            Err(err.into())
        }
    }
}

/// Remove the staging directory without letting a cleanup failure mask the
/// outcome of the run that produced it.
fn cleanup_staging<R: Reporter>(staging: &Path, reporter: &R) {
    if let Err(err) = stage::remove_folder(staging) {
        reporter.warning(&format!("could not remove staging folder: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use serde_json::json;

    /// Lay out an externally hosted app: no src/, no build/.
    fn external_project() -> (tempfile::TempDir, Metadata) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let meta_json = json!({
            "name": "MyApp",
            "identifier": "com.example.MyApp",
            "version": "1.0.0",
            "externalUrl": "https://apps.example.com/my-app",
            "icon": "./static/icon.png",
        });
        std::fs::write(
            root.join("metadata.json"),
            serde_json::to_string_pretty(&meta_json).unwrap(),
        )
        .unwrap();
        std::fs::create_dir_all(root.join("static")).unwrap();
        std::fs::write(root.join("static/icon.png"), [0u8; 16]).unwrap();

        let metadata = beam_schema::validate(&meta_json).unwrap();
        (dir, metadata)
    }

    fn developer() -> User {
        serde_json::from_value(json!({ "type": "developer" })).unwrap()
    }

    #[tokio::test]
    async fn external_app_skips_build_and_uploads() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/developer/app-store/upload")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let (dir, metadata) = external_project();
        let client = ApiClient::new(server.url(), "secret");
        let config = BuildConfig::default();

        let archive = run(
            dir.path(),
            &metadata,
            &client,
            &developer(),
            &config,
            &NullReporter,
        )
        .await
        .unwrap();

        // Build stages were skipped: no build folder was ever created.
        assert!(!dir.path().join("build").exists());
        // Release archive kept, staging removed.
        assert!(archive.is_file());
        assert_eq!(
            archive.file_name().unwrap().to_str().unwrap(),
            "com.example.MyApp.1.0.0.tgz"
        );
        assert!(!paths::staging_dir(dir.path()).exists());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_upload_cleans_staging_keeps_archive() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/developer/app-store/upload")
            .with_status(200)
            .with_body(r#"{"error":["version_already_exists","missing_field_file"]}"#)
            .create_async()
            .await;

        let (dir, metadata) = external_project();
        let client = ApiClient::new(server.url(), "secret");
        let config = BuildConfig::default();

        let err = run(
            dir.path(),
            &metadata,
            &client,
            &developer(),
            &config,
            &NullReporter,
        )
        .await
        .unwrap_err();

        // The upload rejection itself comes back, not a cleanup error.
        assert!(matches!(
            &err,
            PipelineError::Api(ApiError::Rejected(_))
        ));
        let rendered = err.to_string();
        assert!(rendered.contains("The current version of your app already exists"));
        assert!(rendered.contains("There is a missing field"));

        assert!(!paths::staging_dir(dir.path()).exists());
        assert!(
            paths::releases_dir(dir.path())
                .join("com.example.MyApp.1.0.0.tgz")
                .is_file(),
            "release archive must survive a failed upload"
        );
    }

    #[test]
    fn cleanup_staging_swallows_removal_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the staging directory should be: removal as a
        // directory fails, but cleanup must not panic or propagate.
        let staging = dir.path().join(".tmp");
        std::fs::write(&staging, "not a directory").unwrap();

        cleanup_staging(&staging, &NullReporter);
        assert!(staging.exists());
    }

    #[test]
    fn cleanup_staging_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        cleanup_staging(&dir.path().join("never-created"), &NullReporter);
    }

    #[tokio::test]
    async fn stale_staging_dir_is_removed_up_front() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/developer/app-store/upload")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let (dir, metadata) = external_project();
        let staging = paths::staging_dir(dir.path());
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("stale-file"), "leftover").unwrap();

        let client = ApiClient::new(server.url(), "secret");
        run(
            dir.path(),
            &metadata,
            &client,
            &developer(),
            &BuildConfig::default(),
            &NullReporter,
        )
        .await
        .unwrap();

        assert!(!staging.exists());
    }
}
