//! Upload command: the end-to-end publish flow.

use anyhow::Result;
use beam_core::api::ApiClient;
use beam_core::keystore::Keystore;
use beam_core::{BuildConfig, pipeline};

use crate::ui::{Output, prompt};

/// Validate, build, package, and upload the app in the current directory.
pub async fn upload(api_url: &str, debug: bool) -> Result<()> {
    let output = Output::new();
    let project_dir = std::env::current_dir()?;

    if debug {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "beam version");
        tracing::debug!(platform = std::env::consts::OS, cwd = %project_dir.display(), "environment");
    }

    // Metadata first: its identifier keys the credential cache.
    let raw = beam_core::metadata_io::load(&project_dir).await?;

    output.step("Checking validity of metadata.json");
    let metadata = match beam_schema::validate(&raw) {
        Ok(metadata) => {
            output.succeed();
            metadata
        }
        Err(err) => {
            output.fail(&err.to_string());
            return Err(err.into());
        }
    };

    let mut keystore = Keystore::load_default();
    let cached = keystore.get(&metadata.identifier).map(ToString::to_string);
    let api_key = prompt::ask("Please provide your API key", cached.as_deref())?;

    output.step("Authenticating with the app-store back office");
    let client = ApiClient::new(api_url, &api_key);
    let user = match client.login().await {
        Ok(user) => {
            output.succeed();
            user
        }
        Err(err) => {
            output.fail(&err.to_string());
            return Err(err.into());
        }
    };

    let config = BuildConfig::from_env();
    let archive = pipeline::run(&project_dir, &metadata, &client, &user, &config, &output).await?;

    // Remember the key for the next upload of this app. Failure to persist
    // must not fail an upload that already succeeded.
    if let Err(err) = keystore.put(&metadata.identifier, &api_key) {
        output.warning(&format!("could not save API key locally: {err}"));
    }

    output.success(&format!("Published {} ({})", metadata.name, archive.display()));
    Ok(())
}
