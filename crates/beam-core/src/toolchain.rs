//! External tooling stages: dependency install and app bundling.
//!
//! Both stages shell out (`npm`, plus the configured bundler) and capture
//! diagnostics. Failures here are soft by default: the captured output is
//! logged and the pipeline continues, unless [`BuildConfig::strict`] is set,
//! in which case the failure is fatal.

use crate::config::{BuildConfig, Bundler, Sourcemaps};
use crate::reporter::Reporter;
use beam_schema::Metadata;
use std::path::{Path, PathBuf};
use std::process::Output;
use thiserror::Error;
use tokio::process::Command;

/// A tooling invocation that could not be started or exited non-zero under
/// strict mode.
#[derive(Error, Debug)]
pub enum ToolchainError {
    /// The tool binary could not be spawned at all.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// Name of the tool that failed to start.
        tool: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited non-zero (strict mode only).
    #[error("{tool} failed:\n{stderr}")]
    Failed {
        /// Name of the failing tool.
        tool: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Which bundle a single bundler invocation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFlavor {
    /// Modern-syntax bundle, `appBundle.js`.
    Modern,
    /// Legacy-syntax bundle, `appBundle.es5.js`.
    Legacy,
}

impl BundleFlavor {
    /// Output filename for this flavor.
    pub fn output_file(self) -> &'static str {
        match self {
            Self::Modern => "appBundle.js",
            Self::Legacy => "appBundle.es5.js",
        }
    }
}

const NPM: &str = if cfg!(windows) { "npm.cmd" } else { "npm" };

/// Install the app's build dependencies by running the package manager in
/// the project directory.
///
/// # Errors
///
/// Soft-fails (logs and returns `Ok`) on a non-zero exit unless
/// `config.strict` is set. Spawn failures and strict-mode tool failures are
/// returned as [`ToolchainError`].
pub async fn install_dependencies<R: Reporter>(
    project_dir: &Path,
    config: &BuildConfig,
    reporter: &R,
) -> Result<(), ToolchainError> {
    reporter.step("Installing app dependencies");

    let output = Command::new(NPM)
        .arg("i")
        .current_dir(project_dir)
        .output()
        .await
        .map_err(|source| ToolchainError::Spawn {
            tool: NPM.to_string(),
            source,
        })?;

    handle_tool_exit(NPM, &output, config, reporter, "Error while installing app dependencies")
}

/// Produce one app bundle with the configured bundler.
///
/// The bundler is an external collaborator: beam only assembles the
/// invocation (entry point, output file, global name, defines, minify and
/// sourcemap flags) and interprets its exit status.
///
/// # Errors
///
/// Same soft-fail contract as [`install_dependencies`].
pub async fn bundle_app<R: Reporter>(
    project_dir: &Path,
    config: &BuildConfig,
    metadata: &Metadata,
    flavor: BundleFlavor,
    reporter: &R,
) -> Result<(), ToolchainError> {
    let tool = match config.bundler {
        Bundler::Rollup => "rollup",
        Bundler::Esbuild => "esbuild",
    };
    reporter.step(&format!(
        "Building {} and saving to {}",
        flavor.output_file(),
        config.build_folder
    ));

    let entry = entry_point(project_dir);
    let out_file = project_dir
        .join(&config.build_folder)
        .join(flavor.output_file());
    let args = match config.bundler {
        Bundler::Rollup => rollup_args(&entry, &out_file, config, metadata),
        Bundler::Esbuild => esbuild_args(&entry, &out_file, config, metadata, flavor),
    };

    let output = Command::new(tool)
        .args(&args)
        .current_dir(project_dir)
        .output()
        .await
        .map_err(|source| ToolchainError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    handle_tool_exit(
        tool,
        &output,
        config,
        reporter,
        &format!("Error while bundling {}", flavor.output_file()),
    )
}

/// Bundle both the modern and the legacy flavor.
///
/// # Errors
///
/// Same soft-fail contract as [`install_dependencies`].
pub async fn bundle_all<R: Reporter>(
    project_dir: &Path,
    config: &BuildConfig,
    metadata: &Metadata,
    reporter: &R,
) -> Result<(), ToolchainError> {
    bundle_app(project_dir, config, metadata, BundleFlavor::Modern, reporter).await?;
    bundle_app(project_dir, config, metadata, BundleFlavor::Legacy, reporter).await
}

/// The bundler entry point: `src/index.ts` when present, else `src/index.js`.
fn entry_point(project_dir: &Path) -> PathBuf {
    let ts = project_dir.join("src/index.ts");
    if ts.exists() {
        ts
    } else {
        project_dir.join("src/index.js")
    }
}

fn rollup_args(entry: &Path, out_file: &Path, config: &BuildConfig, metadata: &Metadata) -> Vec<String> {
    let mut args = vec![
        "--input".to_string(),
        entry.display().to_string(),
        "--file".to_string(),
        out_file.display().to_string(),
        "--format".to_string(),
        "iife".to_string(),
        "--name".to_string(),
        metadata.safe_app_id(),
    ];

    if config.sourcemaps == Sourcemaps::Off {
        args.push("--no-sourcemap".to_string());
    }

    // APP_* vars and minification are picked up by the rollup config from
    // the environment, which this process forwards untouched.
    args
}

fn esbuild_args(
    entry: &Path,
    out_file: &Path,
    config: &BuildConfig,
    metadata: &Metadata,
    flavor: BundleFlavor,
) -> Vec<String> {
    let mut args = vec![
        entry.display().to_string(),
        "--bundle".to_string(),
        "--format=iife".to_string(),
        format!("--global-name={}", metadata.safe_app_id()),
        format!("--outfile={}", out_file.display()),
    ];

    if flavor == BundleFlavor::Legacy {
        args.push("--target=es5".to_string());
    }

    match config.sourcemaps {
        Sourcemaps::Off => {}
        Sourcemaps::External => args.push("--sourcemap".to_string()),
        Sourcemaps::Inline => args.push("--sourcemap=inline".to_string()),
    }

    if config.minify {
        args.push("--minify-whitespace".to_string());
        args.push("--minify-identifiers".to_string());
    }

    for (key, value) in &config.app_vars {
        args.push(format!("--define:process.env.{key}=\"{value}\""));
    }

    args
}

/// Interpret a tool's exit status according to the soft-fail contract.
fn handle_tool_exit<R: Reporter>(
    tool: &str,
    output: &Output,
    config: &BuildConfig,
    reporter: &R,
    fail_msg: &str,
) -> Result<(), ToolchainError> {
    if output.status.success() {
        reporter.succeed();
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    reporter.fail(fail_msg);
    reporter.error(&stderr);
    tracing::error!(tool, %stderr, "tool exited non-zero");

    if config.strict {
        return Err(ToolchainError::Failed {
            tool: tool.to_string(),
            stderr,
        });
    }

    reporter.warning("continuing despite tool failure (set BEAM_BUILD_EXIT_ON_FAIL=true to abort)");
    Ok(())
}
