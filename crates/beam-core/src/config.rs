//! Build configuration for the tooling stages.
//!
//! The install and bundle stages historically keyed their behavior off
//! ambient environment variables. That is collapsed here into one explicit
//! `BuildConfig` read once at startup and threaded through the pipeline,
//! so a stage's behavior is visible in its signature.

use std::collections::BTreeMap;

/// Which external bundler produces the app bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bundler {
    /// Rollup invocation (default).
    #[default]
    Rollup,
    /// Esbuild invocation.
    Esbuild,
}

/// Source map emission mode for the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sourcemaps {
    /// No source maps.
    Off,
    /// Separate `.map` files next to each bundle (default).
    #[default]
    External,
    /// Inline source maps inside the bundle.
    Inline,
}

/// Configuration threaded through the install and bundle stages.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Escalate tooling failures (install, bundle) from soft warnings to
    /// fatal errors.
    pub strict: bool,

    /// External bundler to invoke.
    pub bundler: Bundler,

    /// Output folder for bundle artifacts, relative to the project dir.
    pub build_folder: String,

    /// Source map mode passed to the bundler.
    pub sourcemaps: Sourcemaps,

    /// Minify bundle output.
    pub minify: bool,

    /// `APP_`-prefixed variables forwarded into the bundle as defined
    /// constants.
    pub app_vars: BTreeMap<String, String>,
}

impl BuildConfig {
    /// Read the configuration from the process environment.
    ///
    /// - `BEAM_BUILD_EXIT_ON_FAIL=true` -> strict tooling failures
    /// - `BEAM_BUNDLER=esbuild` -> esbuild instead of rollup
    /// - `BEAM_BUILD_FOLDER` -> bundle output folder (default `build`)
    /// - `BEAM_SOURCEMAP=true|inline` -> source map mode
    /// - `BEAM_MINIFY=true` -> minified bundles
    /// - `APP_*` -> forwarded to the bundler as defines
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build the configuration from an explicit variable set.
    pub fn from_vars(vars: impl Iterator<Item = (String, String)>) -> Self {
        let mut config = Self {
            build_folder: "build".to_string(),
            ..Self::default()
        };

        for (key, value) in vars {
            match key.as_str() {
                "BEAM_BUILD_EXIT_ON_FAIL" => config.strict = value == "true",
                "BEAM_BUNDLER" => {
                    if value == "esbuild" {
                        config.bundler = Bundler::Esbuild;
                    }
                }
                "BEAM_BUILD_FOLDER" => {
                    if !value.is_empty() {
                        config.build_folder = value;
                    }
                }
                "BEAM_SOURCEMAP" => {
                    config.sourcemaps = match value.as_str() {
                        "inline" => Sourcemaps::Inline,
                        "false" => Sourcemaps::Off,
                        _ => Sourcemaps::External,
                    };
                }
                "BEAM_MINIFY" => config.minify = value == "true",
                _ if key.starts_with("APP_") => {
                    config.app_vars.insert(key, value);
                }
                _ => {}
            }
        }

        config
    }
}
