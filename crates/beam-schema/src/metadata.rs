//! The app metadata record parsed from `metadata.json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validated contents of an app's `metadata.json`.
///
/// Construct via [`crate::validate::validate`]; a `Metadata` in hand means
/// every required field is present and pattern-conformant. The record is
/// treated as immutable for the remainder of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Human-readable app name.
    pub name: String,

    /// Reverse-domain app identifier (e.g. `com.example.MyApp`).
    /// Doubles as the archive basename and the store-side app id.
    pub identifier: String,

    /// Version string as published to the store.
    pub version: String,

    /// Hosting URL for externally hosted apps. When set, the local
    /// install/bundle stages are skipped entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    /// Primary icon, a `./static/...` path with an image extension.
    pub icon: String,

    /// Named icon variants (`default`, `square`, `rounded`, `landscape`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<BTreeMap<String, String>>,

    /// Splash screen image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splash_image: Option<String>,

    /// Resolution-keyed artwork paths (e.g. `1920x1080`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork: Option<BTreeMap<String, String>>,
}

impl Metadata {
    /// Derive the identifier the bundler can use as a global symbol:
    /// dots and hyphens become underscores, prefixed with `APP_`.
    ///
    /// `com.example-app` -> `APP_com_example_app`
    pub fn safe_app_id(&self) -> String {
        format!("APP_{}", self.identifier.replace(['.', '-'], "_"))
    }

    /// Whether this app is hosted externally (no local bundle is shipped).
    pub fn is_externally_hosted(&self) -> bool {
        self.external_url.is_some()
    }
}
