//! Local credential cache.
//!
//! A plaintext identifier -> API key map in `~/.beam/credentials.json`,
//! used to pre-fill the key prompt on subsequent uploads. This is a
//! convenience cache, not a vault: no encryption, no expiry, entries are
//! only ever overwritten per identifier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// On-disk key-value store of app identifiers to API keys.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Keystore {
    #[serde(flatten)]
    keys: BTreeMap<String, String>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Keystore {
    /// Load the cache from the default location (`~/.beam`).
    ///
    /// A missing or unreadable file yields an empty store; the cache must
    /// never block an upload.
    pub fn load_default() -> Self {
        match crate::paths::credentials_path() {
            Some(path) => Self::load_from(path),
            None => Self::default(),
        }
    }

    /// Load the cache from an explicit file path.
    pub fn load_from(path: PathBuf) -> Self {
        let keys = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            keys,
            path: Some(path),
        }
    }

    /// Cached API key for an app identifier, if any.
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.keys.get(identifier).map(String::as_str)
    }

    /// Store (or overwrite) the API key for an app identifier and persist.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the cache file cannot be written.
    pub fn put(&mut self, identifier: &str, api_key: &str) -> std::io::Result<()> {
        self.keys
            .insert(identifier.to_string(), api_key.to_string());
        self.save()
    }

    fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            // No resolvable home dir; skip persistence silently.
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.keys)
            .map_err(std::io::Error::other)?;
        std::fs::write(path, content)
    }
}
