//! Asset manifest reader.
//!
//! A manifest maps a logical asset key (`website.css`) to the hashed path the
//! build tool produced (`/assets/css/website.3f2a1c.css`). The JSON file is a
//! flat object:
//!
//! ```json
//! {
//!   "website.css": "/assets/css/website.css",
//!   "website.js": "/assets/js/website.js"
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::AssetSourceError;

/// A source of manifest entries.
///
/// Lookups are exact and case-sensitive. Implementations report read or parse
/// problems of their backing store as [`AssetSourceError`].
pub trait ManifestSource: Send + Sync {
    /// Whether `key` is present.
    fn has(&self, key: &str) -> Result<bool, AssetSourceError>;

    /// The resolved path for `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, AssetSourceError>;
}

/// `manifest.json` reader, parsed on first access.
///
/// A parse failure is not cached: every access retries and reports it again.
#[derive(Debug)]
pub struct JsonManifest {
    path: PathBuf,
    entries: OnceLock<HashMap<String, String>>,
}

impl JsonManifest {
    /// Create a reader for `path`. Nothing is read until the first lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceLock::new(),
        }
    }

    /// Create a reader from already known entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            path: PathBuf::new(),
            entries: OnceLock::from(map),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> Result<&HashMap<String, String>, AssetSourceError> {
        if let Some(entries) = self.entries.get() {
            return Ok(entries);
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|source| AssetSourceError::Read {
                path: self.path.clone(),
                source,
            })?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|source| AssetSourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!("Loaded {} manifest entries from {}", entries.len(), self.path.display());
        Ok(self.entries.get_or_init(|| entries))
    }
}

impl ManifestSource for JsonManifest {
    fn has(&self, key: &str) -> Result<bool, AssetSourceError> {
        Ok(self.entries()?.contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Option<String>, AssetSourceError> {
        Ok(self.entries()?.get(key).cloned())
    }
}
