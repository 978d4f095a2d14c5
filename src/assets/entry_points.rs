//! Entry points reader.
//!
//! Entry points group the build outputs a page must load, by bundle and by
//! asset type. The file follows the webpack-encore layout:
//!
//! ```json
//! {
//!   "entrypoints": {
//!     "website": {
//!       "css": ["/assets/css/website.css"],
//!       "js": ["/assets/js/website.js", "/assets/js/vendor.js"]
//!     }
//!   }
//! }
//! ```
//!
//! Order inside a type is significant: scripts and stylesheets are emitted in
//! that order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::AssetSourceError;

/// Asset type → ordered paths, for one bundle.
pub type BundleEntries = BTreeMap<String, Vec<String>>;

/// A source of entry points.
///
/// An unknown bundle is `Ok(None)`, never an error.
pub trait EntryPointsSource: Send + Sync {
    /// The entries of `bundle`.
    fn bundle(&self, bundle: &str) -> Result<Option<BundleEntries>, AssetSourceError>;
}

#[derive(Debug, Deserialize)]
struct EntryPointsFile {
    #[serde(default)]
    entrypoints: BTreeMap<String, BundleEntries>,
}

/// `entrypoints.json` reader, parsed on first access.
#[derive(Debug)]
pub struct JsonEntryPoints {
    path: PathBuf,
    bundles: OnceLock<BTreeMap<String, BundleEntries>>,
}

impl JsonEntryPoints {
    /// Create a reader for `path`. Nothing is read until the first lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bundles: OnceLock::new(),
        }
    }

    /// Create a reader from already known bundles.
    pub fn from_bundles(bundles: BTreeMap<String, BundleEntries>) -> Self {
        Self {
            path: PathBuf::new(),
            bundles: OnceLock::from(bundles),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bundles(&self) -> Result<&BTreeMap<String, BundleEntries>, AssetSourceError> {
        if let Some(bundles) = self.bundles.get() {
            return Ok(bundles);
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|source| AssetSourceError::Read {
                path: self.path.clone(),
                source,
            })?;
        let file: EntryPointsFile =
            serde_json::from_str(&content).map_err(|source| AssetSourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(
            "Loaded {} entry point bundle(s) from {}",
            file.entrypoints.len(),
            self.path.display()
        );
        Ok(self.bundles.get_or_init(|| file.entrypoints))
    }
}

impl EntryPointsSource for JsonEntryPoints {
    fn bundle(&self, bundle: &str) -> Result<Option<BundleEntries>, AssetSourceError> {
        Ok(self.bundles()?.get(bundle).cloned())
    }
}

/// Resolved entry point paths.
///
/// Serializes as a plain array (`Flat`) or an object keyed by type (`ByType`),
/// which is what templates iterate over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryPointList {
    /// Paths of a single requested type
    Flat(Vec<String>),
    /// Paths of every type, keyed by type
    ByType(BTreeMap<String, Vec<String>>),
}

impl EntryPointList {
    /// Whether no path was resolved.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(paths) => paths.is_empty(),
            Self::ByType(map) => map.values().all(Vec::is_empty),
        }
    }
}

fn push_unique(target: &mut Vec<String>, paths: Vec<String>) {
    for path in paths {
        if !target.contains(&path) {
            target.push(path);
        }
    }
}

/// Resolve `bundles` in order and merge their paths per type.
///
/// Unknown bundles contribute nothing. A path already collected for the same
/// type (a chunk shared by two bundles) is kept at its first position only.
pub fn select<S: AsRef<str>>(
    source: &dyn EntryPointsSource,
    bundles: &[S],
    asset_type: Option<&str>,
) -> Result<EntryPointList, AssetSourceError> {
    match asset_type {
        Some(asset_type) => {
            let mut paths = Vec::new();
            for bundle in bundles {
                let Some(mut entries) = source.bundle(bundle.as_ref())? else {
                    tracing::debug!("Entry point bundle \"{}\" not found", bundle.as_ref());
                    continue;
                };
                if let Some(found) = entries.remove(asset_type) {
                    push_unique(&mut paths, found);
                }
            }
            Ok(EntryPointList::Flat(paths))
        }
        None => {
            let mut by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for bundle in bundles {
                let Some(entries) = source.bundle(bundle.as_ref())? else {
                    tracing::debug!("Entry point bundle \"{}\" not found", bundle.as_ref());
                    continue;
                };
                for (asset_type, found) in entries {
                    push_unique(by_type.entry(asset_type).or_default(), found);
                }
            }
            Ok(EntryPointList::ByType(by_type))
        }
    }
}
