//! Asset sources: the manifest and the entry points.
//!
//! [`Assets`] holds the two optional sources the template functions read.
//! A source is *unavailable* when it is not configured or when its file does
//! not exist; that is reported differently from a key missing in a loaded
//! source (see [`crate::core::AssetError`]).

pub mod entry_points;
pub mod manifest;

pub use entry_points::{
    BundleEntries, EntryPointList, EntryPointsSource, JsonEntryPoints, select,
};
pub use manifest::{JsonManifest, ManifestSource};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AssetsConfig;

/// The manifest and entry points available to templates.
#[derive(Clone, Default)]
pub struct Assets {
    manifest: Option<Arc<dyn ManifestSource>>,
    entry_points: Option<Arc<dyn EntryPointsSource>>,
}

impl std::fmt::Debug for Assets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assets")
            .field("manifest", &self.manifest.is_some())
            .field("entry_points", &self.entry_points.is_some())
            .finish()
    }
}

impl Assets {
    /// Assets with no source at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the JSON sources from configuration.
    ///
    /// Relative paths resolve against `base_dir`. A configured file that does
    /// not exist leaves that source unavailable.
    pub fn from_config(config: &AssetsConfig, base_dir: &Path) -> Self {
        let manifest = existing_file(config.manifest.as_deref(), base_dir, "Manifest")
            .map(|path| Arc::new(JsonManifest::new(path)) as Arc<dyn ManifestSource>);
        let entry_points = existing_file(config.entrypoints.as_deref(), base_dir, "Entry points")
            .map(|path| Arc::new(JsonEntryPoints::new(path)) as Arc<dyn EntryPointsSource>);

        Self {
            manifest,
            entry_points,
        }
    }

    /// Use `manifest` as the manifest source.
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl ManifestSource + 'static) -> Self {
        self.manifest = Some(Arc::new(manifest));
        self
    }

    /// Use `entry_points` as the entry points source.
    #[must_use]
    pub fn with_entry_points(mut self, entry_points: impl EntryPointsSource + 'static) -> Self {
        self.entry_points = Some(Arc::new(entry_points));
        self
    }

    /// The manifest source, if available.
    pub fn manifest(&self) -> Option<&dyn ManifestSource> {
        self.manifest.as_deref()
    }

    /// The entry points source, if available.
    pub fn entry_points(&self) -> Option<&dyn EntryPointsSource> {
        self.entry_points.as_deref()
    }
}

/// Resolve a configured path, `None` when unset, empty or missing on disk.
fn existing_file(path: Option<&Path>, base_dir: &Path, what: &str) -> Option<PathBuf> {
    let path = path.filter(|path| !path.as_os_str().is_empty())?;
    let path = base_dir.join(path);
    if path.is_file() {
        Some(path)
    } else {
        tracing::warn!("{} file not found: {}", what, path.display());
        None
    }
}
