//! Template engine extensions.
//!
//! An [`Extension`] registers functions, filters or testers on a Tera
//! instance. Extensions are referenced by id from the `templating.extensions`
//! configuration list and built through an [`ExtensionRegistry`]:
//!
//! | Id      | Extension           | Provides                                               |
//! |---------|---------------------|--------------------------------------------------------|
//! | `core`  | [`CoreExtension`]   | `date_format`, `nl2p`, `human_file_size`, `json_decode` |
//! | `debug` | [`DebugExtension`]  | `dump`                                                 |
//!
//! The asset functions are not an extension: they depend on the request and
//! are bound per render by [`functions::register_runtime`].

pub mod asset_runtime;
pub mod debug;
pub mod filters;
pub mod functions;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tera::Tera;

use crate::core::ConfigError;

pub use asset_runtime::{AssetRuntime, EntryPointsOptions, strip_tags};
pub use debug::DebugExtension;
pub use functions::register_runtime;

/// A set of template functions and filters.
pub trait Extension: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Add the extension's functions and filters to `tera`.
    fn register(&self, tera: &mut Tera);
}

/// Filters of [`filters`].
#[derive(Debug, Default)]
pub struct CoreExtension;

impl Extension for CoreExtension {
    fn name(&self) -> &str {
        "core"
    }

    fn register(&self, tera: &mut Tera) {
        filters::register(tera);
    }
}

type ExtensionFactory = Arc<dyn Fn() -> Box<dyn Extension> + Send + Sync>;

/// Extension factories by id.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    factories: BTreeMap<String, ExtensionFactory>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing `core` and `debug`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("core", || Box::new(CoreExtension));
        registry.register("debug", || Box::new(DebugExtension));
        registry
    }

    /// Register `factory` under `id`, replacing any previous one.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Extension> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Known ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the extension registered under `id`.
    pub fn create(&self, id: &str) -> Result<Box<dyn Extension>, ConfigError> {
        self.factories
            .get(id)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownExtension { id: id.to_string() })
    }

    /// Build every extension in `ids`, in order.
    pub fn create_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Box<dyn Extension>>, ConfigError> {
        ids.iter().map(|id| self.create(id.as_ref())).collect()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry").field("ids", &self.factories.keys().collect::<Vec<_>>()).finish()
    }
}
