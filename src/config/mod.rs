//! Configuration for tera-encore
//!
//! Configuration is a TOML file with two tables:
//!
//! ```toml
//! [templating]
//! debug = false
//! autoescape = true
//! extensions = []
//!
//! [templating.paths]
//! __main__ = "templates"
//! admin = "admin/templates"     # templates named "@admin/..."
//!
//! [templating.globals]
//! site_name = "Example"
//!
//! [assets]
//! manifest = "public/assets/manifest.json"
//! entrypoints = "public/assets/entrypoints.json"
//! ```
//!
//! Every key is optional; missing keys take the values of the embedded
//! defaults ([`DEFAULT_CONFIG`]). Relative paths are resolved against the
//! directory of the configuration file (see [`EncoreConfig::base_dir_for`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::MAIN_NAMESPACE;
use crate::core::ConfigError;

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../resources/config.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EncoreConfig {
    /// Template engine settings
    #[serde(default)]
    pub templating: TemplatingConfig,

    /// Asset source settings
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Template engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatingConfig {
    /// Namespace → template directory.
    ///
    /// Templates under the `__main__` namespace are named by their relative
    /// path; other namespaces prefix names with `@<namespace>/`.
    pub paths: BTreeMap<String, PathBuf>,

    /// Registers the debug extension (`dump()`)
    pub debug: bool,

    /// Auto-escape `.html`, `.htm` and `.xml` templates
    pub autoescape: bool,

    /// Extension identifiers to instantiate, in order
    pub extensions: Vec<String>,

    /// Variables injected into every template
    pub globals: BTreeMap<String, serde_json::Value>,
}

impl Default for TemplatingConfig {
    fn default() -> Self {
        Self {
            paths: BTreeMap::from([(MAIN_NAMESPACE.to_string(), PathBuf::from("templates"))]),
            debug: false,
            autoescape: true,
            extensions: Vec::new(),
            globals: BTreeMap::new(),
        }
    }
}

/// Asset source settings.
///
/// An empty path disables the corresponding source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Path of the manifest file
    pub manifest: Option<PathBuf>,

    /// Path of the entry points file
    pub entrypoints: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            manifest: Some(PathBuf::from("public/assets/manifest.json")),
            entrypoints: Some(PathBuf::from("public/assets/entrypoints.json")),
        }
    }
}

impl EncoreConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// The embedded default configuration.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG, "<embedded defaults>")
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, the embedded defaults otherwise.
    pub fn load_with_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::defaults(),
        }
    }

    /// Directory relative paths of a configuration loaded from `path` resolve against.
    pub fn base_dir_for(path: Option<&Path>) -> PathBuf {
        path.and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}
