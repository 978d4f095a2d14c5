//! Temporary project with built assets.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::assets::Assets;
use crate::config::EncoreConfig;
use crate::container::ServiceContainer;
use crate::package::{Package, TemplatingPackage};
use crate::templating::{ActivityLog, TemplateEngine, Timeline};

/// `manifest.json` written by [`TestProject::new`].
pub const MANIFEST_JSON: &str = r#"{
  "website.css": "/assets/css/website.css",
  "website.js": "/assets/js/website.js",
  "admin.css": "/assets/css/admin.css",
  "admin.js": "/assets/js/admin.js"
}
"#;

/// `entrypoints.json` written by [`TestProject::new`].
pub const ENTRYPOINTS_JSON: &str = r#"{
  "entrypoints": {
    "website": {
      "css": ["/assets/css/website.css"],
      "js": ["/assets/js/website.js", "/assets/js/vendor.js"]
    },
    "admin": {
      "css": ["/assets/css/admin.css"],
      "js": ["/assets/js/admin.js"]
    }
  }
}
"#;

/// A temporary directory laid out with the default configuration paths:
/// `templates/` and `public/assets/{manifest,entrypoints}.json`.
#[derive(Debug)]
pub struct TestProject {
    dir: TempDir,
    config: EncoreConfig,
}

impl TestProject {
    /// A project with the sample manifest and entry points.
    pub fn new() -> Result<Self> {
        let project = Self::empty()?;
        project.write("public/assets/manifest.json", MANIFEST_JSON)?;
        project.write("public/assets/entrypoints.json", ENTRYPOINTS_JSON)?;
        Ok(project)
    }

    /// A project with an empty `templates/` directory and no asset files.
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        fs::create_dir_all(dir.path().join("templates"))?;
        Ok(Self {
            dir,
            config: EncoreConfig::default(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> &EncoreConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EncoreConfig {
        &mut self.config
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write a template of the main namespace.
    pub fn template(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.write(&format!("templates/{name}"), content)
    }

    /// Write the configuration as `encore.toml` and return its path.
    pub fn write_config(&self) -> Result<PathBuf> {
        let content = toml::to_string(&self.config)?;
        self.write("encore.toml", &content)
    }

    pub fn assets(&self) -> Assets {
        Assets::from_config(&self.config.assets, self.path())
    }

    pub fn engine(&self) -> Result<TemplateEngine> {
        self.engine_with_timeline(Arc::new(ActivityLog::new()))
    }

    pub fn engine_with_timeline(&self, timeline: Arc<dyn Timeline>) -> Result<TemplateEngine> {
        TemplateEngine::new(&self.config.templating, self.path(), Arc::new(self.assets()), timeline)
    }

    /// A container with the templating package registered.
    pub fn container(&self) -> ServiceContainer {
        let mut container = ServiceContainer::new(self.config.clone(), self.path());
        TemplatingPackage::register(&mut container);
        container
    }
}
