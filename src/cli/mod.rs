//! Command-line interface for tera-encore.
//!
//! A developer tool to exercise a project's templates and built assets
//! without running the web application.
//!
//! # Available Commands
//!
//! - `render` - Render a template (or one of its blocks) to stdout
//! - `asset` - Resolve an asset key through the manifest
//! - `entrypoints` - List or render the entry points of bundles
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Disable logging
//! - `--config <PATH>` - Configuration file; relative paths inside it resolve
//!   against its directory. Without it the embedded defaults are used,
//!   relative to the current directory.
//!
//! ```bash
//! tera-encore -c app/encore.toml render index.html --var title=Home --headers
//! tera-encore asset website.css
//! tera-encore entrypoints website admin --type js
//! tera-encore entrypoints website --html --defer
//! ```

mod asset;
mod entrypoints;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EncoreConfig;
use crate::container::ServiceContainer;
use crate::package::{Package, TemplatingPackage};

pub use asset::AssetCommand;
pub use entrypoints::EntryPointsCommand;
pub use render::RenderCommand;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter; `None` keeps `RUST_LOG` (or `info` when unset)
    pub log_level: Option<String>,

    /// Configuration file to load instead of the embedded defaults
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the configuration and register the templating services.
    pub fn container(&self) -> Result<ServiceContainer> {
        let path = self.config_path.as_deref();
        let config = EncoreConfig::load_with_optional(path)?;
        let mut container = ServiceContainer::new(config, EncoreConfig::base_dir_for(path));
        TemplatingPackage::register(&mut container);
        Ok(container)
    }
}

/// tera-encore command line.
#[derive(Parser, Debug)]
#[command(
    name = "tera-encore",
    about = "Render Tera templates with webpack-encore assets",
    version,
    long_about = "Renders Tera templates the way the web application does: namespaced template paths, \
                  manifest.json asset resolution, entrypoints.json bundles and HTTP/2 preload headers."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (TOML)
    #[arg(short, long, global = true, env = "TERA_ENCORE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template to stdout
    Render(RenderCommand),

    /// Resolve an asset key through the manifest
    Asset(AssetCommand),

    /// List or render the entry points of bundles
    #[command(name = "entrypoints")]
    EntryPoints(EntryPointsCommand),
}

impl Cli {
    /// Run the parsed command with settings from its own flags.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("off".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the parsed command with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let container = config.container()?;

        match self.command {
            Commands::Render(cmd) => cmd.execute(&container),
            Commands::Asset(cmd) => cmd.execute(&container),
            Commands::EntryPoints(cmd) => cmd.execute(&container),
        }
    }
}
