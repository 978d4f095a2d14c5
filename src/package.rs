//! Package registration.
//!
//! A [`Package`] contributes default configuration and services to a
//! [`ServiceContainer`]. [`TemplatingPackage`] registers:
//!
//! | Service      | Type                      |
//! |--------------|---------------------------|
//! | `assets`     | [`Assets`]                |
//! | `templating` | [`TemplateEngine`]        |

use std::sync::Arc;

use crate::assets::Assets;
use crate::config::EncoreConfig;
use crate::constants::{ASSETS_SERVICE, TEMPLATING_SERVICE};
use crate::container::ServiceContainer;
use crate::core::{ConfigError, ContainerError};
use crate::extension::ExtensionRegistry;
use crate::templating::TemplateEngine;

/// A unit of configuration and services.
pub trait Package {
    /// Configuration used when the host provides none.
    fn default_config() -> Result<EncoreConfig, ConfigError>;

    /// Add the package's services to `container`.
    fn register(container: &mut ServiceContainer);
}

/// Template engine and asset sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatingPackage;

impl TemplatingPackage {
    /// Register the services, resolving configured extensions through `registry`.
    pub fn register_with(container: &mut ServiceContainer, registry: ExtensionRegistry) {
        container.add_service(ASSETS_SERVICE, |c| {
            Ok(Assets::from_config(&c.config().assets, c.base_dir()))
        });

        container.add_service(TEMPLATING_SERVICE, move |c| {
            let assets = c.get::<Assets>(ASSETS_SERVICE)?;
            TemplateEngine::with_registry(
                &c.config().templating,
                c.base_dir(),
                assets,
                c.timeline().clone(),
                &registry,
            )
        });
    }

    /// The shared template engine of `container`.
    pub fn engine(container: &ServiceContainer) -> Result<Arc<TemplateEngine>, ContainerError> {
        container.get::<TemplateEngine>(TEMPLATING_SERVICE)
    }
}

impl Package for TemplatingPackage {
    fn default_config() -> Result<EncoreConfig, ConfigError> {
        EncoreConfig::defaults()
    }

    fn register(container: &mut ServiceContainer) {
        Self::register_with(container, ExtensionRegistry::with_builtins());
    }
}
