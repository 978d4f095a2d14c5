//! Error handling for tera-encore
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** for each layer, so callers can match on the
//!    failure they care about
//! 2. **One family at each boundary**: asset lookups fail with [`AssetError`],
//!    rendering fails with [`RenderError`], configuration with [`ConfigError`]
//!
//! # Error Categories
//!
//! - **Asset sources**: [`AssetSourceError`] is raised by manifest and entry
//!   point readers when a file can't be read or parsed
//! - **Asset resolution**: [`AssetError`] is what template functions raise
//!   (`ManifestUnavailable`, `AssetNotFound`, ...)
//! - **Rendering**: [`RenderError`] passes Tera errors through unchanged and
//!   wraps everything else into [`RenderError::Render`]
//! - **Configuration**: [`ConfigError`] for unreadable/invalid config files and
//!   unknown extension identifiers
//! - **Services**: [`ContainerError`] for the service container
//!
//! Use [`user_friendly_error`] at the CLI edge to turn any error into an
//! [`ErrorContext`] with a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tera_encore::core::{AssetError, user_friendly_error};
//!
//! let error = AssetError::AssetNotFound { key: "app.css".to_string() };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by a manifest or entry points reader.
///
/// These are "structural" problems of a source that exists: the file is there
/// but can't be read, or its JSON doesn't have the expected shape.
#[derive(Error, Debug)]
pub enum AssetSourceError {
    /// The file exists but reading it failed
    #[error("Failed to read asset file: {}", path.display())]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid for its format
    #[error("Invalid asset file: {}", path.display())]
    Parse {
        /// Path of the file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while resolving assets and entry points.
///
/// A missing key in the manifest is an error, a missing bundle in the entry
/// points is not: templates may reference optional bundles.
#[derive(Error, Debug)]
pub enum AssetError {
    /// No manifest configured, or its file is missing
    #[error("No manifest file")]
    ManifestUnavailable,

    /// The key is not present in the manifest
    #[error("Asset \"{key}\" not found in manifest file")]
    AssetNotFound {
        /// Requested asset key
        key: String,
    },

    /// The manifest source failed to read or parse its file
    #[error("Manifest treatment error")]
    ManifestCorrupt {
        /// Underlying source error
        #[source]
        source: AssetSourceError,
    },

    /// No entry points configured, or its file is missing
    #[error("No entry points file")]
    EntryPointsUnavailable,

    /// The entry points source failed to read or parse its file
    #[error("Entry points treatment error")]
    EntryPointsCorrupt {
        /// Underlying source error
        #[source]
        source: AssetSourceError,
    },
}

/// Errors raised at the rendering boundary.
///
/// Tera errors are carried as-is in [`RenderError::Engine`]. Errors raised by
/// template functions (such as [`AssetError`]) travel inside the Tera error
/// chain; use [`RenderError::asset_error`] to recover them.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Error from the template engine itself
    #[error(transparent)]
    Engine(#[from] tera::Error),

    /// Any other failure while rendering
    #[error("Failed to render template \"{template}\"")]
    Render {
        /// Template being rendered
        template: String,
        /// Original cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The requested block is not defined by the template or its parents
    #[error("Block \"{block}\" not found in template \"{template}\"")]
    BlockNotFound {
        /// Template name
        template: String,
        /// Block name
        block: String,
    },

    /// A template file couldn't be read
    #[error("Failed to load template file: {}", path.display())]
    Load {
        /// Path of the template file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Wrap any error as a generic rendering failure of `template`.
    pub fn render(
        template: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Render {
            template: template.into(),
            source: source.into(),
        }
    }

    /// Find the [`AssetError`] that caused this failure, if any.
    pub fn asset_error(&self) -> Option<&AssetError> {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(asset) = err.downcast_ref::<AssetError>() {
                return Some(asset);
            }
            current = err.source();
        }
        None
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file couldn't be read
    #[error("Failed to read configuration file: {}", path.display())]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`crate::config::EncoreConfig`]
    #[error("Invalid configuration in {origin}")]
    Parse {
        /// File path or "<embedded defaults>"
        origin: String,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// An extension identifier has no registered factory
    #[error("Unknown template extension \"{id}\"")]
    UnknownExtension {
        /// Identifier from the `extensions` list
        id: String,
    },
}

/// Service container errors.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// No service registered under that name
    #[error("Service \"{name}\" is not registered")]
    NotFound {
        /// Service name
        name: String,
    },

    /// The service exists but is not of the requested type
    #[error("Service \"{name}\" is not a {expected}")]
    TypeMismatch {
        /// Service name
        name: String,
        /// Requested type name
        expected: &'static str,
    },

    /// The service factory failed
    #[error("Failed to create service \"{name}\"")]
    Factory {
        /// Service name
        name: String,
        /// Factory error
        #[source]
        source: anyhow::Error,
    },
}

/// Error wrapper with a user-facing suggestion and details.
///
/// Suggestions are displayed in green, details in yellow.
#[derive(Debug)]
pub struct ErrorContext {
    /// The error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new context with no suggestion or details
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details about the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Join an error and its sources into one line.
fn error_chain(error: &anyhow::Error) -> String {
    error.chain().map(ToString::to_string).collect::<Vec<_>>().join(": ")
}

/// First error of type `E` in the cause chain of `error`.
fn find_cause<E: std::error::Error + 'static>(error: &anyhow::Error) -> Option<&E> {
    error.chain().find_map(|cause| cause.downcast_ref::<E>())
}

/// Convert any error into an [`ErrorContext`] with a suggestion.
///
/// Known error types get a targeted suggestion; anything else is displayed
/// with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = error_chain(&error);

    if let Some(render) = find_cause::<RenderError>(&error) {
        if let Some(asset) = render.asset_error() {
            return asset_error_context(message, asset);
        }
        return match render {
            RenderError::BlockNotFound { .. } => ErrorContext::new(message)
                .with_suggestion("Check the block name and the template's extends chain"),
            RenderError::Load { .. } => ErrorContext::new(message)
                .with_suggestion("Check that template files are readable UTF-8 text"),
            _ => ErrorContext::new(message)
                .with_suggestion("Run with --verbose to see the rendering context"),
        };
    }

    if let Some(asset) = find_cause::<AssetError>(&error) {
        return asset_error_context(message, asset);
    }

    if let Some(config) = find_cause::<ConfigError>(&error) {
        return match config {
            ConfigError::UnknownExtension { .. } => ErrorContext::new(message)
                .with_suggestion("Built-in extensions are \"core\" and \"debug\""),
            _ => ErrorContext::new(message)
                .with_suggestion("Check the TOML syntax of your configuration file")
                .with_details("See resources/config.default.toml for the expected layout"),
        };
    }

    ErrorContext::new(message)
}

fn asset_error_context(message: String, error: &AssetError) -> ErrorContext {
    match error {
        AssetError::ManifestUnavailable | AssetError::EntryPointsUnavailable => {
            ErrorContext::new(message)
                .with_suggestion("Build your assets or check the [assets] paths in the configuration")
        }
        AssetError::AssetNotFound { .. } => ErrorContext::new(message)
            .with_suggestion("Check the asset key against the keys in manifest.json"),
        AssetError::ManifestCorrupt { .. } | AssetError::EntryPointsCorrupt { .. } => {
            ErrorContext::new(message).with_details("The asset file exists but is not valid JSON")
        }
    }
}
