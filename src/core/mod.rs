//! Core types for tera-encore
//!
//! This module holds the error types shared by every layer of the crate:
//! asset sources, asset resolution, rendering, configuration and the service
//! container. See [`error`] for the propagation rules.

pub mod error;

pub use error::{
    AssetError, AssetSourceError, ConfigError, ContainerError, ErrorContext, RenderError,
    user_friendly_error,
};
