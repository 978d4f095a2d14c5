//! tera-encore - Tera templating with webpack-encore assets
//!
//! Integrates the [Tera](https://keats.github.io/tera/) template engine with
//! the build output of webpack-encore, so templates can resolve versioned
//! asset paths, render bundle entry points, and announce HTTP/2 preload hints.
//!
//! # Architecture Overview
//!
//! - A shared [`templating::TemplateEngine`] holds the parsed templates,
//!   extensions and global variables.
//! - Each request opens a [`templating::RequestRenderer`] scope. The scope
//!   binds the asset functions to a fresh [`extension::AssetRuntime`] whose
//!   preload cache is read from the request cookies.
//! - Templates call `asset()`, `entrypoints()`, `entrypoints_list()` and
//!   `preload()`. Preload hints accumulate as `Link` and `Set-Cookie` header
//!   lines that the handler copies into its response.
//!
//! # Core Modules
//!
//! - [`assets`] - `manifest.json` and `entrypoints.json` sources
//! - [`preload`] - preload cache and `Link` header values
//! - [`response`] - cookies and outgoing header lines
//! - [`extension`] - template functions, filters and the extension registry
//! - [`templating`] - engine, request scopes, block rendering, timing
//! - [`container`] / [`package`] - service registration
//! - [`controller`] - rendering capability for request handlers
//! - [`config`] - TOML configuration with embedded defaults
//! - [`core`] - error types
//! - [`cli`] - the `tera-encore` developer tool
//!
//! # Template Functions
//!
//! ```text
//! <link rel="stylesheet" href="{{ asset(key="website.css") }}">
//! {{ entrypoints(entry="website", type="js", defer=true) }}
//! {% for path in entrypoints_list(entry=["website", "admin"], type="css") %}...{% endfor %}
//! <link rel="preload" href="{{ preload(url="/fonts/a.woff2", as_type="font", crossorigin=true) }}">
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [templating]
//! debug = false
//! autoescape = true
//! extensions = []
//!
//! [templating.paths]
//! __main__ = "templates"
//! admin = "admin/templates"
//!
//! [templating.globals]
//! site_name = "Example"
//!
//! [assets]
//! manifest = "public/assets/manifest.json"
//! entrypoints = "public/assets/entrypoints.json"
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod constants;
pub mod container;
pub mod controller;
pub mod core;
pub mod extension;
pub mod package;
pub mod preload;
pub mod response;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
