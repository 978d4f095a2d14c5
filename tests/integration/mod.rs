//! Integration test suite for tera-encore
//!
//! End-to-end tests over a temporary project with built assets
//! (`manifest.json`, `entrypoints.json`) and the templates in
//! `tests/fixtures/templates`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **asset_runtime**: asset resolution and entry points, function by function
//! - **preload**: `Link` headers, push de-duplication and the cookie round trip
//! - **rendering**: engine behavior (globals, namespaces, blocks, errors, timing)
//! - **package**: service container, package registration and controllers
//! - **cli**: the `tera-encore` binary

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;
#[path = "../fixtures/mod.rs"]
mod fixtures;

mod asset_runtime;
mod cli;
mod package;
mod preload;
