//! HTTP/2 preload hints.
//!
//! - [`cache`]: the set of URLs already pushed to a client, persisted in cookies
//! - [`link`]: `Link` header values and their options
//!
//! The emitter combining both lives in
//! [`crate::extension::asset_runtime::AssetRuntime::preload`].

pub mod cache;
pub mod link;

pub use cache::{PreloadCache, hash_url};
pub use link::{PreloadOptions, link_header_value};
