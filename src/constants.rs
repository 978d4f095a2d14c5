//! Constants shared across the crate.
//!
//! Cookie names, template namespaces and the service names used by the
//! package registration live here so that tests and host applications can
//! refer to them instead of repeating string literals.

/// Prefix of the cookies recording already pushed preload URLs.
///
/// One cookie per URL hash: `h2pushes_<hash>=1`.
pub const PRELOAD_COOKIE_PREFIX: &str = "h2pushes_";

/// Value stored in each preload cookie. Only the cookie name matters.
pub const PRELOAD_COOKIE_VALUE: &str = "1";

/// Number of hash bytes kept in a preload cookie name (hex encoded: twice as many chars).
pub const PRELOAD_HASH_BYTES: usize = 16;

/// Namespace whose templates are named without a `@namespace/` prefix.
pub const MAIN_NAMESPACE: &str = "__main__";

/// Service name of the template engine in the service container.
pub const TEMPLATING_SERVICE: &str = "templating";

/// Service name of the asset sources in the service container.
pub const ASSETS_SERVICE: &str = "assets";

/// Name of the response header carrying preload hints.
pub const LINK_HEADER: &str = "Link";

/// Name of the response header setting cookies.
pub const SET_COOKIE_HEADER: &str = "Set-Cookie";
