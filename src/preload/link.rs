//! `Link: rel=preload` header values.

use std::fmt::Write as _;

/// Parameters of a preload hint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadOptions {
    /// `as` attribute (`script`, `style`, `font`, ...)
    pub as_type: Option<String>,
    /// `type` attribute (MIME type)
    pub mime_type: Option<String>,
    /// Adds `crossorigin`
    pub crossorigin: bool,
    /// Adds `nopush` and bypasses the per-session cache
    pub nopush: bool,
}

impl PreloadOptions {
    /// Options with only the `as` attribute set.
    pub fn with_as(as_type: impl Into<String>) -> Self {
        Self {
            as_type: Some(as_type.into()),
            ..Self::default()
        }
    }

    /// Whether the hint asks the server to push the resource.
    pub fn push(&self) -> bool {
        !self.nopush
    }
}

/// Build the value of a `Link` header preloading `url`.
///
/// Empty `as`/`type` values are left out.
pub fn link_header_value(url: &str, options: &PreloadOptions) -> String {
    let mut value = format!("<{url}>; rel=preload");

    if let Some(as_type) = options.as_type.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(value, "; as={as_type}");
    }
    if let Some(mime_type) = options.mime_type.as_deref().filter(|v| !v.is_empty()) {
        let _ = write!(value, "; type={mime_type}");
    }
    if options.crossorigin {
        value.push_str("; crossorigin");
    }
    if options.nopush {
        value.push_str("; nopush");
    }

    value
}
