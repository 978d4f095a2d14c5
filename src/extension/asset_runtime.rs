//! Asset functions backing the template layer.
//!
//! One [`AssetRuntime`] lives for one request. It resolves manifest keys and
//! entry points against the shared [`Assets`], and emits preload hints into
//! its own [`ResponseHeaders`] with duplicate suppression through the
//! session's [`PreloadCache`].

use regex::Regex;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use crate::assets::{Assets, EntryPointList, select};
use crate::constants::LINK_HEADER;
use crate::core::AssetError;
use crate::preload::{PreloadCache, PreloadOptions, link_header_value};
use crate::response::{RequestCookies, ResponseHeaders};

/// Types rendered by [`AssetRuntime::entry_points`] when no type is requested, in order.
const RENDERED_TYPES: [&str; 2] = ["css", "js"];

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*(>|$)").expect("valid tag pattern"));

/// Remove markup tags (and an unterminated trailing `<...`) from `text`.
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Make `text` safe inside a double-quoted HTML attribute.
fn attribute_value(text: &str) -> String {
    strip_tags(text).replace('"', "&quot;")
}

/// Rendering options of [`AssetRuntime::entry_points`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointsOptions {
    /// Route every path through the preload emitter first.
    ///
    /// `as` defaults to `script` or `style` unless set here.
    pub preload: Option<PreloadOptions>,
    /// Add `defer` to script tags
    pub defer: bool,
    /// Add `async` to script tags
    pub async_: bool,
}

#[derive(Debug, Default)]
struct PreloadState {
    cache: PreloadCache,
    headers: ResponseHeaders,
}

/// Request-scoped asset functions.
#[derive(Debug)]
pub struct AssetRuntime {
    assets: Arc<Assets>,
    state: Mutex<PreloadState>,
}

impl AssetRuntime {
    /// A runtime whose preload cache starts as `cache`.
    pub fn new(assets: Arc<Assets>, cache: PreloadCache) -> Self {
        Self {
            assets,
            state: Mutex::new(PreloadState {
                cache,
                headers: ResponseHeaders::new(),
            }),
        }
    }

    /// A runtime whose preload cache is read from the request cookies.
    pub fn from_cookies(assets: Arc<Assets>, cookies: &RequestCookies) -> Self {
        Self::new(assets, PreloadCache::from_cookies(cookies))
    }

    fn state(&self) -> MutexGuard<'_, PreloadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve an asset key through the manifest.
    pub fn asset(&self, key: &str) -> Result<String, AssetError> {
        let manifest = self.assets.manifest().ok_or(AssetError::ManifestUnavailable)?;

        let corrupt = |source| AssetError::ManifestCorrupt { source };
        if !manifest.has(key).map_err(corrupt)? {
            return Err(AssetError::AssetNotFound {
                key: key.to_string(),
            });
        }

        manifest.get(key).map_err(corrupt)?.ok_or_else(|| AssetError::AssetNotFound {
            key: key.to_string(),
        })
    }

    /// Resolve entry points without rendering them.
    ///
    /// Returns a flat list when `asset_type` is given, a map by type otherwise.
    /// Unknown bundles contribute nothing.
    pub fn entry_points_list<S: AsRef<str>>(
        &self,
        bundles: &[S],
        asset_type: Option<&str>,
    ) -> Result<EntryPointList, AssetError> {
        let source = self.assets.entry_points().ok_or(AssetError::EntryPointsUnavailable)?;
        select(source, bundles, asset_type).map_err(|source| AssetError::EntryPointsCorrupt { source })
    }

    /// Render entry points as `<link>` and `<script>` tags, one per line.
    ///
    /// Without `asset_type`, stylesheets come before scripts.
    pub fn entry_points<S: AsRef<str>>(
        &self,
        bundles: &[S],
        asset_type: Option<&str>,
        options: &EntryPointsOptions,
    ) -> Result<String, AssetError> {
        let groups: Vec<(String, Vec<String>)> = match self.entry_points_list(bundles, asset_type)? {
            EntryPointList::Flat(paths) => {
                vec![(asset_type.unwrap_or_default().to_string(), paths)]
            }
            EntryPointList::ByType(mut by_type) => RENDERED_TYPES
                .iter()
                .filter_map(|t| by_type.remove(*t).map(|paths| (t.to_string(), paths)))
                .collect(),
        };

        let mut output = String::new();
        for (asset_type, paths) in groups {
            for path in paths {
                let path = strip_tags(&path);
                match asset_type.as_str() {
                    "js" => {
                        let path = self.preload_entry(path, "script", options);
                        output.push_str(&format!(
                            "<script src=\"{}\"{}{}></script>\n",
                            attribute_value(&path),
                            if options.defer { " defer" } else { "" },
                            if options.async_ { " async" } else { "" },
                        ));
                    }
                    "css" => {
                        let path = self.preload_entry(path, "style", options);
                        output.push_str(&format!(
                            "<link rel=\"stylesheet\" href=\"{}\">\n",
                            attribute_value(&path)
                        ));
                    }
                    other => tracing::trace!("Skipping entry point of type \"{}\": {}", other, path),
                }
            }
        }

        Ok(output)
    }

    fn preload_entry(&self, path: String, default_as: &str, options: &EntryPointsOptions) -> String {
        match &options.preload {
            Some(preload) => {
                let mut preload = preload.clone();
                if preload.as_type.is_none() {
                    preload.as_type = Some(default_as.to_string());
                }
                self.preload(&path, &preload)
            }
            None => path,
        }
    }

    /// Emit a `Link: rel=preload` header for `url` and return `url`.
    ///
    /// A URL already pushed in this session is skipped silently unless
    /// `nopush` is set; `nopush` hints are always emitted and never cached.
    pub fn preload(&self, url: &str, options: &PreloadOptions) -> String {
        let mut state = self.state();
        let push = options.push();

        if push && state.cache.contains_url(url) {
            tracing::trace!("Preload of {} already pushed in this session", url);
            return url.to_string();
        }

        let value = link_header_value(url, options);
        tracing::trace!("Preload header: {}", value);
        state.headers.append(LINK_HEADER, value);

        if push {
            if let Some(cookie) = state.cache.record(url) {
                state.headers.set_cookie(&cookie);
            }
        }

        url.to_string()
    }

    /// Take the header lines emitted so far, leaving the list empty.
    pub fn take_headers(&self) -> ResponseHeaders {
        std::mem::take(&mut self.state().headers)
    }

    /// Snapshot of the preload cache.
    pub fn preload_cache(&self) -> PreloadCache {
        self.state().cache.clone()
    }

    /// The shared asset sources.
    pub fn assets(&self) -> &Arc<Assets> {
        &self.assets
    }
}
