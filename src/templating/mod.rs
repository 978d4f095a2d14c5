//! Tera integration.
//!
//! [`TemplateEngine`] owns the configured Tera instance: templates loaded from
//! namespaced directories, the core extension plus configured extensions,
//! and global variables. It is `Send + Sync` and shared between requests.
//!
//! Asset functions need per-request state (the client's preload cache and the
//! headers emitted so far), so they are bound in a [`RequestRenderer`]:
//!
//! ```rust,no_run
//! # use std::path::Path;
//! # use std::sync::Arc;
//! # use tera_encore::assets::Assets;
//! # use tera_encore::config::TemplatingConfig;
//! # use tera_encore::templating::{TemplateEngine, timeline::NoopTimeline};
//! # fn main() -> anyhow::Result<()> {
//! let engine = TemplateEngine::new(
//!     &TemplatingConfig::default(),
//!     Path::new("."),
//!     Arc::new(Assets::new()),
//!     Arc::new(NoopTimeline),
//! )?;
//!
//! let scope = engine.request(Some("h2pushes_0123=1"));
//! let html = scope.render("index.html", &tera::Context::new())?;
//! let headers = scope.take_headers(); // Link + Set-Cookie lines
//! # Ok(())
//! # }
//! ```
//!
//! Every render is timed into the engine's [`Timeline`] and logged at debug
//! level.

pub mod blocks;
pub mod diagnostics;
pub mod loader;
pub mod timeline;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tera::{Context, ErrorKind, Tera};

use crate::assets::Assets;
use crate::config::TemplatingConfig;
use crate::core::RenderError;
use crate::extension::{
    AssetRuntime, CoreExtension, DebugExtension, Extension, ExtensionRegistry, register_runtime,
};
use crate::preload::PreloadCache;
use crate::response::{RequestCookies, ResponseHeaders};

pub use diagnostics::format_tera_error;
pub use timeline::{Activity, ActivityLog, NoopTimeline, Timeline};

/// Activity name of whole template renders.
pub const RENDER_ACTIVITY: &str = "template rendering";
/// Activity name of block renders.
pub const BLOCK_ACTIVITY: &str = "template block rendering";

/// Configured template engine.
pub struct TemplateEngine {
    tera: Tera,
    /// Template sources by name, kept for block lookups
    sources: BTreeMap<String, String>,
    globals: Context,
    assets: Arc<Assets>,
    timeline: Arc<dyn Timeline>,
}

impl TemplateEngine {
    /// Build an engine with the built-in extensions available.
    ///
    /// Relative template paths resolve against `base_dir`.
    pub fn new(
        config: &TemplatingConfig,
        base_dir: &Path,
        assets: Arc<Assets>,
        timeline: Arc<dyn Timeline>,
    ) -> anyhow::Result<Self> {
        Self::with_registry(config, base_dir, assets, timeline, &ExtensionRegistry::with_builtins())
    }

    /// Build an engine resolving `config.extensions` through `registry`.
    pub fn with_registry(
        config: &TemplatingConfig,
        base_dir: &Path,
        assets: Arc<Assets>,
        timeline: Arc<dyn Timeline>,
        registry: &ExtensionRegistry,
    ) -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        if !config.autoescape {
            tera.autoescape_on(vec![]);
        }

        CoreExtension.register(&mut tera);
        if config.debug {
            DebugExtension.register(&mut tera);
        }
        for extension in registry.create_all(config.extensions.as_slice())? {
            tracing::debug!("Registering template extension \"{}\"", extension.name());
            extension.register(&mut tera);
        }

        let mut globals = Context::new();
        for (name, value) in &config.globals {
            globals.insert(name.as_str(), value);
        }

        let mut engine = Self {
            tera,
            sources: BTreeMap::new(),
            globals,
            assets,
            timeline,
        };

        // All namespaces go in at once: templates may extend across namespaces.
        let mut templates = Vec::new();
        for (namespace, path) in &config.paths {
            templates.extend(loader::load_directory(&base_dir.join(path), namespace)?);
        }
        engine.add_templates(templates)?;

        Ok(engine)
    }

    /// Add templates from source, all at once.
    pub fn add_templates<I, N, S>(&mut self, templates: I) -> Result<(), RenderError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let templates: Vec<(String, String)> =
            templates.into_iter().map(|(name, source)| (name.into(), source.into())).collect();
        if templates.is_empty() {
            return Ok(());
        }

        self.tera.add_raw_templates(templates.iter().map(|(n, s)| (n.as_str(), s.as_str())))?;
        self.sources.extend(templates);
        Ok(())
    }

    /// Add one template from source.
    pub fn add_template(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<(), RenderError> {
        let template: (String, String) = (name.into(), source.into());
        self.add_templates([template])
    }

    /// Load every file under `path` into `namespace`.
    pub fn register_path(&mut self, path: &Path, namespace: &str) -> Result<(), RenderError> {
        let templates = loader::load_directory(path, namespace)?;
        self.add_templates(templates)
    }

    /// Make `value` available to every template as `name`.
    ///
    /// Variables passed at render time take precedence.
    pub fn add_global<T: Serialize + ?Sized>(&mut self, name: impl Into<String>, value: &T) -> Result<(), RenderError> {
        self.globals.try_insert(name, value)?;
        Ok(())
    }

    /// Names of loaded templates, sorted.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn assets(&self) -> &Arc<Assets> {
        &self.assets
    }

    /// Open a request scope, reading the preload cache from a `Cookie` header.
    pub fn request(&self, cookie_header: Option<&str>) -> RequestRenderer<'_> {
        let cookies = cookie_header.map(RequestCookies::parse).unwrap_or_default();
        self.request_with_cookies(&cookies)
    }

    /// Open a request scope from already parsed cookies.
    pub fn request_with_cookies(&self, cookies: &RequestCookies) -> RequestRenderer<'_> {
        self.scope(PreloadCache::from_cookies(cookies))
    }

    fn scope(&self, cache: PreloadCache) -> RequestRenderer<'_> {
        let runtime = Arc::new(AssetRuntime::new(self.assets.clone(), cache));
        let mut tera = self.tera.clone();
        register_runtime(&mut tera, runtime.clone());
        RequestRenderer {
            engine: self,
            tera,
            runtime,
        }
    }

    /// Render `name` in a scope without cookies; emitted headers are dropped.
    pub fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        let scope = self.scope(PreloadCache::new());
        let output = scope.render(name, context)?;
        scope.discard_headers();
        Ok(output)
    }

    /// Render `value` serialized as the context of `name`.
    pub fn render_serialized<T: Serialize>(&self, name: &str, value: &T) -> Result<String, RenderError> {
        let context = Context::from_serialize(value).map_err(|e| RenderError::render(name, e))?;
        self.render(name, &context)
    }

    /// Render one block of `name` in a scope without cookies.
    pub fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        let scope = self.scope(PreloadCache::new());
        let output = scope.render_block(name, block, context)?;
        scope.discard_headers();
        Ok(output)
    }

    /// Whether `name` or one of the templates it extends defines `block`.
    pub fn has_block(&self, name: &str, block: &str) -> Result<bool, RenderError> {
        if !self.has_template(name) {
            return Err(self.engine_error(name, tera::Error::template_not_found(name)));
        }
        Ok(self.extends_chain(name).iter().any(|source| blocks::defines_block(source, block)))
    }

    /// Sources of `name` and its ancestors, child first.
    fn extends_chain(&self, name: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let mut chain = Vec::new();
        let mut current = self.sources.get_key_value(name);

        while let Some((template, source)) = current {
            if names.contains(&template.as_str()) {
                break;
            }
            names.push(template.as_str());
            chain.push(source.as_str());
            current = blocks::parent_template(source).and_then(|parent| self.sources.get_key_value(parent));
        }
        chain
    }

    fn context_with_globals(&self, context: &Context) -> Context {
        let mut merged = self.globals.clone();
        merged.extend(context.clone());
        merged
    }

    fn timed<T>(&self, activity: &str, description: String, f: impl FnOnce() -> T) -> T {
        let (result, activity) = Activity::measure(activity, description, f);
        tracing::debug!("{} done in {:.4}ms", activity.description, activity.millis());
        self.timeline.record(activity);
        result
    }

    fn engine_error(&self, name: &str, error: tera::Error) -> RenderError {
        if let ErrorKind::TemplateNotFound(missing) = &error.kind {
            let similar = diagnostics::similar_names(missing, self.template_names());
            if similar.is_empty() {
                tracing::warn!("Template \"{}\" not found", missing);
            } else {
                tracing::warn!("Template \"{}\" not found, did you mean: {}", missing, similar.join(", "));
            }
        } else {
            tracing::debug!("Rendering of template \"{}\" failed: {}", name, format_tera_error(&error));
        }
        RenderError::Engine(error)
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("templates", &self.sources.keys().collect::<Vec<_>>())
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

/// Template rendering bound to one request.
///
/// Asset functions rendered through this scope share one preload cache, so
/// a URL is pushed once however many templates reference it.
pub struct RequestRenderer<'a> {
    engine: &'a TemplateEngine,
    tera: Tera,
    runtime: Arc<AssetRuntime>,
}

impl RequestRenderer<'_> {
    pub fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        let context = self.engine.context_with_globals(context);
        self.engine
            .timed(RENDER_ACTIVITY, format!("Rendering of template \"{name}\""), || {
                self.tera.render(name, &context)
            })
            .map_err(|e| self.engine.engine_error(name, e))
    }

    pub fn render_serialized<T: Serialize>(&self, name: &str, value: &T) -> Result<String, RenderError> {
        let context = Context::from_serialize(value).map_err(|e| RenderError::render(name, e))?;
        self.render(name, &context)
    }

    /// Render only `block` of `name`.
    pub fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        let description = format!("Rendering of block \"{block}\" in template \"{name}\"");
        self.engine
            .timed(BLOCK_ACTIVITY, description, || self.render_wrapper(name, block, context))
    }

    fn render_wrapper(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        let not_found = || RenderError::BlockNotFound {
            template: name.to_string(),
            block: block.to_string(),
        };
        if !self.engine.has_block(name, block)? {
            return Err(not_found());
        }

        let wrapper_name = blocks::wrapper_name(name, block);
        let wrapper = blocks::wrapper_source(name, block, &self.engine.extends_chain(name));

        let mut tera = self.tera.clone();
        tera.add_raw_template(&wrapper_name, &wrapper).map_err(|e| self.engine.engine_error(name, e))?;
        let output = tera
            .render(&wrapper_name, &self.engine.context_with_globals(context))
            .map_err(|e| self.engine.engine_error(name, e))?;

        blocks::extract(&output).map(str::to_string).ok_or_else(not_found)
    }

    pub fn has_block(&self, name: &str, block: &str) -> Result<bool, RenderError> {
        self.engine.has_block(name, block)
    }

    /// Take the `Link` and `Set-Cookie` lines emitted so far.
    pub fn take_headers(&self) -> ResponseHeaders {
        self.runtime.take_headers()
    }

    /// Snapshot of the scope's preload cache.
    pub fn preload_cache(&self) -> PreloadCache {
        self.runtime.preload_cache()
    }

    pub fn runtime(&self) -> &Arc<AssetRuntime> {
        &self.runtime
    }

    fn discard_headers(&self) {
        let headers = self.take_headers();
        if !headers.is_empty() {
            tracing::debug!("Discarding {} header line(s) emitted outside a request scope", headers.len());
        }
    }
}
