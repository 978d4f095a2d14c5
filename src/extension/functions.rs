//! Tera adapters for [`AssetRuntime`].
//!
//! | Template                                                  | Runtime call                        |
//! |-----------------------------------------------------------|-------------------------------------|
//! | `{{ asset(key="website.css") }}`                          | [`AssetRuntime::asset`]             |
//! | `{{ entrypoints(entry="website", defer=true) }}`          | [`AssetRuntime::entry_points`]      |
//! | `{{ entrypoints_list(entry=["website", "admin"]) }}`      | [`AssetRuntime::entry_points_list`] |
//! | `{{ preload(url="/f.woff2", as_type="font") }}`           | [`AssetRuntime::preload`]           |
//! | `{{ "/f.woff2" \| preload(as_type="font") }}`             | [`AssetRuntime::preload`]           |
//!
//! Tera only has keyword arguments, so the `options` mapping of the runtime
//! calls is flattened into arguments. `entrypoints(preload=...)` accepts
//! `true` or an object such as `{"as": "script", "crossorigin": true}`, taken
//! from a variable or built with `'{...}' | json_decode`.
//! Preload parameters accept both `as`/`type` and `as_type`/`mime_type`.
//!
//! `asset` and `preload` return URLs unchanged; Tera escapes them where
//! auto-escaping is on.

use std::collections::HashMap;
use std::sync::Arc;
use tera::{Error, Filter, Function, Result, Tera, Value};

use super::asset_runtime::{AssetRuntime, EntryPointsOptions};
use crate::preload::PreloadOptions;

/// Register the asset functions of `runtime` on `tera`.
pub fn register_runtime(tera: &mut Tera, runtime: Arc<AssetRuntime>) {
    tera.register_function("asset", AssetFunction::new(runtime.clone()));
    tera.register_function("entrypoints", EntryPointsFunction::new(runtime.clone()));
    tera.register_function("entrypoints_list", EntryPointsListFunction::new(runtime.clone()));
    tera.register_function("preload", PreloadFunction::new(runtime.clone()));
    tera.register_filter("preload", PreloadFilter::new(runtime));
}

/// PHP-like truthiness of an argument.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn flag(args: &HashMap<String, Value>, name: &str) -> bool {
    args.get(name).is_some_and(truthy)
}

fn optional_str(
    args: &HashMap<String, Value>,
    function: &str,
    names: &[&str],
) -> Result<Option<String>> {
    for name in names {
        match args.get(*name) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(other) => {
                return Err(Error::msg(format!(
                    "Function `{function}` received an invalid `{name}` argument: expected a string, got {other}"
                )));
            }
        }
    }
    Ok(None)
}

fn required_str(args: &HashMap<String, Value>, function: &str, name: &str) -> Result<String> {
    optional_str(args, function, &[name])?
        .ok_or_else(|| Error::msg(format!("Function `{function}` requires a `{name}` argument")))
}

/// `entry` argument: one bundle name or an array of names.
fn bundles(args: &HashMap<String, Value>, function: &str) -> Result<Vec<String>> {
    match args.get("entry") {
        Some(Value::String(name)) => Ok(vec![name.clone()]),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    Error::msg(format!("Function `{function}` expects bundle names as strings, got {name}"))
                })
            })
            .collect(),
        Some(other) => Err(Error::msg(format!(
            "Function `{function}` expects `entry` to be a string or an array, got {other}"
        ))),
        None => Err(Error::msg(format!("Function `{function}` requires an `entry` argument"))),
    }
}

/// Preload parameters from keyword arguments or from a JSON object.
fn preload_options(params: &HashMap<String, Value>, function: &str) -> Result<PreloadOptions> {
    Ok(PreloadOptions {
        as_type: optional_str(params, function, &["as_type", "as"])?,
        mime_type: optional_str(params, function, &["mime_type", "type"])?,
        crossorigin: flag(params, "crossorigin"),
        nopush: flag(params, "nopush"),
    })
}

fn runtime_error(function: &str, error: crate::core::AssetError) -> Error {
    Error::chain(format!("Function `{function}` failed"), error)
}

/// `asset(key=...)`
pub struct AssetFunction {
    runtime: Arc<AssetRuntime>,
}

impl AssetFunction {
    /// Bind to `runtime`.
    pub fn new(runtime: Arc<AssetRuntime>) -> Self {
        Self { runtime }
    }
}

impl Function for AssetFunction {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let key = required_str(args, "asset", "key")?;
        let path = self.runtime.asset(&key).map_err(|e| runtime_error("asset", e))?;
        Ok(Value::String(path))
    }
}

/// `entrypoints(entry=..., type=..., preload=..., defer=..., async=...)`
///
/// The markup is returned as safe: paths are sanitized by the runtime.
pub struct EntryPointsFunction {
    runtime: Arc<AssetRuntime>,
}

impl EntryPointsFunction {
    /// Bind to `runtime`.
    pub fn new(runtime: Arc<AssetRuntime>) -> Self {
        Self { runtime }
    }
}

impl Function for EntryPointsFunction {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        const NAME: &str = "entrypoints";

        let bundles = bundles(args, NAME)?;
        let asset_type = optional_str(args, NAME, &["type"])?;

        let preload = match args.get("preload") {
            Some(Value::Object(params)) => {
                let params: HashMap<String, Value> =
                    params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                Some(preload_options(&params, NAME)?)
            }
            Some(value) if truthy(value) => Some(PreloadOptions::default()),
            _ => None,
        };
        let options = EntryPointsOptions {
            preload,
            defer: flag(args, "defer"),
            async_: flag(args, "async"),
        };

        let html = self
            .runtime
            .entry_points(&bundles, asset_type.as_deref(), &options)
            .map_err(|e| runtime_error(NAME, e))?;
        Ok(Value::String(html))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// `entrypoints_list(entry=..., type=...)`
pub struct EntryPointsListFunction {
    runtime: Arc<AssetRuntime>,
}

impl EntryPointsListFunction {
    /// Bind to `runtime`.
    pub fn new(runtime: Arc<AssetRuntime>) -> Self {
        Self { runtime }
    }
}

impl Function for EntryPointsListFunction {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        const NAME: &str = "entrypoints_list";

        let bundles = bundles(args, NAME)?;
        let asset_type = optional_str(args, NAME, &["type"])?;
        let list = self
            .runtime
            .entry_points_list(&bundles, asset_type.as_deref())
            .map_err(|e| runtime_error(NAME, e))?;
        Ok(tera::to_value(list)?)
    }
}

/// `preload(url=..., as_type=..., mime_type=..., crossorigin=..., nopush=...)`
pub struct PreloadFunction {
    runtime: Arc<AssetRuntime>,
}

impl PreloadFunction {
    /// Bind to `runtime`.
    pub fn new(runtime: Arc<AssetRuntime>) -> Self {
        Self { runtime }
    }
}

impl Function for PreloadFunction {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let url = required_str(args, "preload", "url")?;
        let options = preload_options(args, "preload")?;
        Ok(Value::String(self.runtime.preload(&url, &options)))
    }
}

/// `"/font.woff2" | preload(as_type="font")`
pub struct PreloadFilter {
    runtime: Arc<AssetRuntime>,
}

impl PreloadFilter {
    /// Bind to `runtime`.
    pub fn new(runtime: Arc<AssetRuntime>) -> Self {
        Self { runtime }
    }
}

impl Filter for PreloadFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
        let url = value
            .as_str()
            .ok_or_else(|| Error::msg(format!("Filter `preload` expects a string, got {value}")))?;
        let options = preload_options(args, "preload")?;
        Ok(Value::String(self.runtime.preload(url, &options)))
    }
}
