//! `tera-encore render <TEMPLATE>`

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;
use tera::Context;

use crate::container::ServiceContainer;
use crate::package::TemplatingPackage;

/// Render a template to stdout.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template name, e.g. `index.html` or `@admin/layout.html`
    template: String,

    /// Render only this block
    #[arg(long)]
    block: Option<String>,

    /// Template variable as `key=value`; values are parsed as JSON when possible
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, Value)>,

    /// `Cookie` header of the simulated request
    #[arg(long)]
    cookie: Option<String>,

    /// Print emitted response headers to stderr
    #[arg(long)]
    headers: bool,
}

/// Parse `key=value`, reading the value as JSON and falling back to a string.
fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{raw}\""))?;
    if key.is_empty() {
        return Err(format!("empty variable name in \"{raw}\""));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

impl RenderCommand {
    pub fn execute(self, container: &ServiceContainer) -> Result<()> {
        let engine = TemplatingPackage::engine(container)?;
        let scope = engine.request(self.cookie.as_deref());

        let mut context = Context::new();
        for (key, value) in &self.vars {
            context.insert(key.as_str(), value);
        }

        let output = match &self.block {
            Some(block) => scope
                .render_block(&self.template, block, &context)
                .with_context(|| format!("Failed to render block \"{block}\""))?,
            None => scope.render(&self.template, &context)?,
        };
        print!("{output}");

        let headers = scope.take_headers();
        if self.headers {
            for line in headers.lines() {
                eprintln!("{line}");
            }
        }
        Ok(())
    }
}
