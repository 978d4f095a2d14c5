//! `tera-encore entrypoints <BUNDLE>...`

use anyhow::Result;
use clap::Args;

use crate::assets::Assets;
use crate::constants::ASSETS_SERVICE;
use crate::container::ServiceContainer;
use crate::extension::{AssetRuntime, EntryPointsOptions};
use crate::preload::{PreloadCache, PreloadOptions};

/// List or render the entry points of bundles.
///
/// Prints JSON by default: a list when `--type` is given, a map by type
/// otherwise.
#[derive(Args, Debug)]
pub struct EntryPointsCommand {
    /// Bundle names, merged in order
    #[arg(required = true)]
    bundles: Vec<String>,

    /// Only this asset type (`css`, `js`, ...)
    #[arg(long = "type", value_name = "TYPE")]
    asset_type: Option<String>,

    /// Print `<link>`/`<script>` tags instead of JSON
    #[arg(long)]
    html: bool,

    /// Add `defer` to script tags
    #[arg(long, requires = "html")]
    defer: bool,

    /// Add `async` to script tags
    #[arg(long = "async", requires = "html")]
    async_: bool,

    /// Print the preload `Link` headers to stderr
    #[arg(long, requires = "html")]
    preload: bool,
}

impl EntryPointsCommand {
    pub fn execute(self, container: &ServiceContainer) -> Result<()> {
        let assets = container.get::<Assets>(ASSETS_SERVICE)?;
        let runtime = AssetRuntime::new(assets, PreloadCache::new());
        let asset_type = self.asset_type.as_deref();

        if !self.html {
            let list = runtime.entry_points_list(&self.bundles, asset_type)?;
            println!("{}", serde_json::to_string_pretty(&list)?);
            return Ok(());
        }

        let options = EntryPointsOptions {
            preload: self.preload.then(PreloadOptions::default),
            defer: self.defer,
            async_: self.async_,
        };
        print!("{}", runtime.entry_points(&self.bundles, asset_type, &options)?);
        for line in runtime.take_headers().lines() {
            eprintln!("{line}");
        }
        Ok(())
    }
}
