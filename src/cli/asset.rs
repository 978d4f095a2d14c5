//! `tera-encore asset <KEY>`

use anyhow::Result;
use clap::Args;

use crate::assets::Assets;
use crate::constants::ASSETS_SERVICE;
use crate::container::ServiceContainer;
use crate::extension::AssetRuntime;
use crate::preload::PreloadCache;

/// Resolve an asset key through the manifest.
#[derive(Args, Debug)]
pub struct AssetCommand {
    /// Manifest key, e.g. `website.css`
    key: String,
}

impl AssetCommand {
    pub fn execute(self, container: &ServiceContainer) -> Result<()> {
        let assets = container.get::<Assets>(ASSETS_SERVICE)?;
        let runtime = AssetRuntime::new(assets, PreloadCache::new());
        println!("{}", runtime.asset(&self.key)?);
        Ok(())
    }
}
