//! User-facing error conversion.

use anyhow::Context as _;

use tera_encore::core::{AssetError, ConfigError, RenderError, user_friendly_error};

#[test]
fn test_asset_not_found_suggests_manifest() {
    let error = anyhow::Error::new(AssetError::AssetNotFound {
        key: "a.css".to_string(),
    });
    let ctx = user_friendly_error(error);
    assert_eq!(ctx.message, "Asset \"a.css\" not found in manifest file");
    assert!(ctx.suggestion.as_deref().is_some_and(|s| s.contains("manifest.json")));
}

#[test]
fn test_context_is_kept_in_message() {
    let error: anyhow::Result<()> = Err(AssetError::ManifestUnavailable.into());
    let ctx = user_friendly_error(error.context("Failed to resolve asset").unwrap_err());
    assert_eq!(ctx.message, "Failed to resolve asset: No manifest file");
    assert!(ctx.suggestion.is_some());
}

#[test]
fn test_block_not_found() {
    let error = anyhow::Error::new(RenderError::BlockNotFound {
        template: "page.html".to_string(),
        block: "sidebar".to_string(),
    });
    let ctx = user_friendly_error(error);
    assert!(ctx.suggestion.as_deref().is_some_and(|s| s.contains("block name")));
}

#[test]
fn test_unknown_extension_lists_builtins() {
    let error = anyhow::Error::new(ConfigError::UnknownExtension {
        id: "markdown".to_string(),
    });
    let ctx = user_friendly_error(error);
    assert!(ctx.message.contains("markdown"));
    assert!(ctx.suggestion.as_deref().is_some_and(|s| s.contains("\"core\"")));
}

#[test]
fn test_other_errors_have_no_suggestion() {
    let ctx = user_friendly_error(anyhow::anyhow!("boom"));
    assert_eq!(ctx.to_string(), "boom");
    assert!(ctx.suggestion.is_none());
}
