//! Configuration files on disk.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use tera_encore::config::EncoreConfig;
use tera_encore::constants::MAIN_NAMESPACE;
use tera_encore::core::ConfigError;
use tera_encore::test_utils::TestProject;

#[test]
fn test_load_reads_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("encore.toml");
    std::fs::write(
        &path,
        r#"
[templating]
extensions = ["debug"]

[templating.paths]
__main__ = "views"
mail = "mail"

[assets]
manifest = "build/manifest.json"
"#,
    )?;

    let config = EncoreConfig::load(&path)?;
    assert_eq!(config.templating.paths[MAIN_NAMESPACE], PathBuf::from("views"));
    assert_eq!(config.templating.paths["mail"], PathBuf::from("mail"));
    assert_eq!(config.templating.extensions, vec!["debug"]);
    assert_eq!(config.assets.manifest, Some(PathBuf::from("build/manifest.json")));
    assert_eq!(config.assets.entrypoints, Some(PathBuf::from("public/assets/entrypoints.json")));
    assert_eq!(EncoreConfig::base_dir_for(Some(path.as_path())), dir.path());
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let result = EncoreConfig::load(std::path::Path::new("/definitely/not/encore.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_load_with_optional_falls_back_to_defaults() -> Result<()> {
    assert_eq!(EncoreConfig::load_with_optional(None)?, EncoreConfig::default());
    Ok(())
}

#[test]
fn test_written_config_loads_back() -> Result<()> {
    let mut project = TestProject::new()?;
    project.config_mut().templating.debug = true;
    project.config_mut().templating.globals.insert("year".to_string(), serde_json::json!(2024));

    let path = project.write_config()?;
    assert_eq!(&EncoreConfig::load(&path)?, project.config());
    Ok(())
}

#[test]
fn test_wrong_value_type_is_rejected() {
    let result = EncoreConfig::from_toml_str("[templating]\ndebug = \"yes\"\n", "inline");
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
