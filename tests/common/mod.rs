//! Common helpers for tera-encore integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::path::PathBuf;
use tera_encore::test_utils::TestProject;

use super::fixtures::{ADMIN_TEMPLATES, MAIN_TEMPLATES};

pub use tera_encore::test_utils::{ENTRYPOINTS_JSON, MANIFEST_JSON, init_test_logging};

/// A project with the sample assets, the fixture templates and an `admin`
/// namespace under `admin/templates`.
pub fn fixture_project() -> Result<TestProject> {
    init_test_logging(None);

    let mut project = TestProject::new()?;
    for (name, source) in MAIN_TEMPLATES {
        project.template(name, source)?;
    }
    for (name, source) in ADMIN_TEMPLATES {
        project.write(&format!("admin/templates/{name}"), source)?;
    }

    let templating = &mut project.config_mut().templating;
    templating.paths.insert("admin".to_string(), PathBuf::from("admin/templates"));
    templating.globals.insert("site_name".to_string(), serde_json::json!("Example"));
    Ok(project)
}

/// The `tera-encore` binary, run from `project` with its configuration.
pub fn cli(project: &TestProject) -> Result<Command> {
    let config = project.write_config()?;
    let mut cmd = Command::cargo_bin("tera-encore")?;
    cmd.current_dir(project.path()).env_remove("RUST_LOG").arg("--config").arg(config);
    Ok(cmd)
}
