//! Asset functions against the sample manifest and entry points.

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tera::Context;
use tera_encore::assets::{Assets, EntryPointList};
use tera_encore::core::AssetError;
use tera_encore::extension::{AssetRuntime, EntryPointsOptions};
use tera_encore::preload::PreloadCache;
use tera_encore::test_utils::TestProject;

use crate::common::fixture_project;

fn runtime(project: &TestProject) -> AssetRuntime {
    AssetRuntime::new(Arc::new(project.assets()), PreloadCache::new())
}

fn paths(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_asset() -> Result<()> {
    let project = TestProject::new()?;
    assert_eq!(runtime(&project).asset("website.css")?, "/assets/css/website.css");
    Ok(())
}

#[test]
fn test_asset_not_found() -> Result<()> {
    let project = TestProject::new()?;
    let err = runtime(&project).asset("fake.css").unwrap_err();
    assert_eq!(err.to_string(), "Asset \"fake.css\" not found in manifest file");
    Ok(())
}

#[test]
fn test_missing_files_are_unavailable() -> Result<()> {
    let project = TestProject::empty()?;
    let runtime = runtime(&project);
    assert!(matches!(runtime.asset("website.css"), Err(AssetError::ManifestUnavailable)));
    assert!(matches!(
        runtime.entry_points_list(&["website"], None),
        Err(AssetError::EntryPointsUnavailable)
    ));
    Ok(())
}

#[test]
fn test_corrupt_manifest() -> Result<()> {
    let project = TestProject::new()?;
    project.write("public/assets/manifest.json", "{ not json")?;
    let err = runtime(&project).asset("website.css").unwrap_err();
    assert!(matches!(err, AssetError::ManifestCorrupt { .. }));
    Ok(())
}

#[test]
fn test_entry_points() -> Result<()> {
    let project = TestProject::new()?;
    assert_eq!(
        runtime(&project).entry_points(&["website"], None, &EntryPointsOptions::default())?,
        "<link rel=\"stylesheet\" href=\"/assets/css/website.css\">\n\
         <script src=\"/assets/js/website.js\"></script>\n\
         <script src=\"/assets/js/vendor.js\"></script>\n"
    );
    Ok(())
}

#[test]
fn test_entry_points_with_multiple_entries() -> Result<()> {
    let project = TestProject::new()?;
    assert_eq!(
        runtime(&project).entry_points(&["website", "admin"], None, &EntryPointsOptions::default())?,
        "<link rel=\"stylesheet\" href=\"/assets/css/website.css\">\n\
         <link rel=\"stylesheet\" href=\"/assets/css/admin.css\">\n\
         <script src=\"/assets/js/website.js\"></script>\n\
         <script src=\"/assets/js/vendor.js\"></script>\n\
         <script src=\"/assets/js/admin.js\"></script>\n"
    );
    Ok(())
}

#[test]
fn test_entry_points_with_type() -> Result<()> {
    let project = TestProject::new()?;
    assert_eq!(
        runtime(&project).entry_points(&["website"], Some("js"), &EntryPointsOptions::default())?,
        "<script src=\"/assets/js/website.js\"></script>\n<script src=\"/assets/js/vendor.js\"></script>\n"
    );
    Ok(())
}

#[test]
fn test_entry_points_with_options() -> Result<()> {
    let project = TestProject::new()?;
    let options = EntryPointsOptions {
        defer: true,
        async_: true,
        ..EntryPointsOptions::default()
    };
    assert_eq!(
        runtime(&project).entry_points(&["website"], None, &options)?,
        "<link rel=\"stylesheet\" href=\"/assets/css/website.css\">\n\
         <script src=\"/assets/js/website.js\" defer async></script>\n\
         <script src=\"/assets/js/vendor.js\" defer async></script>\n"
    );
    Ok(())
}

#[test]
fn test_entry_points_not_found() -> Result<()> {
    let project = TestProject::new()?;
    assert_eq!(runtime(&project).entry_points(&["fake"], None, &EntryPointsOptions::default())?, "");
    Ok(())
}

#[test]
fn test_entry_points_list() -> Result<()> {
    let project = TestProject::new()?;
    let expected = BTreeMap::from([
        ("css".to_string(), paths(&["/assets/css/website.css"])),
        ("js".to_string(), paths(&["/assets/js/website.js", "/assets/js/vendor.js"])),
    ]);
    assert_eq!(runtime(&project).entry_points_list(&["website"], None)?, EntryPointList::ByType(expected));
    Ok(())
}

#[test]
fn test_entry_points_list_with_multiple_entries() -> Result<()> {
    let project = TestProject::new()?;
    assert_eq!(
        runtime(&project).entry_points_list(&["website", "admin"], Some("js"))?,
        EntryPointList::Flat(paths(&["/assets/js/website.js", "/assets/js/vendor.js", "/assets/js/admin.js"]))
    );
    Ok(())
}

#[test]
fn test_entry_points_list_not_found() -> Result<()> {
    let project = TestProject::new()?;
    assert!(runtime(&project).entry_points_list(&["fake"], None)?.is_empty());
    assert!(runtime(&project).entry_points_list(&["fake"], Some("js"))?.is_empty());
    Ok(())
}

#[test]
fn test_shared_paths_are_rendered_once() -> Result<()> {
    let project = TestProject::new()?;
    project.write(
        "public/assets/entrypoints.json",
        r#"{"entrypoints": {
            "a": {"js": ["/runtime.js", "/a.js"]},
            "b": {"js": ["/runtime.js", "/b.js"]}
        }}"#,
    )?;
    assert_eq!(
        runtime(&project).entry_points_list(&["a", "b"], Some("js"))?,
        EntryPointList::Flat(paths(&["/runtime.js", "/a.js", "/b.js"]))
    );
    Ok(())
}

#[test]
fn test_paths_are_sanitized() -> Result<()> {
    let project = TestProject::new()?;
    project.write(
        "public/assets/entrypoints.json",
        r#"{"entrypoints": {"evil": {"js": ["/a<script>.js", "/b\".js"]}}}"#,
    )?;
    assert_eq!(
        runtime(&project).entry_points(&["evil"], None, &EntryPointsOptions::default())?,
        "<script src=\"/a.js\"></script>\n<script src=\"/b&quot;.js\"></script>\n"
    );
    Ok(())
}

#[test]
fn test_functions_in_templates() -> Result<()> {
    let project = fixture_project()?;
    let mut engine = project.engine()?;
    engine.add_template(
        "functions.txt",
        r#"{{ asset(key="admin.js") }}|{{ entrypoints_list(entry="website", type="js") | join(sep=",") }}|{{ entrypoints(entry="admin", type="js", async=true) }}"#,
    )?;

    let output = engine.render("functions.txt", &Context::new())?;
    assert_eq!(
        output,
        "/assets/js/admin.js|/assets/js/website.js,/assets/js/vendor.js|\
         <script src=\"/assets/js/admin.js\" async></script>\n"
    );
    Ok(())
}
