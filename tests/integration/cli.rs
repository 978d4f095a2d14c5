//! The `tera-encore` binary.

use anyhow::Result;
use predicates::prelude::*;

use crate::common::{cli, fixture_project};

#[test]
fn test_asset_command() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["asset", "website.css"])
        .assert()
        .success()
        .stdout("/assets/css/website.css\n");
    Ok(())
}

#[test]
fn test_unknown_asset_fails() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["asset", "missing.css"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Asset \"missing.css\" not found in manifest file"))
        .stderr(predicate::str::contains("manifest.json"));
    Ok(())
}

#[test]
fn test_entrypoints_json() -> Result<()> {
    let project = fixture_project()?;
    let output = cli(&project)?.args(["entrypoints", "website", "admin", "--type", "js"]).output()?;
    assert!(output.status.success());

    let list: Vec<String> = serde_json::from_slice(&output.stdout)?;
    assert_eq!(list, vec!["/assets/js/website.js", "/assets/js/vendor.js", "/assets/js/admin.js"]);
    Ok(())
}

#[test]
fn test_entrypoints_by_type() -> Result<()> {
    let project = fixture_project()?;
    let output = cli(&project)?.args(["entrypoints", "admin"]).output()?;
    assert!(output.status.success());

    let map: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        map,
        serde_json::json!({"css": ["/assets/css/admin.css"], "js": ["/assets/js/admin.js"]})
    );
    Ok(())
}

#[test]
fn test_entrypoints_html() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["entrypoints", "website", "--html", "--defer", "--preload"])
        .assert()
        .success()
        .stdout(concat!(
            "<link rel=\"stylesheet\" href=\"/assets/css/website.css\">\n",
            "<script src=\"/assets/js/website.js\" defer></script>\n",
            "<script src=\"/assets/js/vendor.js\" defer></script>\n",
        ))
        .stderr(predicate::str::contains("Link: </assets/css/website.css>; rel=preload; as=style"));
    Ok(())
}

#[test]
fn test_defer_requires_html() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?.args(["entrypoints", "website", "--defer"]).assert().failure();
    Ok(())
}

#[test]
fn test_render_command() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["render", "page.html", "--var", "title=Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Home - Example</title>"))
        .stdout(predicate::str::contains("<h1>Home</h1>"));
    Ok(())
}

#[test]
fn test_render_block_command() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["render", "page.html", "--block", "title", "--var", "title=Home"])
        .assert()
        .success()
        .stdout("Home - Example");
    Ok(())
}

#[test]
fn test_render_headers() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["render", "preload.html", "--headers"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Link: </fonts/text.woff2>; rel=preload; as=font; type=font/woff2; crossorigin",
        ))
        .stderr(predicate::str::contains("Set-Cookie: h2pushes_"));
    Ok(())
}

#[test]
fn test_render_with_cookie_skips_pushed() -> Result<()> {
    let project = fixture_project()?;
    let hash = tera_encore::preload::hash_url("/fonts/text.woff2");
    cli(&project)?
        .args(["render", "preload.html", "--headers", "--cookie"])
        .arg(format!("h2pushes_{hash}=1"))
        .assert()
        .success()
        .stderr(predicate::str::contains("/fonts/text.woff2").not())
        .stderr(predicate::str::contains("</assets/css/website.css>"));
    Ok(())
}

#[test]
fn test_render_missing_block_fails() -> Result<()> {
    let project = fixture_project()?;
    cli(&project)?
        .args(["render", "page.html", "--block", "sidebar", "--var", "title=Home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Block \"sidebar\" not found in template \"page.html\""));
    Ok(())
}
