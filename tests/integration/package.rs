//! Package registration and the rendering controller over a real engine.

use anyhow::Result;
use std::sync::Arc;
use tera::Context;
use tera_encore::config::EncoreConfig;
use tera_encore::constants::{ASSETS_SERVICE, TEMPLATING_SERVICE};
use tera_encore::container::ServiceContainer;
use tera_encore::controller::{Renderer, RenderingController};
use tera_encore::core::{ContainerError, RenderError};
use tera_encore::extension::{Extension, ExtensionRegistry};
use tera_encore::package::{Package, TemplatingPackage};
use tera_encore::templating::{ActivityLog, TemplateEngine};

use crate::common::fixture_project;

struct PageController {
    renderer: Arc<TemplateEngine>,
}

impl RenderingController for PageController {
    fn renderer(&self) -> &dyn Renderer {
        &self.renderer
    }
}

impl PageController {
    fn show(&self, title: &str) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("title", title);
        self.render("page.html", &context)
    }

    fn title(&self, title: &str) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("title", title);
        self.render_block("page.html", "title", &context)
    }
}

#[test]
fn test_container_builds_configured_engine() -> Result<()> {
    let project = fixture_project()?;
    let container = project.container();

    assert!(container.has(TEMPLATING_SERVICE));
    assert!(container.has(ASSETS_SERVICE));

    let engine = TemplatingPackage::engine(&container)?;
    assert!(engine.has_template("@admin/dashboard.html"));
    assert!(Arc::ptr_eq(&engine, &TemplatingPackage::engine(&container)?));
    Ok(())
}

#[test]
fn test_controller_renders_through_engine() -> Result<()> {
    let project = fixture_project()?;
    let controller = PageController {
        renderer: TemplatingPackage::engine(&project.container())?,
    };

    assert!(controller.show("About")?.contains("<h1>About</h1>"));
    assert_eq!(controller.title("About")?, "About - Example");
    Ok(())
}

#[test]
fn test_request_scope_as_renderer() -> Result<()> {
    let project = fixture_project()?;
    let engine = project.engine()?;
    let scope = engine.request(None);

    let renderer: &dyn Renderer = &scope;
    renderer.render("preload.html", &Context::new())?;
    assert_eq!(scope.take_headers().links().count(), 2);
    Ok(())
}

#[test]
fn test_default_config_points_at_conventional_paths() -> Result<()> {
    let config = TemplatingPackage::default_config()?;
    assert_eq!(config, EncoreConfig::default());
    assert!(config.templating.autoescape);
    assert!(!config.templating.debug);
    assert!(config.assets.manifest.is_some());
    assert!(config.assets.entrypoints.is_some());
    Ok(())
}

#[test]
fn test_container_timeline_reaches_engine() -> Result<()> {
    let project = fixture_project()?;
    let log = Arc::new(ActivityLog::new());
    let mut container = ServiceContainer::new(project.config().clone(), project.path()).with_timeline(log.clone());
    TemplatingPackage::register(&mut container);

    TemplatingPackage::engine(&container)?.render("@admin/widget.html", &Context::new())?;
    assert_eq!(log.len(), 1);
    Ok(())
}

struct Greeting;

impl Extension for Greeting {
    fn name(&self) -> &str {
        "greeting"
    }

    fn register(&self, tera: &mut tera::Tera) {
        tera.register_function("greet", |_: &std::collections::HashMap<String, tera::Value>| {
            Ok(tera::Value::String("Hello".to_string()))
        });
    }
}

#[test]
fn test_custom_extension_registry() -> Result<()> {
    let mut project = fixture_project()?;
    project.config_mut().templating.extensions.push("greeting".to_string());
    project.template("greet.txt", "{{ greet() }}, {{ site_name }}")?;

    let mut container = ServiceContainer::new(project.config().clone(), project.path());
    TemplatingPackage::register(&mut container);
    assert!(matches!(TemplatingPackage::engine(&container), Err(ContainerError::Factory { .. })));

    let mut registry = ExtensionRegistry::with_builtins();
    registry.register("greeting", || Box::new(Greeting));
    let mut container = ServiceContainer::new(project.config().clone(), project.path());
    TemplatingPackage::register_with(&mut container, registry);

    let engine = TemplatingPackage::engine(&container)?;
    assert_eq!(engine.render("greet.txt", &Context::new())?, "Hello, Example");
    Ok(())
}
