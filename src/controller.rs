//! Rendering capability for request handlers.
//!
//! Handlers receive a [`Renderer`] explicitly and implement
//! [`RenderingController`] to get `render`/`render_block` helpers.
//!
//! ```rust,no_run
//! use tera::Context;
//! use tera_encore::controller::{Renderer, RenderingController};
//! use tera_encore::core::RenderError;
//!
//! struct HomeController<'a> {
//!     renderer: &'a dyn Renderer,
//! }
//!
//! impl RenderingController for HomeController<'_> {
//!     fn renderer(&self) -> &dyn Renderer {
//!         self.renderer
//!     }
//! }
//!
//! impl HomeController<'_> {
//!     fn index(&self) -> Result<String, RenderError> {
//!         self.render("home.html", &Context::new())
//!     }
//! }
//! ```

use std::sync::Arc;
use tera::Context;

use crate::core::RenderError;
use crate::templating::{RequestRenderer, TemplateEngine};

/// Something that renders templates and template blocks.
pub trait Renderer {
    fn render(&self, name: &str, context: &Context) -> Result<String, RenderError>;

    fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError>;
}

impl Renderer for TemplateEngine {
    fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        TemplateEngine::render(self, name, context)
    }

    fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        TemplateEngine::render_block(self, name, block, context)
    }
}

impl Renderer for RequestRenderer<'_> {
    fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        RequestRenderer::render(self, name, context)
    }

    fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        RequestRenderer::render_block(self, name, block, context)
    }
}

impl<R: Renderer + ?Sized> Renderer for Arc<R> {
    fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        (**self).render(name, context)
    }

    fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        (**self).render_block(name, block, context)
    }
}

/// Render helpers delegating to an injected [`Renderer`].
pub trait RenderingController {
    fn renderer(&self) -> &dyn Renderer;

    /// Render template `name`.
    fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        self.renderer().render(name, context)
    }

    /// Render only `block` of template `name`.
    fn render_block(&self, name: &str, block: &str, context: &Context) -> Result<String, RenderError> {
        self.renderer().render_block(name, block, context)
    }
}
