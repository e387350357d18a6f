//! Registry for renderers.

use crate::traits::Renderer;
use std::sync::{OnceLock, RwLock};

/// Global renderer registry.
static RENDERERS: RwLock<Vec<&'static dyn Renderer>> = RwLock::new(Vec::new());
static RENDERERS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom renderer.
pub fn register_renderer(renderer: &'static dyn Renderer) {
    RENDERERS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(renderer);
}

fn init_renderers() {
    RENDERERS_INITIALIZED.get_or_init(|| {
        register_renderer(&crate::output::PRETTY_RENDERER);
        register_renderer(&crate::output::MINIFY_RENDERER);
    });
}

/// Get a renderer by style name.
pub fn renderer_for_style(style: &str) -> Option<&'static dyn Renderer> {
    init_renderers();
    RENDERERS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .find(|r| r.style() == style)
        .copied()
}

/// Get all registered renderers.
pub fn renderers() -> Vec<&'static dyn Renderer> {
    init_renderers();
    RENDERERS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
