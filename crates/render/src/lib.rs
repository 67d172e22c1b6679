//! Rendering Adapter: renderer-agnostic draw interface.
//!
//! # Invariants
//! - Renderers never mutate world state; they only receive model matrices
//!   and tints.
//! - A frame is `clear`, any number of `draw_box` calls, then `present`.
//!
//! The GPU implementation lives in `jointbench-render-wgpu`; the text
//! renderer here is used headless and in tests.

mod renderer;

pub use renderer::{DebugTextRenderer, DrawBox, Renderer};

pub fn crate_info() -> &'static str {
    "jointbench-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
