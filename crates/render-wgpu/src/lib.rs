//! wgpu render backend for the joint demo.
//!
//! Draws a grid floor and one instanced unit cube per `draw_box` call, seen
//! through an orbit camera around the scene.
//!
//! # Invariants
//! - Renderer never mutates world state.
//! - Camera motion is not part of the simulation.
//! - `present` commits the queued boxes; `render` draws the last committed set.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
