//! Physics binding layer: owns the rapier world and keeps it in step with the
//! kernel's entity arena.
//!
//! # Invariants
//! - Exactly one simulation world per [`PhysicsContext`]; no globals.
//! - Every body carries its entity id in `user_data`; lookups go through the arena.
//! - Entity poses only change through [`PhysicsContext::sync_states`], a joint
//!   snap, or an explicit teleport.
//! - Scale is fixed at creation and never written by physics.

mod config;
mod context;
mod convert;
mod error;
mod factory;
mod filter;
mod joint;
mod sync;

pub use config::{Material, PhysicsConfig};
pub use context::PhysicsContext;
pub use error::{PhysicsError, Result};
pub use factory::box_mass_properties;
pub use filter::FilterData;
pub use joint::{JointId, JointRecord};

pub fn crate_info() -> &'static str {
    "jointbench-physics v0.1.0"
}
