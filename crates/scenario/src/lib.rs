//! The joint demo scene.
//!
//! A blue ground slab, two heavy red planks welded one above the other
//! (C below, B on top) and a light green cube A. After a delay A is snapped
//! onto B and welded to it, with the filter data of both dumped before and
//! after so the effect of disabling joint contacts can be compared.
//!
//! # Invariants
//! - Each frame is: maybe attach, step, sync. Drawing reads synced state.
//! - The probe joint is attached at most once.

mod config;
mod report;
mod scene;

pub use config::{BoxSpec, ScenarioConfig};
pub use report::{FilterSnapshot, ScenarioReport};
pub use scene::{Scenario, SceneIds};
