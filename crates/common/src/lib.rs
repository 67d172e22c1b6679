//! Shared value types used by every jointbench crate.
//!
//! # Invariants
//! - `Transform::rotation` is unit-length; scale components are non-negative.
//! - Model matrices are composed as translate * rotate * scale.

mod types;

pub use types::{Color, EntityId, Transform};
