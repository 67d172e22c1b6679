//! World Kernel: the entity arena every other crate reads from.
//!
//! # Invariants
//! - Entity ids are allocated sequentially and never reused.
//! - Iteration order is the id order (BTreeMap), on every platform.
//! - Physics writes poses back through `World::set_pose`; scale is fixed at spawn.

pub mod world;

pub use world::{EntityData, EntityKind, World};
