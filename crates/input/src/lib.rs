//! Event source: window events mapped to high-level actions.
//!
//! # Invariants
//! - The loop consumes [`Action`]s, never raw window events.
//! - Window close and Escape both map to [`Action::Quit`].

pub mod action;

pub use action::{Action, InputEvent, Key, map_event};
