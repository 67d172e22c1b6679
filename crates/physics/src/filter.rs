//! Per-collider filter data.
//!
//! The four words map onto a collider's interaction groups:
//! `word0`/`word1` are the collision-group memberships and filter,
//! `word2`/`word3` the solver-group memberships and filter.
//!
//! # Invariants
//!
//! - [`PhysicsContext::filter_data`] returns one record per collider on the
//!   entity's body, in collider order.

use jointbench_common::EntityId;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::PhysicsContext;
use crate::error::{PhysicsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterData {
    pub word0: u32,
    pub word1: u32,
    pub word2: u32,
    pub word3: u32,
}

impl FilterData {
    pub fn from_groups(collision: InteractionGroups, solver: InteractionGroups) -> Self {
        Self {
            word0: collision.memberships.bits(),
            word1: collision.filter.bits(),
            word2: solver.memberships.bits(),
            word3: solver.filter.bits(),
        }
    }

    pub fn collision_groups(&self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.word0),
            Group::from_bits_truncate(self.word1),
        )
    }

    pub fn solver_groups(&self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.word2),
            Group::from_bits_truncate(self.word3),
        )
    }

    pub fn words(&self) -> [u32; 4] {
        [self.word0, self.word1, self.word2, self.word3]
    }

    /// Each word as 32 binary digits, least-significant bit first,
    /// separated by `", "`.
    pub fn to_binary_string(&self) -> String {
        self.words()
            .into_iter()
            .map(|w: u32| {
                (0..32)
                    .map(|bit| if (w >> bit) & 1 == 1 { '1' } else { '0' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FilterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_binary_string())
    }
}

impl PhysicsContext {
    /// Filter data of every collider on the entity's body.
    pub fn filter_data(&self, id: EntityId) -> Result<Vec<FilterData>> {
        let handle = self.body_handle(id)?;
        let body = self.bodies.get(handle).ok_or(PhysicsError::MissingBody(id))?;
        Ok(body
            .colliders()
            .iter()
            .filter_map(|ch| self.colliders.get(*ch))
            .map(|c| FilterData::from_groups(c.collision_groups(), c.solver_groups()))
            .collect())
    }

    /// Apply `records` to the entity's colliders in order.
    pub fn set_filter_data(&mut self, id: EntityId, records: &[FilterData]) -> Result<()> {
        let handle = self.body_handle(id)?;
        let body = self.bodies.get(handle).ok_or(PhysicsError::MissingBody(id))?;
        let shapes = body.colliders().to_vec();
        if shapes.len() != records.len() {
            return Err(PhysicsError::FilterDataMismatch {
                entity: id,
                expected: shapes.len(),
                given: records.len(),
            });
        }
        for (ch, fd) in shapes.into_iter().zip(records) {
            if let Some(collider) = self.colliders.get_mut(ch) {
                collider.set_collision_groups(fd.collision_groups());
                collider.set_solver_groups(fd.solver_groups());
            }
        }
        tracing::debug!(%id, records = records.len(), "filter data applied");
        Ok(())
    }
}
