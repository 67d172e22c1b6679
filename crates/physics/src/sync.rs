use jointbench_kernel::World;

use crate::context::PhysicsContext;
use crate::convert::{entity_from_tag, isometry_to_pose};

impl PhysicsContext {
    /// Copy every dynamic body's pose onto its entity.
    ///
    /// Call after [`PhysicsContext::step`] and before anything reads the
    /// frame's transforms. Scale is left alone. Returns how many entities
    /// were updated.
    pub fn sync_states(&self, world: &mut World) -> usize {
        let mut updated = 0;
        for (handle, body) in self.bodies.iter() {
            if !body.is_dynamic() {
                continue;
            }
            let Some(id) = entity_from_tag(body.user_data) else {
                tracing::warn!(?handle, tag = body.user_data, "body tag is not an entity id");
                continue;
            };
            let (position, rotation) = isometry_to_pose(body.position());
            if world.set_pose(id, position, rotation) {
                updated += 1;
            } else {
                tracing::warn!(%id, "body has no live entity, skipped");
            }
        }
        tracing::trace!(updated, "states synchronized");
        updated
    }
}
