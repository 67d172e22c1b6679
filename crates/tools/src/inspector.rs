use jointbench_common::EntityId;
use jointbench_kernel::{EntityKind, World};
use serde::Serialize;
use std::fmt;

/// Read-only queries against the entity arena for debug output and UI.
pub struct WorldInspector;

impl WorldInspector {
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            tick: world.tick(),
            entity_count: world.entity_count(),
            dynamic_count: world.dynamic_entities().count(),
            state_hash: world.state_hash(),
        }
    }

    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(|data| {
            let t = &data.transform;
            EntityInfo {
                id,
                kind: data.kind,
                position: t.position.to_array(),
                rotation: t.rotation.to_array(),
                scale: t.scale.to_array(),
            }
        })
    }

    /// All entity ids, in id order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().keys().copied().collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub entity_count: usize,
    pub dynamic_count: usize,
    pub state_hash: u64,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: tick={} entities={} dynamic={} hash={:016x}",
            self.tick, self.entity_count, self.dynamic_count, self.state_hash
        )
    }
}

/// Snapshot of one entity's transform. Rotation is `xyzw`.
#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [px, py, pz] = self.position;
        let [sx, sy, sz] = self.scale;
        write!(
            f,
            "Entity {} ({:?}) pos=({px:.2}, {py:.2}, {pz:.2}) scale=({sx:.2}, {sy:.2}, {sz:.2})",
            self.id, self.kind
        )
    }
}
