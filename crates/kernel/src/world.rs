use glam::{Quat, Vec3};
use jointbench_common::{EntityId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simulation behavior of an entity's physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Simulated: subject to gravity, forces and collisions.
    Dynamic,
    /// Never simulated: infinite mass, fixed pose.
    Static,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub kind: EntityKind,
    pub transform: Transform,
}

impl EntityData {
    pub fn is_dynamic(&self) -> bool {
        self.kind == EntityKind::Dynamic
    }
}

/// The entity arena.
///
/// Owns the transform of every entity. The physics context keeps the binding
/// from entity id to engine body separately and writes simulated poses back
/// through [`World::set_pose`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    next_id: u64,
    tick: u64,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed frames.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities, in id order.
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Ids of all dynamic entities, in id order.
    pub fn dynamic_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .filter(|(_, data)| data.is_dynamic())
            .map(|(id, _)| *id)
    }

    /// Spawn a new entity. Returns its id.
    pub fn spawn(&mut self, kind: EntityKind, transform: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, EntityData { kind, transform });
        tracing::debug!(%id, ?kind, position = ?transform.position, "spawned entity");
        id
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if data.is_some() {
            tracing::debug!(%id, "despawned entity");
        }
        data
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Overwrite position and rotation. Scale is left as spawned.
    pub fn set_pose(&mut self, id: EntityId, position: Vec3, rotation: Quat) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            data.transform.position = position;
            data.transform.rotation = rotation;
            true
        } else {
            false
        }
    }

    /// Compute a deterministic hash of the world state for comparison.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for (id, data) in &self.entities {
            let t = &data.transform;
            mix(&mut h, &id.0.to_le_bytes());
            for v in t.position.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.scale.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32, z: f32) -> Transform {
        Transform {
            position: Vec3::new(x, y, z),
            ..Transform::default()
        }
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn spawn_and_despawn() {
        let mut w = World::new();
        let id = w.spawn(EntityKind::Dynamic, Transform::default());
        assert_eq!(w.entity_count(), 1);
        assert!(w.get(id).is_some());

        let data = w.despawn(id);
        assert!(data.is_some());
        assert_eq!(w.entity_count(), 0);
        assert!(w.despawn(id).is_none());
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut w = World::new();
        let a = w.spawn(EntityKind::Static, Transform::default());
        let b = w.spawn(EntityKind::Dynamic, Transform::default());
        assert_eq!((a, b), (EntityId(0), EntityId(1)));

        w.despawn(b);
        let c = w.spawn(EntityKind::Dynamic, Transform::default());
        assert_eq!(c, EntityId(2));
    }

    #[test]
    fn dynamic_entities_skips_static() {
        let mut w = World::new();
        let _ground = w.spawn(EntityKind::Static, Transform::default());
        let a = w.spawn(EntityKind::Dynamic, at(0.0, 2.0, 0.0));
        let b = w.spawn(EntityKind::Dynamic, at(0.0, 4.0, 0.0));
        let ids: Vec<EntityId> = w.dynamic_entities().collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn set_pose_keeps_scale() {
        let mut w = World::new();
        let id = w.spawn(
            EntityKind::Dynamic,
            Transform::from_position_scale(Vec3::ZERO, Vec3::new(16.0, 0.5, 3.0)),
        );
        let rot = Quat::from_rotation_z(0.25);
        assert!(w.set_pose(id, Vec3::new(1.0, 2.0, 3.0), rot));

        let t = w.get(id).unwrap().transform;
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, rot);
        assert_eq!(t.scale, Vec3::new(16.0, 0.5, 3.0));
    }

    #[test]
    fn set_pose_unknown_entity() {
        let mut w = World::new();
        assert!(!w.set_pose(EntityId(9), Vec3::ONE, Quat::IDENTITY));
    }

    #[test]
    fn advance_tick_increments() {
        let mut w = World::new();
        w.advance_tick();
        w.advance_tick();
        assert_eq!(w.tick(), 2);
    }

    #[test]
    fn state_hash_tracks_pose_changes() {
        let mut w = World::new();
        let id = w.spawn(EntityKind::Dynamic, at(0.0, 5.0, 0.0));
        let before = w.state_hash();
        assert_eq!(before, w.state_hash());

        w.set_pose(id, Vec3::new(0.0, 4.0, 0.0), Quat::IDENTITY);
        assert_ne!(before, w.state_hash());
    }

    #[test]
    fn state_hash_deterministic_across_worlds() {
        let mut w1 = World::new();
        let mut w2 = World::new();
        for i in 0..10 {
            w1.spawn(EntityKind::Dynamic, at(i as f32, 0.0, 0.0));
            w2.spawn(EntityKind::Dynamic, at(i as f32, 0.0, 0.0));
        }
        w1.advance_tick();
        w2.advance_tick();
        assert_eq!(w1.state_hash(), w2.state_hash());
    }
}
