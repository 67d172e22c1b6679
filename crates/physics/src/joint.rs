//! Fixed-joint attachment.
//!
//! Attaching A to B first snaps A so that its anchor lands on B's anchor,
//! then welds the two bodies with a fixed constraint whose contacts are
//! disabled. Anchors are local offsets with identity rotation.
//!
//! Disabling contacts on a constraint can, depending on the engine, rewrite
//! the filter data of the second body's colliders. With
//! `preserve_filter_data` set, A's records are captured before the change and
//! written back after it.

use glam::Vec3;
use jointbench_common::EntityId;
use jointbench_kernel::World;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::PhysicsContext;
use crate::convert::{anchor_frame, isometry_to_pose};
use crate::error::{PhysicsError, Result};

/// Identifier of a joint created by a [`PhysicsContext`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JointId(pub u64);

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joint#{}", self.0)
    }
}

/// A fixed joint as created: the snapped entity A, the reference entity B
/// and their local anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointRecord {
    pub id: JointId,
    pub entity_a: EntityId,
    pub anchor_a: Vec3,
    pub entity_b: EntityId,
    pub anchor_b: Vec3,
    pub preserve_filter_data: bool,
    pub handle: ImpulseJointHandle,
}

impl PhysicsContext {
    /// Snap `entity_a` onto `entity_b` and weld them together.
    ///
    /// Both entities must be live, dynamic and bound to a body. The snapped
    /// pose of A is written to the world immediately.
    pub fn attach_fixed_joint(
        &mut self,
        world: &mut World,
        entity_a: EntityId,
        anchor_a: Vec3,
        entity_b: EntityId,
        anchor_b: Vec3,
        preserve_filter_data: bool,
    ) -> Result<JointId> {
        let _span = tracing::info_span!("attach_fixed_joint", a = %entity_a, b = %entity_b).entered();

        if entity_a == entity_b {
            return Err(PhysicsError::SelfJoint(entity_a));
        }
        let handle_a = self.dynamic_body(world, entity_a)?;
        let handle_b = self.dynamic_body(world, entity_b)?;

        let frame_a = anchor_frame(anchor_a);
        let frame_b = anchor_frame(anchor_b);
        let pose_b = *self.bodies[handle_b].position();
        let snapped = pose_b * frame_b * frame_a.inverse();
        let (position, rotation) = isometry_to_pose(&snapped);
        self.teleport(world, entity_a, position, rotation)?;
        tracing::debug!(?position, ?rotation, "entity A snapped");

        let joint = FixedJointBuilder::new()
            .local_frame1(frame_b)
            .local_frame2(frame_a)
            .build();
        let handle = self.impulse_joints.insert(handle_b, handle_a, joint, true);

        let saved = if preserve_filter_data {
            Some(self.filter_data(entity_a)?)
        } else {
            None
        };
        if let Some(joint) = self.impulse_joints.get_mut(handle) {
            joint.data.set_contacts_enabled(false);
        }
        if let Some(records) = saved {
            self.set_filter_data(entity_a, &records)?;
        }

        let id = self.next_joint_id();
        self.joints.push(JointRecord {
            id,
            entity_a,
            anchor_a,
            entity_b,
            anchor_b,
            preserve_filter_data,
            handle,
        });
        tracing::info!(%id, preserve_filter_data, "fixed joint created");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::filter::FilterData;
    use glam::Quat;

    fn setup() -> (PhysicsContext, World) {
        (
            PhysicsContext::new(PhysicsConfig::default()).unwrap(),
            World::new(),
        )
    }

    fn anchor_world(ctx: &PhysicsContext, id: EntityId, anchor: Vec3) -> Vec3 {
        let (p, q) = ctx.body_pose(id).unwrap();
        p + q * anchor
    }

    #[test]
    fn snap_places_anchors_together() {
        let (mut ctx, mut world) = setup();
        let b = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(0.0, 4.0, 0.0))
            .unwrap();
        let c = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(3.0, 2.0, 1.0))
            .unwrap();

        ctx.attach_fixed_joint(
            &mut world,
            c,
            Vec3::new(0.0, 1.0, 0.0),
            b,
            Vec3::new(0.0, -1.0, 0.0),
            false,
        )
        .unwrap();

        let p = world.get(c).unwrap().transform.position;
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5, "snapped to {p}");
        let (body_p, _) = ctx.body_pose(c).unwrap();
        assert!((body_p - p).length() < 1e-6);
    }

    #[test]
    fn snap_follows_rotated_reference() {
        let (mut ctx, mut world) = setup();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::ZERO)
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::ZERO)
            .unwrap();
        let rot = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        ctx.teleport(&mut world, b, Vec3::new(0.0, 4.0, 0.0), rot)
            .unwrap();

        let anchor_a = Vec3::new(0.0, 1.0, 0.0);
        let anchor_b = Vec3::new(1.0, 0.0, 0.0);
        ctx.attach_fixed_joint(&mut world, a, anchor_a, b, anchor_b, false)
            .unwrap();

        let t = world.get(a).unwrap().transform;
        assert!((t.position - Vec3::new(1.0, 5.0, 0.0)).length() < 1e-5);
        assert!(t.rotation.abs_diff_eq(rot, 1e-5));
        let gap = anchor_world(&ctx, a, anchor_a) - anchor_world(&ctx, b, anchor_b);
        assert!(gap.length() < 1e-5);
    }

    #[test]
    fn zero_anchors_coincide_centers() {
        let (mut ctx, mut world) = setup();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 5.0, 0.0))
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(2.0, 4.0, 0.0))
            .unwrap();
        ctx.attach_fixed_joint(&mut world, a, Vec3::ZERO, b, Vec3::ZERO, true)
            .unwrap();
        assert_eq!(world.get(a).unwrap().transform.position, Vec3::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn filter_data_preserved_with_workaround() {
        let (mut ctx, mut world) = setup();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 5.0, 0.0))
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(0.0, 4.0, 0.0))
            .unwrap();
        let custom = [FilterData {
            word0: 0b01,
            word1: 0b10,
            word2: 0b01,
            word3: 0b11,
        }];
        ctx.set_filter_data(a, &custom).unwrap();

        ctx.attach_fixed_joint(&mut world, a, Vec3::ZERO, b, Vec3::ZERO, true)
            .unwrap();
        assert_eq!(ctx.filter_data(a).unwrap(), custom);
    }

    #[test]
    fn disabling_contacts_leaves_filter_data_alone() {
        let (mut ctx, mut world) = setup();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 5.0, 0.0))
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(0.0, 4.0, 0.0))
            .unwrap();
        let before_a = ctx.filter_data(a).unwrap();
        let before_b = ctx.filter_data(b).unwrap();

        ctx.attach_fixed_joint(&mut world, a, Vec3::ZERO, b, Vec3::ZERO, false)
            .unwrap();
        assert_eq!(ctx.filter_data(a).unwrap(), before_a);
        assert_eq!(ctx.filter_data(b).unwrap(), before_b);
    }

    #[test]
    fn joint_has_contacts_disabled_and_is_recorded() {
        let (mut ctx, mut world) = setup();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::ZERO)
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        let id = ctx
            .attach_fixed_joint(&mut world, a, Vec3::ZERO, b, Vec3::X, false)
            .unwrap();

        let record = ctx.joints()[0];
        assert_eq!(record.id, id);
        assert_eq!((record.entity_a, record.entity_b), (a, b));
        assert_eq!(record.anchor_b, Vec3::X);
        let joint = ctx.impulse_joints.get(record.handle).unwrap();
        assert!(!joint.data.contacts_enabled);
        assert_eq!(joint.body1, ctx.body_handle(b).unwrap());
        assert_eq!(joint.body2, ctx.body_handle(a).unwrap());
    }

    #[test]
    fn rejects_static_unknown_and_self() {
        let (mut ctx, mut world) = setup();
        let ground = ctx
            .create_ground(&mut world, Vec3::new(90.0, 0.5, 90.0), Vec3::ZERO)
            .unwrap();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 5.0, 0.0))
            .unwrap();

        assert!(matches!(
            ctx.attach_fixed_joint(&mut world, a, Vec3::ZERO, ground, Vec3::ZERO, false),
            Err(PhysicsError::NotDynamic(id)) if id == ground
        ));
        assert!(matches!(
            ctx.attach_fixed_joint(&mut world, a, Vec3::ZERO, EntityId(99), Vec3::ZERO, false),
            Err(PhysicsError::EntityNotFound(_))
        ));
        assert!(matches!(
            ctx.attach_fixed_joint(&mut world, a, Vec3::ZERO, a, Vec3::ZERO, false),
            Err(PhysicsError::SelfJoint(_))
        ));
        assert!(ctx.joints().is_empty());
        assert_eq!(world.get(a).unwrap().transform.position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn jointed_planks_keep_their_spacing() {
        let (mut ctx, mut world) = setup();
        ctx.create_ground(&mut world, Vec3::new(90.0, 0.5, 90.0), Vec3::ZERO)
            .unwrap();
        let c = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 1000.0, Vec3::new(8.0, 0.25, 1.5), Vec3::new(0.0, 4.0, 0.0))
            .unwrap();
        ctx.attach_fixed_joint(
            &mut world,
            c,
            Vec3::new(0.0, 1.0, 0.0),
            b,
            Vec3::new(0.0, -1.0, 0.0),
            false,
        )
        .unwrap();

        for _ in 0..120 {
            ctx.step();
            ctx.sync_states(&mut world);
        }
        let yb = world.get(b).unwrap().transform.position.y;
        let yc = world.get(c).unwrap().transform.position.y;
        assert!(((yb - yc) - 2.0).abs() < 0.1, "spacing {}", yb - yc);
    }

    #[test]
    fn despawn_drops_joint_records() {
        let (mut ctx, mut world) = setup();
        let a = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::ZERO)
            .unwrap();
        let b = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        let first = ctx
            .attach_fixed_joint(&mut world, a, Vec3::ZERO, b, Vec3::ZERO, false)
            .unwrap();
        ctx.despawn(&mut world, b).unwrap();
        assert!(ctx.joints().is_empty());
        assert_eq!(ctx.impulse_joints.len(), 0);

        let c = ctx
            .create_dynamic_box(&mut world, 50.0, Vec3::splat(0.5), Vec3::new(0.0, 4.0, 0.0))
            .unwrap();
        let second = ctx
            .attach_fixed_joint(&mut world, a, Vec3::ZERO, c, Vec3::ZERO, false)
            .unwrap();
        assert_ne!(first, second);
    }
}
