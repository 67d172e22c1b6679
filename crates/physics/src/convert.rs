//! glam <-> rapier (nalgebra) conversions.

use glam::{Quat, Vec3};
use jointbench_common::EntityId;
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

pub fn vec3_to_rapier(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn rapier_to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// nalgebra stores quaternions scalar-first (`w, i, j, k`); glam is `x, y, z, w`.
pub fn rapier_to_quat(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

pub fn quat_to_rapier(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn pose_to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

pub fn isometry_to_pose(iso: &Isometry<Real>) -> (Vec3, Quat) {
    (
        rapier_to_vec3(&iso.translation.vector),
        rapier_to_quat(&iso.rotation),
    )
}

/// Pure-translation local frame.
pub fn anchor_frame(offset: Vec3) -> Isometry<Real> {
    Isometry::translation(offset.x, offset.y, offset.z)
}

pub fn entity_tag(id: EntityId) -> u128 {
    u128::from(id.0)
}

pub fn entity_from_tag(tag: u128) -> Option<EntityId> {
    u64::try_from(tag).ok().map(EntityId)
}
