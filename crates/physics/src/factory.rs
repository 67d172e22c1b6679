//! Box-shaped entity creation.
//!
//! Every box gets exactly one cuboid collider built from the shared material.
//! Dynamic boxes take their inertia from the geometry at the nominal density
//! and then have their total mass replaced by the requested one, so a heavy
//! flat plank keeps the rotational response of a light one of the same shape.

use glam::Vec3;
use jointbench_common::{EntityId, Transform};
use jointbench_kernel::{EntityKind, World};
use rapier3d::parry::mass_properties::MassProperties;
use rapier3d::prelude::*;

use crate::context::PhysicsContext;
use crate::convert::{entity_tag, vec3_to_rapier};
use crate::error::{PhysicsError, Result};

/// Mass properties of a solid box: inertia from `density`, total mass `mass`.
pub fn box_mass_properties(half_extents: Vec3, density: f32, mass: f32) -> MassProperties {
    let derived = MassProperties::from_cuboid(density, vec3_to_rapier(half_extents));
    MassProperties::with_principal_inertia_frame(
        derived.local_com,
        mass,
        derived.principal_inertia(),
        derived.principal_inertia_local_frame,
    )
}

fn validate_box(half_extents: Vec3, position: Vec3) -> Result<()> {
    if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
        return Err(PhysicsError::InvalidGeometry(format!(
            "half extents must be positive and finite, got {half_extents}"
        )));
    }
    if !position.is_finite() {
        return Err(PhysicsError::InvalidGeometry(format!(
            "position must be finite, got {position}"
        )));
    }
    Ok(())
}

impl PhysicsContext {
    fn box_collider(&self, half_extents: Vec3) -> ColliderBuilder {
        let material = self.config().material;
        ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(material.dynamic_friction)
            .restitution(material.restitution)
    }

    /// Spawn a simulated box of total `mass` centered at `position`.
    pub fn create_dynamic_box(
        &mut self,
        world: &mut World,
        mass: f32,
        half_extents: Vec3,
        position: Vec3,
    ) -> Result<EntityId> {
        validate_box(half_extents, position)?;
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidGeometry(format!(
                "mass must be positive and finite, got {mass}"
            )));
        }

        let id = world.spawn(
            EntityKind::Dynamic,
            Transform::from_position_scale(position, half_extents * 2.0),
        );

        let body = RigidBodyBuilder::dynamic()
            .translation(vec3_to_rapier(position))
            .user_data(entity_tag(id))
            .build();
        let handle = self.bodies.insert(body);

        let mprops = box_mass_properties(half_extents, self.config().nominal_density, mass);
        let collider = self.box_collider(half_extents).mass_properties(mprops).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        self.bind(id, handle);

        tracing::info!(%id, mass, ?half_extents, ?position, "dynamic box created");
        Ok(id)
    }

    /// Spawn a fixed box that is never simulated.
    pub fn create_ground(
        &mut self,
        world: &mut World,
        half_extents: Vec3,
        position: Vec3,
    ) -> Result<EntityId> {
        validate_box(half_extents, position)?;

        let id = world.spawn(
            EntityKind::Static,
            Transform::from_position_scale(position, half_extents * 2.0),
        );

        let body = RigidBodyBuilder::fixed()
            .translation(vec3_to_rapier(position))
            .user_data(entity_tag(id))
            .build();
        let handle = self.bodies.insert(body);
        let collider = self.box_collider(half_extents).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.bind(id, handle);

        tracing::info!(%id, ?half_extents, ?position, "ground created");
        Ok(id)
    }
}
