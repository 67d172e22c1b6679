use glam::{Quat, Vec3};
use jointbench_common::EntityId;
use jointbench_kernel::{EntityData, World};
use rapier3d::prelude::*;
use std::collections::BTreeMap;

use crate::config::PhysicsConfig;
use crate::convert::{isometry_to_pose, pose_to_isometry, rapier_to_vec3, vec3_to_rapier};
use crate::error::{PhysicsError, Result};
use crate::joint::{JointId, JointRecord};

/// The single owner of the simulation world.
///
/// Holds the rapier pipeline and sets, the shared material (through the
/// config), and the binding from entity id to rigid body. Created once at
/// startup and passed explicitly to the factory, the loop and the joint
/// functions; dropping it releases every body, collider and joint.
pub struct PhysicsContext {
    config: PhysicsConfig,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    pub(crate) impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    bindings: BTreeMap<EntityId, RigidBodyHandle>,
    pub(crate) joints: Vec<JointRecord>,
    next_joint: u64,
    #[cfg(feature = "parallel")]
    pool: std::sync::Arc<rayon::ThreadPool>,
}

impl PhysicsContext {
    /// Validate `config` and build an empty simulation world.
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;

        let integration_parameters = IntegrationParameters {
            dt: config.timestep,
            ..IntegrationParameters::default()
        };

        #[cfg(feature = "parallel")]
        let pool = std::sync::Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("physics-worker-{i}"))
                .build()?,
        );

        tracing::info!(
            gravity = ?config.gravity,
            timestep = config.timestep,
            workers = config.worker_threads,
            "physics context created"
        );

        Ok(Self {
            config,
            gravity: vec3_to_rapier(config.gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            bindings: BTreeMap::new(),
            joints: Vec::new(),
            next_joint: 0,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Number of bodies registered in the simulation world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Joints created so far, in creation order.
    pub fn joints(&self) -> &[JointRecord] {
        &self.joints
    }

    /// Advance the world by one fixed timestep.
    ///
    /// Returns once the solver has finished; results are visible to
    /// [`PhysicsContext::sync_states`] immediately afterwards.
    pub fn step(&mut self) {
        let _span = tracing::debug_span!("physics_step").entered();

        #[cfg(feature = "parallel")]
        {
            let pool = std::sync::Arc::clone(&self.pool);
            pool.install(|| self.run_pipeline());
        }
        #[cfg(not(feature = "parallel"))]
        self.run_pipeline();
    }

    fn run_pipeline(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    pub(crate) fn next_joint_id(&mut self) -> JointId {
        let id = JointId(self.next_joint);
        self.next_joint += 1;
        id
    }

    pub(crate) fn bind(&mut self, id: EntityId, handle: RigidBodyHandle) {
        self.bindings.insert(id, handle);
    }

    /// The rigid body bound to `id`.
    pub fn body_handle(&self, id: EntityId) -> Result<RigidBodyHandle> {
        self.bindings
            .get(&id)
            .copied()
            .filter(|h| self.bodies.contains(*h))
            .ok_or(PhysicsError::MissingBody(id))
    }

    pub(crate) fn body(&self, id: EntityId) -> Result<&RigidBody> {
        let handle = self.body_handle(id)?;
        self.bodies.get(handle).ok_or(PhysicsError::MissingBody(id))
    }

    /// Body of a live, dynamic entity.
    pub(crate) fn dynamic_body(&self, world: &World, id: EntityId) -> Result<RigidBodyHandle> {
        let data = world.get(id).ok_or(PhysicsError::EntityNotFound(id))?;
        if !data.is_dynamic() {
            return Err(PhysicsError::NotDynamic(id));
        }
        let handle = self.body_handle(id)?;
        match self.bodies.get(handle) {
            Some(body) if body.is_dynamic() => Ok(handle),
            Some(_) => Err(PhysicsError::NotDynamic(id)),
            None => Err(PhysicsError::MissingBody(id)),
        }
    }

    /// Total mass the engine reports for the entity's body.
    pub fn body_mass(&self, id: EntityId) -> Result<f32> {
        Ok(self.body(id)?.mass())
    }

    /// Principal inertia of the entity's body, in its local inertia frame.
    pub fn body_inertia(&self, id: EntityId) -> Result<Vec3> {
        let mprops = &self.body(id)?.mass_properties().local_mprops;
        Ok(rapier_to_vec3(&mprops.principal_inertia()))
    }

    /// Current engine-side world pose of the entity's body.
    pub fn body_pose(&self, id: EntityId) -> Result<(Vec3, Quat)> {
        Ok(isometry_to_pose(self.body(id)?.position()))
    }

    /// Discontinuously move an entity's body and mirror the pose into the world.
    ///
    /// `rotation` is normalized before it reaches either side, so the entity
    /// record and the engine body always agree on a unit quaternion.
    pub fn teleport(
        &mut self,
        world: &mut World,
        id: EntityId,
        position: Vec3,
        rotation: Quat,
    ) -> Result<()> {
        if world.get(id).is_none() {
            return Err(PhysicsError::EntityNotFound(id));
        }
        if !position.is_finite() {
            return Err(PhysicsError::InvalidGeometry(format!(
                "teleport position must be finite, got {position}"
            )));
        }
        if !rotation.is_finite() || rotation.length_squared() <= f32::EPSILON {
            return Err(PhysicsError::InvalidGeometry(format!(
                "teleport rotation must be finite and non-zero, got {rotation}"
            )));
        }
        let rotation = rotation.normalize();
        let handle = self.body_handle(id)?;
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::MissingBody(id))?;
        body.set_position(pose_to_isometry(position, rotation), true);
        world.set_pose(id, position, rotation);
        Ok(())
    }

    /// Remove an entity together with its body, colliders and attached joints.
    pub fn despawn(&mut self, world: &mut World, id: EntityId) -> Result<EntityData> {
        let data = world.despawn(id).ok_or(PhysicsError::EntityNotFound(id))?;
        if let Some(handle) = self.bindings.remove(&id) {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.joints.retain(|j| j.entity_a != id && j.entity_b != id);
        tracing::info!(%id, "entity and body removed");
        Ok(data)
    }
}
