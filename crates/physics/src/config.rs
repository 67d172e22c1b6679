use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Surface material shared by every collider the context creates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub static_friction: f32,
    /// rapier has a single friction coefficient; this one is used.
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            static_friction: 0.5,
            dynamic_friction: 0.5,
            restitution: 0.6,
        }
    }
}

/// Simulation world configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Fixed step length in seconds.
    pub timestep: f32,
    pub material: Material,
    /// Density used to derive a dynamic box's inertia before its mass is overridden.
    pub nominal_density: f32,
    /// Solver worker threads. Only used with the `parallel` feature.
    pub worker_threads: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
            material: Material::default(),
            nominal_density: 10.0,
            worker_threads: 2,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        let m = &self.material;
        for (name, value) in [
            ("static friction", m.static_friction),
            ("dynamic friction", m.dynamic_friction),
            ("restitution", m.restitution),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.nominal_density.is_finite() && self.nominal_density > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "nominal density must be positive, got {}",
                self.nominal_density
            )));
        }
        if self.worker_threads == 0 {
            return Err(PhysicsError::InvalidConfig(
                "at least one worker thread is required".into(),
            ));
        }
        Ok(())
    }
}
