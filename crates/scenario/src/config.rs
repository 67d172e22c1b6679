use glam::Vec3;
use jointbench_common::Color;
use jointbench_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};

/// One box of the scene. `mass` is ignored for the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub mass: f32,
    pub half_extents: Vec3,
    pub position: Vec3,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub physics: PhysicsConfig,
    pub ground: BoxSpec,
    /// Lower plank, keeps B clear of the ground.
    pub plank_c: BoxSpec,
    pub plank_b: BoxSpec,
    /// The probe cube that gets welded to B.
    pub probe_a: BoxSpec,
    /// Anchor on C, then on B, for the plank weld.
    pub plank_anchors: (Vec3, Vec3),
    /// Seconds of elapsed time before the probe is attached.
    pub joint_delay: f32,
    /// Save and restore A's filter data around the probe attachment.
    pub preserve_filter_data: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let plank = Vec3::new(8.0, 0.25, 1.5);
        Self {
            physics: PhysicsConfig::default(),
            ground: BoxSpec {
                mass: 0.0,
                half_extents: Vec3::new(90.0, 0.5, 90.0),
                position: Vec3::ZERO,
                color: Color::GROUND,
            },
            plank_c: BoxSpec {
                mass: 1000.0,
                half_extents: plank,
                position: Vec3::new(0.0, 2.0, 0.0),
                color: Color::RED,
            },
            plank_b: BoxSpec {
                mass: 1000.0,
                half_extents: plank,
                position: Vec3::new(0.0, 4.0, 0.0),
                color: Color::RED,
            },
            probe_a: BoxSpec {
                mass: 50.0,
                half_extents: Vec3::splat(0.5),
                position: Vec3::new(0.0, 5.0, 0.0),
                color: Color::GREEN,
            },
            plank_anchors: (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
            joint_delay: 3.0,
            preserve_filter_data: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planks_are_two_units_apart() {
        let c = ScenarioConfig::default();
        assert_eq!(c.plank_b.position.y - c.plank_c.position.y, 2.0);
        let (on_c, on_b) = c.plank_anchors;
        assert_eq!(
            c.plank_c.position + on_c,
            c.plank_b.position + on_b,
            "anchors meet in world space"
        );
    }

    #[test]
    fn workaround_is_off_by_default() {
        let c = ScenarioConfig::default();
        assert!(!c.preserve_filter_data);
        assert_eq!(c.joint_delay, 3.0);
        assert_eq!(c.probe_a.mass, 50.0);
    }
}
