use glam::Vec3;
use jointbench_common::EntityId;
use jointbench_input::Action;
use jointbench_kernel::World;
use jointbench_physics::{JointId, PhysicsContext, Result};
use jointbench_render::Renderer;
use jointbench_tools::{WorldInspector, filter_data_report};

use crate::config::{BoxSpec, ScenarioConfig};
use crate::report::{FilterSnapshot, ScenarioReport};

/// Entity ids of the four scene boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneIds {
    pub ground: EntityId,
    pub a: EntityId,
    pub b: EntityId,
    pub c: EntityId,
}

pub struct Scenario {
    config: ScenarioConfig,
    ctx: PhysicsContext,
    world: World,
    ids: SceneIds,
    probe_joint: Option<JointId>,
    paused: bool,
    filter_before: Vec<FilterSnapshot>,
    filter_after: Vec<FilterSnapshot>,
    filter_log: Vec<String>,
}

impl Scenario {
    /// Build the scene: ground, C, B, the C-B weld, then A.
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        let _span = tracing::info_span!("scenario_setup").entered();
        let mut ctx = PhysicsContext::new(config.physics)?;
        let mut world = World::new();

        let ground = ctx.create_ground(
            &mut world,
            config.ground.half_extents,
            config.ground.position,
        )?;
        let c = spawn_box(&mut ctx, &mut world, &config.plank_c)?;
        let b = spawn_box(&mut ctx, &mut world, &config.plank_b)?;
        let (anchor_c, anchor_b) = config.plank_anchors;
        ctx.attach_fixed_joint(&mut world, c, anchor_c, b, anchor_b, false)?;
        let a = spawn_box(&mut ctx, &mut world, &config.probe_a)?;

        tracing::info!(%ground, %a, %b, %c, "scene built");
        Ok(Self {
            config,
            ctx,
            world,
            ids: SceneIds { ground, a, b, c },
            probe_joint: None,
            paused: false,
            filter_before: Vec::new(),
            filter_after: Vec::new(),
            filter_log: Vec::new(),
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &PhysicsContext {
        &self.ctx
    }

    pub fn ids(&self) -> SceneIds {
        self.ids
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn probe_joint(&self) -> Option<JointId> {
        self.probe_joint
    }

    /// Filter data dumped right before and right after the probe attachment.
    pub fn filter_dumps(&self) -> (&[FilterSnapshot], &[FilterSnapshot]) {
        (&self.filter_before, &self.filter_after)
    }

    /// Text dumps written around the probe attachment, in the order
    /// before A, before B, after A, after B.
    pub fn filter_log(&self) -> &[String] {
        &self.filter_log
    }

    /// Run one frame at `elapsed` seconds since start.
    ///
    /// Attaches the probe once `elapsed` exceeds the joint delay, then steps
    /// and syncs unless paused.
    pub fn frame(&mut self, elapsed: f32) -> Result<()> {
        if self.probe_joint.is_none() && elapsed > self.config.joint_delay {
            self.attach_probe()?;
        }
        if !self.paused {
            self.ctx.step();
            self.ctx.sync_states(&mut self.world);
            self.world.advance_tick();
        }
        Ok(())
    }

    /// Weld A onto B's center, dumping A and B filter data around it.
    ///
    /// Returns `false` if the probe was already attached.
    pub fn attach_probe(&mut self) -> Result<bool> {
        if self.probe_joint.is_some() {
            return Ok(false);
        }
        let SceneIds { a, b, .. } = self.ids;
        self.filter_log.clear();
        self.filter_before = vec![self.snapshot("before", a)?, self.snapshot("before", b)?];

        let joint = self.ctx.attach_fixed_joint(
            &mut self.world,
            a,
            Vec3::ZERO,
            b,
            Vec3::ZERO,
            self.config.preserve_filter_data,
        )?;

        self.filter_after = vec![self.snapshot("after", a)?, self.snapshot("after", b)?];
        self.probe_joint = Some(joint);
        tracing::info!(%joint, tick = self.world.tick(), "probe attached");
        Ok(true)
    }

    fn snapshot(&mut self, label: &str, id: EntityId) -> Result<FilterSnapshot> {
        let records = self.ctx.filter_data(id)?;
        for fd in &records {
            tracing::info!(entity = %id, label, words = ?fd.words(), "filter data");
        }
        let text = filter_data_report(&self.ctx, id)?;
        self.filter_log.push(format!("[{label}] {text}"));
        Ok(FilterSnapshot {
            label: label.to_string(),
            entity: id,
            records,
        })
    }

    /// React to an input action. Returns `false` once the loop should stop.
    pub fn handle(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Quit => return Ok(false),
            Action::AttachJointNow => {
                if !self.attach_probe()? {
                    tracing::debug!("probe already attached");
                }
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                tracing::info!(paused = self.paused, "simulation pause toggled");
            }
            Action::Noop => {}
        }
        Ok(true)
    }

    /// Draw the ground, A, B and C, then present.
    pub fn draw<R: Renderer>(&self, renderer: &mut R) -> R::Output {
        renderer.clear();
        let cfg = &self.config;
        let SceneIds { ground, a, b, c } = self.ids;
        for (id, spec) in [
            (ground, &cfg.ground),
            (a, &cfg.probe_a),
            (b, &cfg.plank_b),
            (c, &cfg.plank_c),
        ] {
            if let Some(data) = self.world.get(id) {
                renderer.draw_box(data.transform.model_matrix(), spec.color);
            }
        }
        renderer.present()
    }

    pub fn report(&self) -> ScenarioReport {
        ScenarioReport {
            summary: WorldInspector::summary(&self.world),
            joint_attached: self.probe_joint.is_some(),
            preserve_filter_data: self.config.preserve_filter_data,
            entities: WorldInspector::list_entities(&self.world)
                .into_iter()
                .filter_map(|id| WorldInspector::inspect_entity(&self.world, id))
                .collect(),
            filter_before: self.filter_before.clone(),
            filter_after: self.filter_after.clone(),
        }
    }
}

fn spawn_box(ctx: &mut PhysicsContext, world: &mut World, spec: &BoxSpec) -> Result<EntityId> {
    ctx.create_dynamic_box(world, spec.mass, spec.half_extents, spec.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointbench_render::DebugTextRenderer;

    fn scene() -> Scenario {
        Scenario::new(ScenarioConfig::default()).unwrap()
    }

    fn y(s: &Scenario, id: EntityId) -> f32 {
        s.world().get(id).unwrap().transform.position.y
    }

    #[test]
    fn planks_start_two_units_apart() {
        let mut s = scene();
        let ids = s.ids();
        s.ctx.sync_states(&mut s.world);
        assert!((y(&s, ids.b) - y(&s, ids.c) - 2.0).abs() < 1e-5);
        assert_eq!(y(&s, ids.a), 5.0);
        assert_eq!(s.physics().joints().len(), 1);
    }

    #[test]
    fn scene_has_expected_masses() {
        let s = scene();
        let ids = s.ids();
        let ctx = s.physics();
        assert!((ctx.body_mass(ids.a).unwrap() - 50.0).abs() < 1e-3);
        assert!((ctx.body_mass(ids.b).unwrap() - 1000.0).abs() < 1e-2);
        assert!((ctx.body_mass(ids.c).unwrap() - 1000.0).abs() < 1e-2);
        assert_eq!(s.world().dynamic_entities().count(), 3);
    }

    #[test]
    fn probe_waits_for_delay() {
        let mut s = scene();
        let dt = s.config().physics.timestep;
        for i in 0..60 {
            s.frame(i as f32 * dt).unwrap();
        }
        assert!(s.probe_joint().is_none());
        assert_eq!(s.world().tick(), 60);

        s.frame(3.01).unwrap();
        assert!(s.probe_joint().is_some());
        let (before, after) = s.filter_dumps();
        assert_eq!((before.len(), after.len()), (2, 2));
    }

    #[test]
    fn attach_writes_filter_log_in_dump_order() {
        let mut s = scene();
        assert!(s.filter_log().is_empty());
        s.attach_probe().unwrap();

        let ids = s.ids();
        let log = s.filter_log();
        assert_eq!(log.len(), 4);
        let headers: Vec<&str> = log.iter().filter_map(|t| t.lines().next()).collect();
        assert!(headers[0].starts_with("[before]") && headers[0].contains(&ids.a.to_string()));
        assert!(headers[1].starts_with("[before]") && headers[1].contains(&ids.b.to_string()));
        assert!(headers[2].starts_with("[after]") && headers[2].contains(&ids.a.to_string()));
        assert!(headers[3].starts_with("[after]") && headers[3].contains(&ids.b.to_string()));

        let expected = filter_data_report(s.physics(), ids.a).unwrap();
        assert_eq!(log[2], format!("[after] {expected}"));
        assert!(log.iter().all(|t| t.lines().skip(1).all(|l| l.starts_with("FilterData: "))));
    }

    #[test]
    fn attach_snaps_probe_onto_plank() {
        let mut s = scene();
        for _ in 0..10 {
            s.frame(0.0).unwrap();
        }
        assert!(s.attach_probe().unwrap());
        let ids = s.ids();
        let pa = s.world().get(ids.a).unwrap().transform.position;
        let pb = s.world().get(ids.b).unwrap().transform.position;
        assert!((pa - pb).length() < 1e-5);
        assert!(!s.attach_probe().unwrap());
        assert_eq!(s.physics().joints().len(), 2);
    }

    #[test]
    fn filter_data_survives_attachment_either_way() {
        for preserve in [false, true] {
            let mut s = Scenario::new(ScenarioConfig {
                preserve_filter_data: preserve,
                ..ScenarioConfig::default()
            })
            .unwrap();
            s.attach_probe().unwrap();
            assert_eq!(s.report().filter_data_unchanged(), Some(true));
        }
    }

    #[test]
    fn actions_drive_the_loop() {
        let mut s = scene();
        assert!(s.handle(Action::TogglePause).unwrap());
        s.frame(0.0).unwrap();
        assert_eq!(s.world().tick(), 0);
        assert!(s.handle(Action::TogglePause).unwrap());
        assert!(!s.is_paused());

        assert!(s.handle(Action::AttachJointNow).unwrap());
        assert!(s.probe_joint().is_some());
        assert!(s.handle(Action::Noop).unwrap());
        assert!(!s.handle(Action::Quit).unwrap());
    }

    #[test]
    fn draw_order_is_ground_a_b_c() {
        let s = scene();
        let mut r = DebugTextRenderer::new();
        let frame = s.draw(&mut r);
        let lines: Vec<&str> = frame.lines().skip(1).collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("size=(180.00, 1.00, 180.00)"));
        assert!(lines[1].contains("pos=(0.00, 5.00, 0.00)"));
        assert!(lines[2].contains("pos=(0.00, 4.00, 0.00)"));
        assert!(lines[3].contains("pos=(0.00, 2.00, 0.00)"));
    }

    #[test]
    fn jointed_pair_holds_while_simulating() {
        let mut s = scene();
        let dt = s.config().physics.timestep;
        for i in 0..240 {
            s.frame(i as f32 * dt).unwrap();
        }
        let ids = s.ids();
        assert!(s.probe_joint().is_some());
        assert!((y(&s, ids.b) - y(&s, ids.c) - 2.0).abs() < 0.1);
        let pa = s.world().get(ids.a).unwrap().transform.position;
        let pb = s.world().get(ids.b).unwrap().transform.position;
        assert!((pa - pb).length() < 0.1, "probe drifted: {}", (pa - pb).length());
        assert!(y(&s, ids.c) > 0.5, "lower plank fell through the ground");
    }

    #[test]
    fn report_serializes() {
        let mut s = scene();
        s.attach_probe().unwrap();
        let report = s.report();
        assert_eq!(report.entities.len(), 4);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["joint_attached"], true);
        assert_eq!(json["filter_before"].as_array().unwrap().len(), 2);
        assert!(report.to_string().contains("unchanged"));
    }
}
