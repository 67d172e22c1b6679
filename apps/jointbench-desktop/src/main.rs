use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use jointbench_common::EntityId;
use jointbench_input::{Action, InputEvent, Key, map_event};
use jointbench_render_wgpu::{OrbitCamera, WgpuRenderer};
use jointbench_scenario::{Scenario, ScenarioConfig};
use jointbench_tools::WorldInspector;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "jointbench-desktop", about = "Fixed-joint demo window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Save and restore the probe's filter data around the attachment
    #[arg(long)]
    workaround: bool,

    /// Seconds after startup before the probe is attached
    #[arg(long, default_value = "3.0")]
    joint_delay: f32,

    #[arg(long, default_value = "1280")]
    width: u32,

    #[arg(long, default_value = "720")]
    height: u32,
}

fn key_of(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyP => Key::P,
        _ => Key::Other,
    }
}

/// Scene plus everything the window shows about it.
struct AppState {
    scenario: Scenario,
    camera: OrbitCamera,
    started: Instant,
    orbiting: bool,
    show_overlay: bool,
}

impl AppState {
    fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            camera: OrbitCamera::default(),
            started: Instant::now(),
            orbiting: false,
            show_overlay: true,
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }
        let summary = WorldInspector::summary(self.scenario.world());
        let ids = self.scenario.ids();
        let (before, after) = self.scenario.filter_dumps();

        egui::SidePanel::left("overlay")
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Joint bench");
                ui.separator();
                ui.label(format!("Tick: {}", summary.tick));
                ui.label(format!("Elapsed: {:.2} s", self.started.elapsed().as_secs_f32()));
                ui.label(format!(
                    "Simulation: {}",
                    if self.scenario.is_paused() { "paused" } else { "running" }
                ));
                ui.label(format!(
                    "Probe joint: {}",
                    match self.scenario.probe_joint() {
                        Some(id) => id.to_string(),
                        None => format!(
                            "pending ({:.1} s)",
                            self.scenario.config().joint_delay
                        ),
                    }
                ));
                ui.label(format!(
                    "Filter-data workaround: {}",
                    if self.scenario.config().preserve_filter_data { "on" } else { "off" }
                ));
                ui.separator();

                ui.heading("Entities");
                let name = |id: EntityId| match id {
                    id if id == ids.ground => "ground",
                    id if id == ids.a => "A",
                    id if id == ids.b => "B",
                    id if id == ids.c => "C",
                    _ => "?",
                };
                for id in WorldInspector::list_entities(self.scenario.world()) {
                    if let Some(info) = WorldInspector::inspect_entity(self.scenario.world(), id) {
                        let [x, y, z] = info.position;
                        ui.monospace(format!("{:>6} ({x:6.2}, {y:6.2}, {z:6.2})", name(id)));
                    }
                }

                if !before.is_empty() {
                    ui.separator();
                    ui.heading("Filter data");
                    for snapshot in before.iter().chain(after) {
                        ui.label(format!("{} {}", snapshot.label, name(snapshot.entity)));
                        for fd in &snapshot.records {
                            ui.monospace(
                                fd.words()
                                    .iter()
                                    .map(|w| format!("{w:08x}"))
                                    .collect::<Vec<_>>()
                                    .join(" "),
                            );
                        }
                    }
                }

                ui.separator();
                ui.small("J: attach now | P: pause | F1: overlay | RMB: orbit | Esc: quit");
            });
    }
}

/// Window and GPU resources, created on resume.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, size: PhysicalSize<u32>) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("jointbench")
            .with_inner_size(size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("jointbench_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create GPU device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            width = config.width,
            height = config.height,
            "GPU initialized"
        );
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw_overlay(
        &mut self,
        egui_ctx: &EguiContext,
        view: &wgpu::TextureView,
        state: &AppState,
    ) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer.render(&mut pass, &paint_jobs, &screen);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct App {
    state: AppState,
    size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    /// First fatal error; returned from `main` after the loop exits.
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(scenario: Scenario, size: PhysicalSize<u32>) -> Self {
        Self {
            state: AppState::new(scenario),
            size,
            gpu: None,
            egui_ctx: EguiContext::default(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.failure.get_or_insert(error);
        event_loop.exit();
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        let action = map_event(event);
        if action == Action::Noop {
            return;
        }
        match self.state.scenario.handle(action) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("quit requested");
                event_loop.exit();
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let elapsed = self.state.started.elapsed().as_secs_f32();
        if let Err(e) = self.state.scenario.frame(elapsed) {
            self.fail(event_loop, anyhow::Error::from(e).context("simulation frame failed"));
            return;
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        self.state.scenario.draw(&mut gpu.renderer);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &self.state.camera);
        gpu.draw_overlay(&self.egui_ctx, &view, &self.state);

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, self.size) {
            Ok(gpu) => {
                self.state.camera.set_viewport(gpu.config.width, gpu.config.height);
                self.gpu = Some(gpu);
                // The delay counts from the first visible frame.
                self.state.started = Instant::now();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = self.gpu.as_mut() {
            if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.dispatch(event_loop, InputEvent::CloseRequested),
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size);
                    self.state.camera.set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::F1 && state == ElementState::Pressed {
                    self.state.show_overlay = !self.state.show_overlay;
                }
                let key = key_of(code);
                let event = match state {
                    ElementState::Pressed => InputEvent::KeyPressed(key),
                    ElementState::Released => InputEvent::KeyReleased(key),
                };
                self.dispatch(event_loop, event);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => {
                self.state.orbiting = state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.orbiting {
                self.state.camera.orbit(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("jointbench-desktop starting");

    let config = ScenarioConfig {
        joint_delay: cli.joint_delay,
        preserve_filter_data: cli.workaround,
        ..ScenarioConfig::default()
    };
    let scenario = Scenario::new(config).context("failed to build the demo scene")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scenario, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e),
        None => {
            print!("{}", app.state.scenario.report());
            Ok(())
        }
    }
}
