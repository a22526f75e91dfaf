use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use glam::{Vec2, Vec3};

use wire3d::config::{AppConfig, DEFAULT_CONFIG_FILE, Overrides};
use wire3d::mesh::{MeshEngine, MeshEvent, MeshSnapshot, Topology};

mod renderer;
mod ui;

use renderer::{Camera, GpuState, generate_grid_vertices};
use ui::{MeshStats, UiActions, UiState, apply_theme, draw_help_overlay, draw_side_panel};

/// Rotation requests older than this are treated as dropped.
const ROTATION_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "wire3d")]
#[command(about = "Parametric surface wireframe viewer", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file; missing means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Surface preset name, e.g. "Ripple".
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    nx: Option<u32>,

    #[arg(long)]
    ny: Option<u32>,

    /// Topology name, e.g. "toroidal-triangle".
    #[arg(long)]
    topology: Option<Topology>,
}

struct InputState {
    forward: f32,
    right: f32,
    up: f32,
    mouse_captured: bool,
    mouse_delta: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            forward: 0.0,
            right: 0.0,
            up: 0.0,
            mouse_captured: false,
            mouse_delta: Vec2::ZERO,
        }
    }
}

struct App {
    config: AppConfig,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: Camera,
    mesh_engine: MeshEngine,
    ui_state: UiState,
    input: InputState,

    last_frame: Instant,
    frame_count: u32,
    fps_timer: Instant,

    stats: MeshStats,
    last_vsync_state: bool,
    mesh_last_error: Option<String>,

    has_mesh: bool,
    mesh_bounds: Option<(Vec3, f32)>,
    frame_on_next_mesh: bool,
    rotation_sent_at: Option<Instant>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let ui_state = UiState::from_config(&config);

        let mesh_engine = MeshEngine::new();
        mesh_engine.set_strategy(ui_state.strategy);
        mesh_engine.set_rotation_angle(ui_state.angle_step);

        Self {
            last_vsync_state: config.viewer.vsync,
            config,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            camera: Camera::default(),
            mesh_engine,
            ui_state,
            input: InputState::default(),

            last_frame: Instant::now(),
            frame_count: 0,
            fps_timer: Instant::now(),

            stats: MeshStats::default(),
            mesh_last_error: None,

            has_mesh: false,
            mesh_bounds: None,
            frame_on_next_mesh: true,
            rotation_sent_at: None,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<(), renderer::GpuError> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.viewer.vsync))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        let size = window.inner_size();
        self.camera
            .set_aspect(size.width.max(1) as f32, size.height.max(1) as f32);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        if self.ui_state.needs_regenerate {
            self.regenerate();
        }
        Ok(())
    }

    fn regenerate(&mut self) {
        let params = self.ui_state.canvas_parameters();
        let preset = self.ui_state.preset();
        info!(
            "regenerating {} {}x{} as {}",
            preset.name, params.nx, params.ny, self.ui_state.topology
        );
        self.mesh_engine.generate(params, preset.surface);
        self.ui_state.needs_regenerate = false;
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs_f32() >= 1.0 {
            self.stats.fps = self.frame_count as f32 / self.fps_timer.elapsed().as_secs_f32();
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        self.camera.set_mode(self.ui_state.camera_mode);
        self.camera
            .process_keyboard(self.input.forward, self.input.right, self.input.up, dt);

        if self.input.mouse_captured {
            self.camera.process_mouse_movement(self.input.mouse_delta);
        }
        self.input.mouse_delta = Vec2::ZERO;

        self.update_mesh();
    }

    fn update_mesh(&mut self) {
        while let Some(event) = self.mesh_engine.try_recv_event() {
            match event {
                MeshEvent::Generated(mesh) => self.on_generated(mesh),
                MeshEvent::Rotated(vertices) => {
                    self.rotation_sent_at = None;
                    if let Some(gpu) = &mut self.gpu {
                        if gpu.wireframe_buffers.upload_vertices(&gpu.queue, &vertices) {
                            self.stats.total_rotation += self.ui_state.angle_step;
                        }
                    }
                }
                MeshEvent::Error(e) => {
                    warn!("mesh generation failed: {e}");
                    self.mesh_last_error = Some(e);
                }
            }
        }

        if !(self.has_mesh && self.ui_state.rotation_enabled) {
            return;
        }
        let waiting = self
            .rotation_sent_at
            .is_some_and(|sent| sent.elapsed() < ROTATION_TIMEOUT);
        if !waiting {
            self.mesh_engine.rotate();
            self.rotation_sent_at = Some(Instant::now());
        }
    }

    fn on_generated(&mut self, mesh: MeshSnapshot) {
        let Some(gpu) = &mut self.gpu else { return };

        gpu.wireframe_buffers.upload_mesh(&gpu.queue, &mesh);

        let extent = mesh.canvas.extent;
        let (z_min, z_max) = mesh.z_range;
        let grid_size = extent.width.max(extent.height).max(1.0);
        let grid = generate_grid_vertices(grid_size, 20, z_min - 0.01 * grid_size);
        gpu.wireframe_buffers.upload_grid(&gpu.queue, &grid);

        self.stats.vertices = mesh.canvas.vertex_count;
        self.stats.segments = mesh.canvas.segment_count();
        self.stats.calculated_indices = mesh.canvas.index_count;
        self.stats.written_indices = mesh.indices.len();
        self.stats.total_rotation = 0.0;

        let center = Vec3::new(
            extent.x_start + extent.width * 0.5,
            extent.y_start + extent.height * 0.5,
            (z_min + z_max) * 0.5,
        );
        let radius = Vec3::new(extent.width, extent.height, z_max - z_min).length() * 0.5;
        self.mesh_bounds = Some((center, radius));
        if self.frame_on_next_mesh {
            self.camera.frame(center, radius);
            self.frame_on_next_mesh = false;
        }

        self.has_mesh = true;
        self.rotation_sent_at = None;
        self.mesh_last_error = None;
    }

    fn render(&mut self) {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let last_error = self
            .mesh_last_error
            .clone()
            .or_else(|| self.mesh_engine.last_error());

        let camera_pos = self.camera.position.to_array();
        let camera_mode = self.camera.mode;
        let stats = self.stats;

        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, &stats, &last_error);
            draw_help_overlay(ctx, camera_pos, camera_mode);
        });

        self.handle_ui_actions(ui_actions);

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory, skipping frame");
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_camera(&self.camera);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_scene(&view, &mut encoder, self.ui_state.show_grid);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if let Some(strategy) = actions.set_strategy {
            self.mesh_engine.set_strategy(strategy);
        }

        if let Some(angle) = actions.set_angle {
            self.mesh_engine.set_rotation_angle(angle);
        }

        if actions.frame_camera {
            if actions.regenerate || self.ui_state.needs_regenerate {
                self.frame_on_next_mesh = true;
            } else {
                self.frame_mesh();
            }
        }

        if actions.regenerate || self.ui_state.needs_regenerate {
            self.regenerate();
        }
    }

    fn frame_mesh(&mut self) {
        if let Some((center, radius)) = self.mesh_bounds {
            self.camera.frame(center, radius);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let value = if pressed { 1.0 } else { 0.0 };

        match key {
            KeyCode::KeyW | KeyCode::KeyZ => self.input.forward = value,
            KeyCode::KeyS => self.input.forward = -value,
            KeyCode::KeyA | KeyCode::KeyQ => self.input.right = -value,
            KeyCode::KeyD => self.input.right = value,
            KeyCode::Space => self.input.up = value,
            KeyCode::ShiftLeft | KeyCode::ControlLeft => self.input.up = -value,
            KeyCode::Escape if pressed => {
                self.input.mouse_captured = false;
                if let Some(window) = &self.window {
                    let _ = window.set_cursor_grab(winit::window::CursorGrabMode::None);
                    window.set_cursor_visible(true);
                }
            }
            KeyCode::KeyR if pressed => {
                self.ui_state.rotation_enabled = !self.ui_state.rotation_enabled;
            }
            KeyCode::KeyF if pressed => self.frame_mesh(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let viewer = &self.config.viewer;
        let window_attrs = Window::default_attributes()
            .with_title(viewer.title.clone())
            .with_inner_size(PhysicalSize::new(viewer.width, viewer.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.init_gpu(window) {
            error!("failed to initialise renderer: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.mesh_engine.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    if size.width > 0 && size.height > 0 {
                        self.camera
                            .set_aspect(size.width as f32, size.height as f32);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state == ElementState::Pressed);
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => {
                self.input.mouse_captured = state == ElementState::Pressed;

                if let Some(window) = &self.window {
                    if self.input.mouse_captured {
                        let _ = window.set_cursor_grab(winit::window::CursorGrabMode::Confined);
                        window.set_cursor_visible(false);
                    } else {
                        let _ = window.set_cursor_grab(winit::window::CursorGrabMode::None);
                        window.set_cursor_visible(true);
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.mouse_captured {
                self.input.mouse_delta.x += delta.0 as f32;
                self.input.mouse_delta.y += delta.1 as f32;
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    config.apply(&Overrides {
        preset: cli.preset,
        nx: cli.nx,
        ny: cli.ny,
        topology: cli.topology,
    })?;
    config.validate()?;
    info!(
        "loaded config from {}: {} at {}x{}",
        cli.config.display(),
        config.viewer.preset,
        config.canvas.nx,
        config.canvas.ny
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
