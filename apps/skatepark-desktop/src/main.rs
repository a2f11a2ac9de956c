use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use skatepark_common::GameConfig;
use skatepark_input::Key;
use skatepark_render_wgpu::{OrbitCamera, RenderStats, SkateparkRenderer};
use skatepark_stage::Stage;
use skatepark_tools::{FrameTimer, StageInspector};
use std::path::PathBuf;
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
#[command(name = "skatepark-desktop", about = "Skatepark desktop application")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::KeyW,
        KeyCode::KeyA => Key::KeyA,
        KeyCode::KeyS => Key::KeyS,
        KeyCode::KeyD => Key::KeyD,
        KeyCode::KeyE => Key::KeyE,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Space => Key::Space,
        _ => return None,
    })
}

/// Application state.
struct AppState {
    stage: Stage,
    camera: OrbitCamera,
    timer: FrameTimer,
    render_stats: RenderStats,
    show_inspector: bool,
    show_labels: bool,
    mouse_captured: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(config: GameConfig) -> Self {
        let mut stage = Stage::new(config);
        stage.load_textures();
        Self {
            stage,
            camera: OrbitCamera::default(),
            timer: FrameTimer::default(),
            render_stats: RenderStats::default(),
            show_inspector: true,
            show_labels: true,
            mouse_captured: false,
            last_frame: Instant::now(),
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_frame;
        self.last_frame = now;
        self.timer.record(elapsed);
        self.stage.update(elapsed.as_secs_f32().min(0.1));
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(key) = map_key(code) {
            self.stage.handle_key(key, pressed);
            return;
        }
        if !pressed {
            return;
        }
        match code {
            KeyCode::F1 => self.show_inspector = !self.show_inspector,
            KeyCode::F2 => self.show_labels = !self.show_labels,
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if self.show_labels {
            self.draw_labels(ctx);
        }
        if !self.show_inspector {
            return;
        }

        let summary = StageInspector::summary(&self.stage);

        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Skatepark");
                ui.separator();
                ui.label(format!("Frame: {}", summary.frame));
                ui.label(format!("Phase: {}", summary.phase));

                let mut time = summary.time_of_day;
                if ui
                    .add(egui::Slider::new(&mut time, 0.0..=0.999).text("Time of day"))
                    .changed()
                {
                    self.stage.set_time_of_day(time);
                }

                ui.separator();
                ui.heading("Character");
                let p = summary.character_position;
                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                let v = summary.velocity;
                ui.label(format!("Velocity: ({:.2}, {:.2}, {:.2})", v.x, v.y, v.z));
                ui.label(format!("Grounded: {}", summary.grounded));
                ui.label(format!("Animation: {}", summary.animation));

                ui.separator();
                ui.heading("Frame times");
                ui.label(format!("FPS: {:.1}", self.timer.fps()));
                if let (Some(avg), Some(min), Some(max)) =
                    (self.timer.average(), self.timer.min(), self.timer.max())
                {
                    ui.label(format!(
                        "avg {:.2} ms  min {:.2} ms  max {:.2} ms",
                        avg.as_secs_f64() * 1000.0,
                        min.as_secs_f64() * 1000.0,
                        max.as_secs_f64() * 1000.0,
                    ));
                }

                ui.separator();
                ui.heading("Scene");
                ui.label(format!(
                    "Nodes: {}  Meshes: {}  Materials: {}",
                    summary.node_count, summary.mesh_count, summary.material_count
                ));
                ui.label(format!(
                    "Textures: {} loaded, {} pending",
                    summary.texture_count, summary.pending_textures
                ));
                ui.label(format!(
                    "Draws: {}  Lights: {}  Stars: {}",
                    self.render_stats.draws, self.render_stats.lights, self.render_stats.points
                ));

                ui.separator();
                ui.small("WASD/Arrows: Move | Space: Jump | E: Trick");
                ui.small("RMB: Orbit | Wheel: Zoom | F1: Inspector | F2: Labels");
            });
    }

    fn draw_labels(&self, ctx: &EguiContext) {
        let screen = ctx.screen_rect();
        let size = Vec2::new(screen.width(), screen.height());
        let view = self.camera.view();
        let focal = size.y / (2.0 * (view.fov_degrees.to_radians() / 2.0).tan());
        let painter = ctx.layer_painter(egui::LayerId::background());

        for label in self.stage.labels() {
            let Some(pos) = view.project(label.position, size) else {
                continue;
            };
            let distance = view.eye.distance(label.position).max(0.01);
            let height = (label.size * focal / distance).clamp(8.0, 96.0);
            let [_, r, g, b] = label.color.to_be_bytes();
            painter.text(
                egui::pos2(screen.min.x + pos.x, screen.min.y + pos.y),
                egui::Align2::CENTER_CENTER,
                label.text,
                egui::FontId::proportional(height),
                egui::Color32::from_rgb(r, g, b),
            );
        }
    }
}

/// Window and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SkateparkRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Skatepark")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
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
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skatepark_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer =
            SkateparkRenderer::new(&device, &queue, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
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

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: GameConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        self.state.update();

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

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

        self.state.render_stats = gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.stage,
            &self.state.camera,
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.camera.aspect = gpu.aspect();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state.camera.aspect = gpu.aspect();
                }
            }
            WindowEvent::Focused(false) => {
                self.state.stage.release_all();
                self.state.mouse_captured = false;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(gpu) = &self.gpu {
                    gpu.window.set_cursor_visible(!self.state.mouse_captured);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
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
            if self.state.mouse_captured {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
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

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    tracing::info!("skatepark-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_stage_keys() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::KeyW));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::ArrowLeft));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::F1), None);
    }

    #[test]
    fn every_stage_key_has_a_physical_key() {
        let mapped: Vec<Key> = [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::KeyE,
            KeyCode::ArrowUp,
            KeyCode::ArrowDown,
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
            KeyCode::Space,
        ]
        .into_iter()
        .filter_map(map_key)
        .collect();
        assert_eq!(mapped.len(), Key::ALL.len());
    }
}
