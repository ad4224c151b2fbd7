use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use boatclub_assets::SceneAssets;
use boatclub_input::Key;
use boatclub_kernel::{SceneConfig, SceneState};
use boatclub_render::{FrameLoop, FrameScheduler, FrameTimer, SceneNodes};
use boatclub_render_wgpu::WgpuRenderer;
use boatclub_tools::SceneInspector;
use clap::Parser;
use egui::Context as EguiContext;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "boatclub-desktop", about = "Boat club scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the scene meshes and textures
    #[arg(short, long)]
    assets: Option<PathBuf>,
}

fn scene_key(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        _ => Key::Other,
    }
}

/// Requests the next frame from the window's redraw cycle.
struct WindowScheduler(Arc<Window>);

impl FrameScheduler for WindowScheduler {
    fn schedule_next(&mut self) -> bool {
        self.0.request_redraw();
        true
    }
}

/// What the redraw path does after failing to acquire a surface texture.
/// Every outcome except `Exit` keeps a redraw pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Retry,
    Exit,
}

fn surface_recovery(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Exit,
        _ => SurfaceRecovery::Retry,
    }
}

/// Application state.
struct AppState {
    frame_loop: FrameLoop,
    timer: FrameTimer,
    show_hud: bool,
}

impl AppState {
    fn new(frame_loop: FrameLoop) -> Self {
        Self {
            frame_loop,
            timer: FrameTimer::new(120),
            show_hud: true,
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if code == KeyCode::F1 {
            self.show_hud = !self.show_hud;
            return;
        }

        let Some(action) = scene_key(code).action() else {
            return;
        };
        let state = self.frame_loop.state_mut();
        let controls = *state.controls();
        action.apply(state.camera_mut(), &controls);
        tracing::debug!(?action, camera = ?state.camera(), "camera moved");
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = SceneInspector::summary(self.frame_loop.state());

        egui::SidePanel::left("hud")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Boat Club");
                ui.separator();
                ui.label(format!(
                    "Frame: {}  Tick: {}",
                    self.frame_loop.frames(),
                    summary.tick
                ));
                ui.label(format!(
                    "Frame time: {:.2} ms (max {:.2} ms)",
                    self.timer.average().as_secs_f64() * 1000.0,
                    self.timer.max().as_secs_f64() * 1000.0
                ));
                ui.label(summary.camera.to_string());
                ui.separator();

                ui.heading("Boats");
                for actor in &summary.actors {
                    ui.label(actor.to_string());
                }

                ui.separator();
                ui.small("Arrows: Look | WASD: Move | Q/E: Height | F1: Toggle");
            });
    }
}

struct GpuApp {
    state: AppState,
    assets: SceneAssets,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(frame_loop: FrameLoop, assets: SceneAssets) -> Self {
        Self {
            state: AppState::new(frame_loop),
            assets,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Boat Club")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("boatclub_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Shading math produces display-ready values, so skip the sRGB encode.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state
            .frame_loop
            .state_mut()
            .set_aspect(config.width, config.height);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &self.assets.meshes,
            &self.assets.textures,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend, format {surface_format:?}",
            adapter.get_info().backend.to_str()
        );

        window.request_redraw();
        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                match surface_recovery(&e) {
                    SurfaceRecovery::Reconfigure => {
                        surface.configure(device, config);
                        window.request_redraw();
                    }
                    SurfaceRecovery::Retry => {
                        tracing::warn!("surface error: {e}, retrying");
                        window.request_redraw();
                    }
                    SurfaceRecovery::Exit => {
                        tracing::error!("surface error: {e}");
                        event_loop.exit();
                    }
                }
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let started = Instant::now();
        let mut scheduler = WindowScheduler(window.clone());
        if let Err(e) = self
            .state
            .frame_loop
            .step(&mut renderer.frame(device, queue, &view), &mut scheduler)
        {
            tracing::error!("frame failed: {e}");
            event_loop.exit();
            return;
        }
        self.state.timer.record(started.elapsed());
        for event in self.state.frame_loop.state_mut().drain_events() {
            tracing::debug!(
                tick = event.tick,
                boat = event.actor,
                "{:?} -> {:?}",
                event.from,
                event.to
            );
        }

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize GPU: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state
                        .frame_loop
                        .state_mut()
                        .set_aspect(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("boatclub-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let assets = SceneAssets::load(cli.assets.as_deref())?;
    let nodes = SceneNodes::resolve(&assets.meshes, &assets.textures)?;
    let frame_loop = FrameLoop::new(SceneState::from_config(&config)?, nodes);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(frame_loop, assets);
    event_loop.run_app(&mut app)?;

    Ok(())
}
