use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use paperstar_common::Color;
use paperstar_render_wgpu::{OrbitCamera, WgpuRenderer};
use paperstar_scene::{FrameClock, FrameTimer};
use paperstar_showcase::Showcase;
use paperstar_star::StarParams;
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

/// Touchpad pixels that count as one wheel step.
const PIXELS_PER_SCROLL_STEP: f32 = 40.0;

#[derive(Parser)]
#[command(name = "paperstar-desktop", about = "Paperstar showcase viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the images/ folder
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// JSON file with star parameters
    #[arg(long)]
    star_config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    showcase: Showcase,
    params: StarParams,
    camera: OrbitCamera,
    clock: FrameClock,
    timer: FrameTimer,
    show_panel: bool,
    // Input state
    orbiting: bool,
    panning: bool,
}

impl AppState {
    fn new(params: StarParams) -> Self {
        if let Err(e) = params.validate() {
            tracing::warn!("star parameters look off: {e}");
        }
        let showcase = Showcase::build(&params);
        let camera = OrbitCamera::from_view(&showcase.view);
        Self {
            showcase,
            params,
            camera,
            clock: FrameClock::new(),
            timer: FrameTimer::new(120),
            show_panel: true,
            orbiting: false,
            panning: false,
        }
    }

    fn update(&mut self, now: Instant) {
        let time = self.clock.tick(now);
        if time.frame > 0 {
            self.timer.record(time.delta);
        }
        self.showcase.scene.update(&time);
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::F1 => {
                self.show_panel = !self.show_panel;
                false
            }
            KeyCode::Escape => true,
            _ => false,
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.orbiting = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    fn handle_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.orbiting {
            self.camera.rotate(dx, dy);
        } else if self.panning {
            self.camera.pan(dx, dy);
        }
    }

    fn regenerate_star(&mut self) {
        if let Err(e) = self.params.validate() {
            tracing::warn!("{e}");
        }
        if let Err(e) = self.showcase.rebuild_star(&self.params) {
            tracing::error!("failed to rebuild star: {e}");
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let mut changed = false;
        egui::SidePanel::left("star_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Lucky Star");
                ui.separator();
                ui.label(format!(
                    "{:.0} fps ({:.2} ms)",
                    self.timer.fps(),
                    self.timer.average().as_secs_f64() * 1000.0
                ));
                ui.label(format!("Objects: {}", self.showcase.scene.object_count()));
                let eye = self.camera.eye();
                ui.label(format!("Camera: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z));
                ui.separator();

                let p = &mut self.params;
                changed |= ui
                    .add(egui::Slider::new(&mut p.outer, 0.5..=15.0).text("outer"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut p.inner, 0.1..=15.0).text("inner"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut p.depth, 0.05..=10.0).text("depth"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut p.bevel_size, 0.0..=3.0).text("bevel size"))
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut p.bevel_thickness, 0.0..=3.0)
                            .text("bevel thickness"),
                    )
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut p.bevel_segments, 0..=16).text("bevel segments"))
                    .changed();

                ui.horizontal(|ui| {
                    ui.label("color");
                    let [_, r, g, b] = p.color.to_hex().to_be_bytes();
                    let mut rgb = [r, g, b];
                    if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                        p.color = Color::from_hex(u32::from_be_bytes([0, rgb[0], rgb[1], rgb[2]]));
                        changed = true;
                    }
                });

                if ui.button("Reset").clicked() {
                    *p = StarParams::default();
                    changed = true;
                }

                ui.separator();
                ui.small("F1: Toggle panel | LMB: Orbit | RMB: Pan | Wheel: Zoom | Esc: Quit");
            });

        if changed {
            self.regenerate_star();
        }
    }
}

/// Window, device and everything drawn with them.
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

struct GpuApp {
    state: AppState,
    assets: PathBuf,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(params: StarParams, assets: PathBuf) -> Self {
        Self {
            state: AppState::new(params),
            assets,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("paperstar")
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
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("paperstar_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

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

        self.state.camera.set_aspect(config.width, config.height);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            self.assets.clone(),
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
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Gpu {
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

    fn resize(&mut self, width: u32, height: u32) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.config.width = width.max(1);
        gpu.config.height = height.max(1);
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer
            .resize(&gpu.device, gpu.config.width, gpu.config.height);
        self.state
            .camera
            .set_aspect(gpu.config.width, gpu.config.height);
    }

    fn redraw(&mut self) {
        self.state.update(Instant::now());

        let Some(gpu) = &mut self.gpu else {
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

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.camera,
            &self.state.showcase.scene,
        );

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
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
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
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key) {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.state
                    .handle_mouse_button(button, state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_SCROLL_STEP,
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
            self.state
                .handle_mouse_motion(delta.0 as f32, delta.1 as f32);
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

    tracing::info!("paperstar-desktop starting");

    let params = match &cli.star_config {
        Some(path) => StarParams::load(path)
            .with_context(|| format!("reading star config {}", path.display()))?,
        None => StarParams::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(params, cli.assets);
    event_loop.run_app(&mut app)?;

    Ok(())
}
