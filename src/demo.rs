//! Demo builder and window loop.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::DemoError;
use crate::gpu::{line_instances, solid_vertices, visible_instances, FrameInput, GpuState};
use crate::particles::DEFAULT_PARTICLE_COUNT;
use crate::scene::{Scene, UiAction};
use crate::time::Time;
use crate::transition::{clamp_speed, DEFAULT_SPEED};
use crate::ui::{self, PanelState};

/// Pixel-scroll to line-scroll conversion for trackpads.
const PIXEL_SCROLL_SCALE: f32 = 0.1;

/// Settings for a demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Total particles, split evenly between inside and outside.
    pub particle_count: u32,
    /// Initial transition speed factor.
    pub speed: f32,
    /// Fixed RNG seed for a reproducible run.
    pub seed: Option<u64>,
    /// Logical window size.
    pub window_size: (u32, u32),
    pub title: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            speed: DEFAULT_SPEED,
            seed: None,
            window_size: (1280, 720),
            title: "Casimir Effect".to_string(),
        }
    }
}

/// The Casimir effect visualization.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// CasimirDemo::new()
///     .with_particle_count(4000)
///     .with_speed(2.0)
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct CasimirDemo {
    config: DemoConfig,
}

impl CasimirDemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Initial speed factor, clamped to the slider range.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.config.speed = clamp_speed(speed);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_size = (width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Run the demo. Blocks until the window is closed.
    pub fn run(self) -> Result<(), DemoError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    time: Time,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    /// First fatal error; the loop exits as soon as it is set.
    error: Option<DemoError>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        let scene = Scene::new(&config);
        Self {
            config,
            window: None,
            gpu_state: None,
            scene,
            time: Time::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: DemoError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), DemoError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let gpu_state = pollster::block_on(GpuState::new(window, self.config.particle_count))?;
        self.gpu_state = Some(gpu_state);
        // Don't count GPU setup as the first frame's delta
        self.time = Time::new();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.time.update();
        self.scene.update(dt);

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        let solids = solid_vertices(&self.scene.solid_batches());
        let particles = visible_instances(self.scene.particles());
        let lines = line_instances(&self.scene.line_batches());
        let panel = PanelState::from_scene(&self.scene, self.time.fps());
        let view_proj = gpu_state.view_proj();
        let labels = self.scene.ruler().labels();

        let mut actions: Vec<UiAction> = Vec::new();
        let frame = FrameInput {
            solids: &solids,
            particles: &particles,
            lines: &lines,
        };
        let result = gpu_state.render(frame, |ctx| {
            ui::paint_ruler_labels(ctx, labels, &view_proj);
            actions = ui::control_panel(ctx, &panel);
        });

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        for action in actions {
            self.scene.apply(action);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        // egui sees everything first; camera controls only get what it leaves
        let consumed = match &mut self.gpu_state {
            Some(gpu_state) => gpu_state.on_window_event(&event),
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed && !consumed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * PIXEL_SCROLL_SCALE,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
