//! Egui overlay: control panel and ruler labels.

use winit::window::Window;

/// Egui context, winit input state and wgpu renderer.
pub struct EguiIntegration {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pending: PendingTextures,
    to_free: Vec<egui::TextureId>,
}

/// Tessellated output of one UI frame.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub pixels_per_point: f32,
}

/// Texture updates produced by UI frames that have not reached the GPU yet.
///
/// Egui sends each font atlas upload only once, so a delta from a frame that
/// was never rendered has to be carried into the next one.
#[derive(Default)]
pub struct PendingTextures {
    delta: egui::TexturesDelta,
}

impl PendingTextures {
    pub fn push(&mut self, delta: egui::TexturesDelta) {
        self.delta.append(delta);
    }

    pub fn take(&mut self) -> egui::TexturesDelta {
        std::mem::take(&mut self.delta)
    }

    pub fn is_empty(&self) -> bool {
        self.delta.is_empty()
    }
}

impl EguiIntegration {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();

        // Light theme to sit on the pale scene background
        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::light();
        style.visuals.window_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(device, output_format, None, 1, false);

        Self {
            ctx,
            state,
            renderer,
            pending: PendingTextures::default(),
            to_free: Vec::new(),
        }
    }

    /// Returns true if egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run one UI frame and tessellate it. Texture updates are queued until
    /// the next [`prepare`](Self::prepare).
    pub fn run(&mut self, window: &Window, run_ui: impl FnMut(&egui::Context)) -> EguiFrameOutput {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, run_ui);

        self.state
            .handle_platform_output(window, full_output.platform_output);
        self.pending.push(full_output.textures_delta);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        EguiFrameOutput {
            paint_jobs,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Upload queued textures and vertex data. The returned command buffers
    /// must be submitted before the encoder that renders the UI.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        let delta = self.pending.take();
        for (id, image_delta) in &delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.to_free.extend(delta.free);

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &output.paint_jobs,
            screen_descriptor,
        )
    }

    pub fn renderer(&self) -> &egui_wgpu::Renderer {
        &self.renderer
    }

    /// Free textures released by the frame that was just submitted.
    pub fn cleanup(&mut self) {
        for id in self.to_free.drain(..) {
            self.renderer.free_texture(&id);
        }
    }
}
