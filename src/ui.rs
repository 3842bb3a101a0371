//! Control panel and world-anchored labels.

use glam::{Mat4, Vec2};

use crate::gpu::project_to_screen;
use crate::ruler::RulerLabel;
use crate::scene::{Scene, UiAction};
use crate::transition::{Stage, MAX_SPEED, MIN_SPEED};

const LABEL_FONT_SIZE: f32 = 14.0;

/// Snapshot of the scene values the panel displays.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub busy: bool,
    pub speed: f32,
    pub separation_label: String,
    pub fps: f32,
}

impl PanelState {
    pub fn from_scene(scene: &Scene, fps: f32) -> Self {
        Self {
            busy: scene.is_busy(),
            speed: scene.speed(),
            separation_label: scene.separation_label(),
            fps,
        }
    }

    /// Transition and reset buttons accept clicks only while idle.
    #[inline]
    pub fn controls_enabled(&self) -> bool {
        !self.busy
    }
}

/// Draw the control panel and return what the user asked for this frame.
///
/// The transition buttons are disabled while a transition runs.
pub fn control_panel(ctx: &egui::Context, state: &PanelState) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::Window::new("Casimir Effect")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(format!("Plate separation: {}", state.separation_label));
            ui.separator();

            actions.extend(transition_buttons(ui, state));

            ui.separator();
            let mut speed = state.speed;
            let slider = ui.add(
                egui::Slider::new(&mut speed, MIN_SPEED..=MAX_SPEED)
                    .text("Speed")
                    .fixed_decimals(2),
            );
            if slider.changed() {
                actions.push(UiAction::SetSpeed(speed));
            }

            ui.separator();
            ui.small(format!("{:.0} fps", state.fps));
        });

    actions
}

/// The two stage buttons and Reset, greyed out while busy.
fn transition_buttons(ui: &mut egui::Ui, state: &PanelState) -> Vec<UiAction> {
    let mut actions = Vec::new();
    ui.add_enabled_ui(state.controls_enabled(), |ui| {
        if ui.button("Demonstrate (Stage 1)").clicked() {
            actions.push(UiAction::Demonstrate(Stage::Narrow));
        }
        if ui.button("Demonstrate (Stage 2)").clicked() {
            actions.push(UiAction::Demonstrate(Stage::Contact));
        }
        if ui.button("Reset").clicked() {
            actions.push(UiAction::Reset);
        }
    });
    actions
}

/// Paint the ruler labels at their projected screen positions, behind any
/// egui windows.
pub fn paint_ruler_labels(ctx: &egui::Context, labels: &[RulerLabel], view_proj: &Mat4) {
    let screen = ctx.screen_rect();
    let size = Vec2::new(screen.width(), screen.height());
    let painter = ctx.layer_painter(egui::LayerId::background());

    for label in labels {
        if let Some(pos) = project_to_screen(view_proj, label.position, size) {
            painter.text(
                egui::pos2(screen.min.x + pos.x, screen.min.y + pos.y),
                egui::Align2::CENTER_CENTER,
                &label.text,
                egui::FontId::proportional(LABEL_FONT_SIZE),
                egui::Color32::BLACK,
            );
        }
    }
}
