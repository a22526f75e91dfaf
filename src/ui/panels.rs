use egui::{Color32, Context, RichText, ScrollArea, Ui};

use wire3d::mesh::{MAX_HEIGHT, MAX_WIDTH, RotationStrategy, SURFACE_PRESETS, Topology};

use crate::renderer::CameraMode;
use crate::ui::state::UiState;
use crate::ui::theme::*;

/// What the panel asked the app to do this frame.
#[derive(Default)]
pub struct UiActions {
    pub regenerate: bool,
    pub set_angle: Option<f32>,
    pub set_strategy: Option<RotationStrategy>,
    pub frame_camera: bool,
}

/// Numbers shown in the statistics box.
#[derive(Default, Clone, Copy)]
pub struct MeshStats {
    pub fps: f32,
    pub vertices: usize,
    pub segments: usize,
    pub calculated_indices: usize,
    pub written_indices: usize,
    pub total_rotation: f32,
}

pub fn draw_side_panel(
    ctx: &Context,
    state: &mut UiState,
    stats: &MeshStats,
    last_error: &Option<String>,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(320.0)
        .max_width(420.0)
        .default_width(340.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("wire3d").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Parametric surface wireframes").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                section_header(ui, "SURFACE");
                egui::ComboBox::from_id_salt("surface_presets")
                    .selected_text(state.preset().name)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for (i, preset) in SURFACE_PRESETS.iter().enumerate() {
                            if ui.selectable_label(state.selected_preset == i, preset.name).clicked() {
                                state.apply_preset(i);
                                actions.frame_camera = true;
                            }
                        }
                    });
                ui.add_space(4.0);
                ui.label(RichText::new(state.preset().description).color(TEXT_MUTED).size(11.0).italics());
                ui.add_space(16.0);

                section_header(ui, "GRID");
                let mut changed = false;
                ui.horizontal(|ui| {
                    ui.label("nx:");
                    changed |= ui.add(egui::Slider::new(&mut state.nx, 2..=MAX_WIDTH)).changed();
                });
                ui.horizontal(|ui| {
                    ui.label("ny:");
                    changed |= ui.add(egui::Slider::new(&mut state.ny, 2..=MAX_HEIGHT)).changed();
                });
                ui.add_space(8.0);
                changed |= topology_selector(ui, &mut state.topology);
                ui.add_space(8.0);
                changed |= extent_grid(ui, state);
                if changed {
                    state.needs_regenerate = true;
                }
                ui.add_space(8.0);

                let (btn_text, btn_color, text_color) = if state.needs_regenerate {
                    ("Regenerate", ACCENT_CYAN, BG_DEEP)
                } else {
                    ("Up to date", BG_WIDGET, ACCENT_CYAN)
                };
                if ui.add(egui::Button::new(RichText::new(btn_text).color(text_color))
                    .fill(btn_color).min_size(egui::vec2(ui.available_width(), 32.0))).clicked()
                {
                    actions.regenerate = true;
                }
                if state.needs_regenerate {
                    actions.regenerate = true;
                }

                if let Some(err) = last_error {
                    ui.add_space(6.0);
                    error_box(ui, err);
                }
                ui.add_space(16.0);

                ui.separator();
                ui.add_space(12.0);

                rotation_controls(ui, state, &mut actions);
                ui.add_space(16.0);

                section_header(ui, "VIEW");
                ui.checkbox(&mut state.show_grid, "Show Grid");
                camera_controls(ui, &mut state.camera_mode);
                if ui.button("Frame mesh").clicked() {
                    actions.frame_camera = true;
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.vsync_enabled, "VSync");
                    ui.checkbox(&mut state.show_stats, "Stats");
                });
                ui.add_space(16.0);

                if state.show_stats {
                    ui.separator();
                    ui.add_space(12.0);
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn topology_selector(ui: &mut Ui, topology: &mut Topology) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Topology:");
        egui::ComboBox::from_id_salt("topology")
            .selected_text(topology.name())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for candidate in Topology::ALL {
                    if ui.selectable_label(*topology == candidate, candidate.name()).clicked()
                        && *topology != candidate
                    {
                        *topology = candidate;
                        changed = true;
                    }
                }
            });
    });
    changed
}

fn extent_grid(ui: &mut Ui, state: &mut UiState) -> bool {
    let mut changed = false;
    egui::Grid::new("extent").num_columns(3).spacing([8.0, 4.0]).show(ui, |ui| {
        ui.label("");
        ui.label(RichText::new("Size").color(TEXT_MUTED).size(10.0));
        ui.label(RichText::new("Start").color(TEXT_MUTED).size(10.0));
        ui.end_row();

        ui.label("X");
        changed |= ui.add(egui::DragValue::new(&mut state.width).speed(0.05).range(0.01..=1000.0)).changed();
        changed |= ui.add(egui::DragValue::new(&mut state.x_start).speed(0.05)).changed();
        ui.end_row();

        ui.label("Y");
        changed |= ui.add(egui::DragValue::new(&mut state.height).speed(0.05).range(0.01..=1000.0)).changed();
        changed |= ui.add(egui::DragValue::new(&mut state.y_start).speed(0.05)).changed();
        ui.end_row();
    });
    changed
}

fn rotation_controls(ui: &mut Ui, state: &mut UiState, actions: &mut UiActions) {
    section_header(ui, "ROTATION");
    ui.checkbox(&mut state.rotation_enabled, "Rotate about z");
    ui.horizontal(|ui| {
        ui.label("Step:");
        if ui.add(egui::Slider::new(&mut state.angle_step, -0.1..=0.1).suffix(" rad")).changed() {
            actions.set_angle = Some(state.angle_step);
        }
    });
    ui.horizontal(|ui| {
        ui.label("Strategy:");
        for strategy in RotationStrategy::ALL {
            if ui.selectable_label(state.strategy == strategy, strategy.name()).clicked()
                && state.strategy != strategy
            {
                state.strategy = strategy;
                actions.set_strategy = Some(strategy);
            }
        }
    });
    if state.strategy == RotationStrategy::SmallAngle && state.angle_step.abs() > 0.1 {
        ui.label(RichText::new("small-angle pair drifts past 0.1 rad").color(ACCENT_AMBER).size(10.0));
    }
}

fn camera_controls(ui: &mut Ui, mode: &mut CameraMode) {
    ui.horizontal(|ui| {
        ui.label("Camera:");
        if ui.selectable_label(*mode == CameraMode::Free, "Free").clicked() {
            *mode = CameraMode::Free;
        }
        if ui.selectable_label(*mode == CameraMode::Orbital, "Orbital").clicked() {
            *mode = CameraMode::Orbital;
        }
    });
}

fn error_box(ui: &mut Ui, err: &str) {
    egui::Frame::default()
        .fill(Color32::from_rgb(40, 15, 15))
        .stroke(egui::Stroke::new(1.0, ACCENT_RED))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(err).color(ACCENT_RED).size(11.0));
        });
}

fn stats_panel(ui: &mut Ui, stats: &MeshStats) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

            let fps_color = if stats.fps >= 60.0 { ACCENT_GREEN } else if stats.fps >= 30.0 { ACCENT_AMBER } else { ACCENT_RED };
            let index_color = if stats.calculated_indices == stats.written_indices { TEXT_PRIMARY } else { ACCENT_AMBER };

            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("FPS").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.0}", stats.fps)).color(fps_color));
                ui.end_row();

                ui.label(RichText::new("Vertices").color(TEXT_MUTED));
                ui.label(RichText::new(fmt_num(stats.vertices)).color(ACCENT_CYAN));
                ui.end_row();

                ui.label(RichText::new("Segments").color(TEXT_MUTED));
                ui.label(RichText::new(fmt_num(stats.segments)).color(ACCENT_CYAN));
                ui.end_row();

                ui.label(RichText::new("Indices").color(TEXT_MUTED));
                ui.label(RichText::new(format!(
                    "{} / {}",
                    fmt_num(stats.written_indices),
                    fmt_num(stats.calculated_indices)
                )).color(index_color));
                ui.end_row();

                ui.label(RichText::new("Rotation").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.2} rad", stats.total_rotation)).color(TEXT_PRIMARY));
                ui.end_row();
            });
        });
}

pub fn draw_help_overlay(ctx: &Context, pos: [f32; 3], mode: CameraMode) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    let help = match mode {
                        CameraMode::Free => "WASD - Move | Space/Shift - Up/Down | RMB+Drag - Look | Scroll - Speed",
                        CameraMode::Orbital => "RMB+Drag - Orbit | Scroll - Zoom | F - Frame mesh",
                    };
                    ui.label(RichText::new(help).color(TEXT_MUTED));
                    ui.label(RichText::new(format!("Pos: ({:.2}, {:.2}, {:.2})", pos[0], pos[1], pos[2])).color(TEXT_MUTED));
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_counts_compactly() {
        assert_eq!(fmt_num(999), "999");
        assert_eq!(fmt_num(1_500), "1.5K");
        assert_eq!(fmt_num(262_144), "262.1K");
        assert_eq!(fmt_num(1_572_864), "1.57M");
    }
}
