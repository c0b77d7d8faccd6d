use eframe::egui;
use tracing::{info, warn};

use mandel6_core::{CenterTable, EvalParams, MAX_CANDIDATES};
use mandel6_render::{ColorParams, EvalMode};

use crate::app::{Mandel6App, MAX_RESOLUTION_DIVISOR};

impl Mandel6App {
    pub(crate) fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut open = true;
        let mut params = self.params;
        let mut cycles = self.colors.color_cycles;

        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .default_width(320.0)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(10, 10, 10, 210)),
            )
            .show(ctx, |ui| {
                ui.heading("Evaluation");
                egui::Grid::new("settings_eval")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Max iterations:");
                        ui.add(
                            egui::DragValue::new(&mut params.max_iterations)
                                .range(1..=100_000)
                                .speed(5),
                        );
                        ui.end_row();

                        ui.label("Draw range:");
                        ui.add(
                            egui::DragValue::new(&mut params.draw_range)
                                .range(2.0..=1000.0)
                                .speed(0.1),
                        );
                        ui.end_row();

                        ui.label("Candidates (K):");
                        ui.add(egui::Slider::new(
                            &mut params.candidate_count,
                            1..=MAX_CANDIDATES,
                        ));
                        ui.end_row();

                        ui.label("First tick burst:");
                        ui.add(egui::Slider::new(&mut params.first_tick_burst, 1..=200));
                        ui.end_row();

                        ui.label("Mode:");
                        egui::ComboBox::from_id_salt(egui::Id::new("eval_mode"))
                            .selected_text(format!("{:?}", self.mode))
                            .show_ui(ui, |ui| {
                                ui.selectable_value(
                                    &mut self.mode,
                                    EvalMode::Progressive,
                                    "Progressive",
                                );
                                ui.selectable_value(
                                    &mut self.mode,
                                    EvalMode::FullRecompute,
                                    "Full recompute",
                                );
                            });
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.heading("Display");
                egui::Grid::new("settings_display")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Color cycles:");
                        ui.add(
                            egui::DragValue::new(&mut cycles)
                                .range(0.1..=32.0)
                                .speed(0.05),
                        );
                        ui.end_row();

                        ui.label("Resolution divisor:");
                        ui.add(egui::Slider::new(
                            &mut self.resolution_divisor,
                            1..=MAX_RESOLUTION_DIVISOR,
                        ));
                        ui.end_row();

                        ui.label("New center scale:");
                        ui.add(
                            egui::DragValue::new(&mut self.preferences.new_center_scale)
                                .range(0.01..=4.0)
                                .speed(0.01),
                        );
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.heading("Centers");
                ui.label(format!("{} registered", self.centers.len()));
                ui.horizontal(|ui| {
                    if ui.button("Classic").clicked() {
                        self.centers = CenterTable::classic();
                        info!("Switched to single-center table");
                    }
                    if ui.button("Six centers").clicked() {
                        self.centers = CenterTable::default_six();
                        info!("Switched to default six-center table");
                    }
                    if ui.button("Reset view").clicked() {
                        self.reset_view();
                    }
                });

                ui.add_space(8.0);
                ui.checkbox(
                    &mut self.preferences.restore_last_session,
                    "Restore last session on startup",
                );
                ui.label(
                    egui::RichText::new("Shift+click adds a center, drag a marker to move it.")
                        .small()
                        .weak(),
                );
            });

        if params != self.params {
            match EvalParams::new(
                params.max_iterations,
                params.draw_range,
                params.candidate_count,
                params.first_tick_burst,
            ) {
                Ok(p) => self.params = p,
                Err(e) => warn!("Rejected evaluation settings: {e}"),
            }
        }
        if cycles != self.colors.color_cycles {
            match ColorParams::new(cycles) {
                Ok(c) => self.colors = c,
                Err(e) => warn!("Rejected color cycles: {e}"),
            }
        }

        if !open {
            self.show_settings = false;
            self.capture_preferences();
            self.preferences.save();
        }
    }
}
