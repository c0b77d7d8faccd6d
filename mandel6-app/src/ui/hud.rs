use std::time::Duration;

use eframe::egui;

use crate::app::{Mandel6App, HUD_CORNER_RADIUS, HUD_MARGIN};

const HUD_ALPHA: u8 = 166;
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

impl Mandel6App {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }

        // -- Top-left: view info --
        egui::Area::new(egui::Id::new("hud_params"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        ui.label(format!(
                            "Center: {:.10} {:+.10}i",
                            self.viewport.center.re, self.viewport.center.im
                        ));
                        ui.label(format!("Zoom: {:.3e}", self.viewport.zoom));
                        ui.label(format!("Centers: {}", self.centers.len()));
                        ui.label(format!(
                            "Iterations: {}  Range: {}  K: {}",
                            self.params.max_iterations,
                            self.params.draw_range,
                            self.params.candidate_count
                        ));
                        ui.label(format!("Mode: {:?}", self.mode));
                    });
            });

        // -- Bottom-centre: tick stats --
        egui::Area::new(egui::Id::new("hud_stats"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.set_min_width(180.0);
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        let Some(stats) = self.last_stats else {
                            ui.label("Waiting for first frame");
                            return;
                        };
                        let (label, color) = if stats.is_converged() {
                            ("Converged", egui::Color32::from_rgb(100, 255, 100))
                        } else {
                            ("Iterating", egui::Color32::YELLOW)
                        };
                        ui.colored_label(color, label);
                        ui.label(format!(
                            "{}×{} grid, tick {:.1} ms, frame {:.1} ms",
                            stats.width,
                            stats.height,
                            stats.elapsed.as_secs_f64() * 1000.0,
                            self.frame_ms,
                        ));
                        ui.label(format!(
                            "{} escaped, {} saturated, {} live",
                            stats.counts.escaped, stats.counts.saturated, stats.counts.live,
                        ));
                    });
            });

        // -- Top-centre: transient status --
        if let Some((ref message, at)) = self.status_message {
            if at.elapsed() < STATUS_TIMEOUT {
                egui::Area::new(egui::Id::new("hud_status"))
                    .anchor(egui::Align2::CENTER_TOP, [0.0, HUD_MARGIN])
                    .show(ctx, |ui| {
                        egui::Frame::NONE
                            .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                            .inner_margin(egui::Margin::same(6))
                            .corner_radius(HUD_CORNER_RADIUS)
                            .show(ui, |ui| {
                                ui.colored_label(egui::Color32::WHITE, message);
                            });
                    });
                ctx.request_repaint_after(STATUS_TIMEOUT);
            } else {
                self.status_message = None;
            }
        }
    }

    /// Ring each registered center where it sits on screen.
    pub(crate) fn draw_center_markers(&self, painter: &egui::Painter, rect: egui::Rect) {
        let idle = egui::Stroke::new(1.5, egui::Color32::from_rgba_unmultiplied(255, 160, 80, 180));
        let active = egui::Stroke::new(2.0, egui::Color32::from_rgb(80, 200, 255));
        for (i, center) in self.centers.iter().enumerate() {
            let (x, y) = self.viewport.complex_to_screen(center.position());
            let pos = rect.min + egui::vec2(x as f32, y as f32);
            if !rect.expand(8.0).contains(pos) {
                continue;
            }
            let stroke = if self.dragged_center == Some(i) {
                active
            } else {
                idle
            };
            painter.circle_stroke(pos, 5.0, stroke);
        }
    }
}
