use eframe::egui;

use mandel6_core::HeldControls;

use crate::app::{Mandel6App, HUD_MARGIN};

const BUTTON_SIZE: egui::Vec2 = egui::vec2(34.0, 30.0);

/// A button that reports whether the pointer is currently held on it.
fn hold_button(ui: &mut egui::Ui, label: &str, hint: &str) -> bool {
    let response = ui
        .add_sized(BUTTON_SIZE, egui::Button::new(egui::RichText::new(label).size(16.0)))
        .on_hover_text(hint);
    response.is_pointer_button_down_on()
}

impl Mandel6App {
    /// On-screen direction and zoom pad in the bottom-right corner.
    ///
    /// Its held state is sampled into `screen_held` and merged with the
    /// keyboard on the next frame.
    pub(crate) fn show_on_screen_controls(&mut self, ctx: &egui::Context) {
        if !self.show_controls {
            self.screen_held = HeldControls::default();
            return;
        }

        let mut held = HeldControls::default();
        egui::Area::new(egui::Id::new("hud_controls"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-HUD_MARGIN, -HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(160))
                    .inner_margin(egui::Margin::same(4))
                    .corner_radius(4.0)
                    .show(ui, |ui| {
                        egui::Grid::new("controls_pad")
                            .spacing([2.0, 2.0])
                            .show(ui, |ui| {
                                held.zoom_out = hold_button(ui, "−", "Zoom out (Q)");
                                held.up = hold_button(ui, "▲", "Up (W)");
                                held.zoom_in = hold_button(ui, "+", "Zoom in (E)");
                                ui.end_row();

                                held.left = hold_button(ui, "◀", "Left (A)");
                                held.down = hold_button(ui, "▼", "Down (S)");
                                held.right = hold_button(ui, "▶", "Right (D)");
                                ui.end_row();
                            });
                    });
            });
        self.screen_held = held;
    }
}
