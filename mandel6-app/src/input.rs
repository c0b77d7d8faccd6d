use eframe::egui;

use mandel6_core::HeldControls;
use mandel6_render::EvalMode;

use crate::app::{Mandel6App, CENTER_GRAB_RADIUS};

/// Held keyboard state for the six motion controls.
fn keyboard_held(input: &egui::InputState) -> HeldControls {
    let down = |keys: &[egui::Key]| keys.iter().any(|&k| input.key_down(k));
    HeldControls {
        zoom_in: down(&[egui::Key::E, egui::Key::Plus, egui::Key::Equals]),
        zoom_out: down(&[egui::Key::Q, egui::Key::Minus]),
        up: down(&[egui::Key::W, egui::Key::ArrowUp]),
        down: down(&[egui::Key::S, egui::Key::ArrowDown]),
        left: down(&[egui::Key::A, egui::Key::ArrowLeft]),
        right: down(&[egui::Key::D, egui::Key::ArrowRight]),
    }
}

fn merge(a: HeldControls, b: HeldControls) -> HeldControls {
    HeldControls {
        zoom_in: a.zoom_in || b.zoom_in,
        zoom_out: a.zoom_out || b.zoom_out,
        up: a.up || b.up,
        down: a.down || b.down,
        left: a.left || b.left,
        right: a.right || b.right,
    }
}

impl Mandel6App {
    /// Keyboard and on-screen controls, polled once per frame.
    pub(crate) fn poll_held_controls(&self, ctx: &egui::Context) -> HeldControls {
        let text_editing = ctx.memory(|m| m.focused().is_some());
        let keys = if text_editing {
            HeldControls::default()
        } else {
            ctx.input(keyboard_held)
        };
        merge(keys, self.screen_held)
    }

    /// Pointer interaction on the canvas. Returns `true` if the view moved.
    pub(crate) fn handle_canvas_input(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
    ) -> bool {
        let origin = response.rect.min;
        let local = |pos: egui::Pos2| ((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
        let mut moved = false;

        if response.clicked() && ctx.input(|i| i.modifiers.shift) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = local(pos);
                let z = self.viewport.screen_to_complex(x, y);
                self.add_center_at(z);
            }
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.dragged_center = response
                .interact_pointer_pos()
                .and_then(|pos| self.center_under(pos - origin.to_vec2()));
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            match (self.dragged_center, response.interact_pointer_pos()) {
                (Some(index), Some(pos)) => {
                    let (x, y) = local(pos);
                    let z = self.viewport.screen_to_complex(x, y);
                    self.move_center(index, z);
                }
                (None, _) => {
                    let delta = response.drag_delta();
                    if delta != egui::Vec2::ZERO {
                        self.pan_by_pixels(delta.x as f64, delta.y as f64);
                        moved = true;
                    }
                }
                _ => {}
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary)
            && self.dragged_center.take().is_some()
        {
            self.mark_session_dirty();
        }

        moved
    }

    /// Index of the center marker within grab distance of a canvas position.
    fn center_under(&self, pos: egui::Pos2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, center) in self.centers.iter().enumerate() {
            let (x, y) = self.viewport.complex_to_screen(center.position());
            let d = egui::pos2(x as f32, y as f32).distance(pos);
            if d <= CENTER_GRAB_RADIUS && best.map_or(true, |(_, b)| d < b) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }

        let pressed = |key: egui::Key| ctx.input(|i| i.key_pressed(key));

        if pressed(egui::Key::R) {
            self.reset_view();
        }
        if pressed(egui::Key::H) {
            self.show_hud = !self.show_hud;
        }
        if pressed(egui::Key::O) {
            self.show_settings = !self.show_settings;
        }
        if pressed(egui::Key::F1) {
            self.show_help = !self.show_help;
        }
        if pressed(egui::Key::B) {
            self.show_controls = !self.show_controls;
        }
        if pressed(egui::Key::M) {
            self.mode = match self.mode {
                EvalMode::Progressive => EvalMode::FullRecompute,
                EvalMode::FullRecompute => EvalMode::Progressive,
            };
            self.set_status(format!("Mode: {:?}", self.mode));
        }
        if pressed(egui::Key::P) {
            self.export_frame();
        }
        if pressed(egui::Key::L) {
            self.copy_session_link(ctx);
        }
    }
}
