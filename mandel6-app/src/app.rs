use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{error, info};

use mandel6_core::{clamp_frame_ms, CenterTable, EvalParams, HeldControls, SessionParams, Viewport};
use mandel6_render::{colorize_grid, ColorParams, EvalMode, FrameDriver, FrameStats, RenderBuffer};

use crate::preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
/// Idle time after the last view change before the session is persisted.
pub(crate) const SESSION_SAVE_DELAY: Duration = Duration::from_secs(1);
/// Pointer distance within which a center marker can be grabbed.
pub(crate) const CENTER_GRAB_RADIUS: f32 = 10.0;
pub(crate) const MAX_RESOLUTION_DIVISOR: u32 = 8;

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct Mandel6App {
    // View and evaluation state
    pub(crate) viewport: Viewport,
    pub(crate) centers: CenterTable,
    pub(crate) params: EvalParams,
    pub(crate) colors: ColorParams,
    pub(crate) mode: EvalMode,
    pub(crate) resolution_divisor: u32,

    // Evaluation output
    pub(crate) driver: Option<FrameDriver>,
    pub(crate) frame_pixels: RenderBuffer,
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) last_stats: Option<FrameStats>,

    // Frame timing
    pub(crate) last_frame: Option<Instant>,
    pub(crate) frame_ms: f64,

    // Interaction
    pub(crate) screen_held: HeldControls,
    pub(crate) dragged_center: Option<usize>,
    pub(crate) session_dirty_since: Option<Instant>,

    // UI
    pub(crate) show_hud: bool,
    pub(crate) show_settings: bool,
    pub(crate) show_help: bool,
    pub(crate) show_controls: bool,
    pub(crate) status_message: Option<(String, Instant)>,

    pub(crate) preferences: AppPreferences,
}

impl Mandel6App {
    pub(crate) fn new(prefs: AppPreferences, session: Option<SessionParams>) -> Self {
        let mut viewport = Viewport::default_view(
            prefs.window_width.max(1.0) as u32,
            prefs.window_height.max(1.0) as u32,
        );
        let restored = session.or_else(|| {
            prefs
                .restore_last_session
                .then_some(prefs.last_session)
                .flatten()
        });
        if let Some(session) = restored {
            session.apply_to(&mut viewport);
            info!(x = session.x, y = session.y, zoom = session.z, "Restored session");
        }

        Self {
            viewport,
            centers: prefs.centers.clone(),
            params: prefs.eval,
            colors: prefs.colors,
            mode: prefs.mode,
            resolution_divisor: prefs.resolution_divisor.clamp(1, MAX_RESOLUTION_DIVISOR),
            driver: None,
            frame_pixels: RenderBuffer::new(1, 1),
            texture: None,
            last_stats: None,
            last_frame: None,
            frame_ms: 0.0,
            screen_held: HeldControls::default(),
            dragged_center: None,
            session_dirty_since: None,
            show_hud: true,
            show_settings: false,
            show_help: false,
            show_controls: true,
            status_message: None,
            preferences: prefs,
        }
    }

    /// Evaluation grid for the current screen size.
    pub(crate) fn grid_size(&self) -> (u32, u32) {
        let d = self.resolution_divisor.max(1);
        (
            (self.viewport.screen_width / d).max(1),
            (self.viewport.screen_height / d).max(1),
        )
    }

    /// Measure and clamp the time since the previous frame.
    fn frame_delta_ms(&mut self) -> f64 {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|prev| now.duration_since(prev).as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        clamp_frame_ms(dt)
    }

    /// Run one driver tick and upload the colored result.
    fn evaluate_frame(&mut self, ctx: &egui::Context) {
        let grid = self.grid_size();
        if self.driver.is_none() {
            match FrameDriver::new(grid.0, grid.1) {
                Ok(driver) => self.driver = Some(driver),
                Err(e) => {
                    error!("Failed to create frame driver: {e}");
                    return;
                }
            }
        }
        let Some(driver) = self.driver.as_mut() else {
            return;
        };

        match driver.tick(&self.viewport, grid, &self.centers, &self.params, self.mode) {
            Ok(stats) => self.last_stats = Some(stats),
            Err(e) => {
                error!("Tick failed: {e}");
                return;
            }
        }
        colorize_grid(
            driver.latest(),
            self.params.max_iterations,
            &self.colors,
            &mut self.frame_pixels,
        );

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [
                self.frame_pixels.width as usize,
                self.frame_pixels.height as usize,
            ],
            &self.frame_pixels.pixels,
        );
        match self.texture {
            Some(ref mut tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("mandel6_frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    pub(crate) fn is_converged(&self) -> bool {
        self.last_stats.is_some_and(|s| s.is_converged())
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn update_explorer(&mut self, ctx: &egui::Context) {
        let dt_ms = self.frame_delta_ms();
        self.frame_ms = dt_ms;

        let held = self.poll_held_controls(ctx);
        let mut moved = self.viewport.apply_controls(&held, dt_ms);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_size();
                let width = available.x.max(1.0) as u32;
                let height = available.y.max(1.0) as u32;
                moved |= self.viewport.resize(width, height);

                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());

                moved |= self.handle_canvas_input(ctx, &response);

                self.evaluate_frame(ctx);

                let uv =
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                if let Some(ref tex) = self.texture {
                    painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                }
                if self.show_hud {
                    self.draw_center_markers(&painter, response.rect);
                }
            });

        self.handle_keyboard(ctx);

        if moved {
            self.mark_session_dirty();
        }
        self.flush_session_if_idle();

        self.show_hud(ctx);
        self.show_on_screen_controls(ctx);
        self.show_settings_window(ctx);
        self.show_help_window(ctx);

        if !self.is_converged() || held.any() || self.screen_held.any() {
            ctx.request_repaint();
        } else if self.session_dirty_since.is_some() {
            ctx.request_repaint_after(SESSION_SAVE_DELAY);
        }
    }

    /// Copy live state into preferences.
    pub(crate) fn capture_preferences(&mut self) {
        self.preferences.last_session = Some(SessionParams::from_viewport(&self.viewport));
        self.preferences.centers = self.centers.clone();
        self.preferences.eval = self.params;
        self.preferences.colors = self.colors;
        self.preferences.mode = self.mode;
        self.preferences.resolution_divisor = self.resolution_divisor;
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for Mandel6App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.update_explorer(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.capture_preferences();
        self.preferences.window_width = self.viewport.screen_width as f32;
        self.preferences.window_height = self.viewport.screen_height as f32;
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run(session_query: Option<String>) -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting mandel6");

    let prefs = AppPreferences::load();
    let session = session_query.map(|q| SessionParams::from_query_or_default(&q));

    let viewport = egui::ViewportBuilder::default()
        .with_title("mandel6")
        .with_inner_size([prefs.window_width, prefs.window_height]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "mandel6",
        options,
        Box::new(move |_cc| Ok(Box::new(Mandel6App::new(prefs, session)))),
    )
}
