use std::time::{Instant, SystemTime, UNIX_EPOCH};

use eframe::egui;
use tracing::{debug, error, info, warn};

use mandel6_core::{Center, Complex, SessionParams, Viewport};
use mandel6_render::{export_png, ExportMetadata};

use crate::app::{Mandel6App, SESSION_SAVE_DELAY};
use crate::preferences;

impl Mandel6App {
    /// Drag the graph by a screen-space delta (content follows the pointer).
    pub(crate) fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        let (gw, gh) = self.viewport.graph_extent();
        let w = self.viewport.screen_width as f64;
        let h = self.viewport.screen_height as f64;
        self.viewport.center.re -= dx * gw / w;
        self.viewport.center.im += dy * gh / h;
    }

    pub(crate) fn reset_view(&mut self) {
        let (w, h) = (self.viewport.screen_width, self.viewport.screen_height);
        self.viewport = Viewport::default_view(w, h);
        self.mark_session_dirty();
    }

    /// Register a new center at `position`, sized relative to the current
    /// view.
    pub(crate) fn add_center_at(&mut self, position: Complex) {
        let scale = self.preferences.new_center_scale * self.viewport.short_span() / 2.0;
        let added = Center::new(position, scale).and_then(|c| self.centers.add(c));
        match added {
            Ok(index) => {
                info!(index, re = position.re, im = position.im, scale, "Added center");
                self.set_status(format!("Added center #{index}"));
                self.mark_session_dirty();
            }
            Err(e) => {
                warn!("Cannot add center: {e}");
                self.set_status(e.to_string());
            }
        }
    }

    pub(crate) fn move_center(&mut self, index: usize, position: Complex) {
        if let Err(e) = self.centers.set_position(index, position) {
            warn!("Cannot move center {index}: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Session persistence
    // -----------------------------------------------------------------------

    pub(crate) fn mark_session_dirty(&mut self) {
        self.session_dirty_since = Some(Instant::now());
    }

    /// Persist the session once the view has been still for a moment.
    pub(crate) fn flush_session_if_idle(&mut self) {
        let Some(since) = self.session_dirty_since else {
            return;
        };
        if since.elapsed() < SESSION_SAVE_DELAY {
            return;
        }
        self.session_dirty_since = None;
        self.capture_preferences();
        self.preferences.save();
        debug!("Session saved");
    }

    pub(crate) fn session_query(&self) -> String {
        SessionParams::from_viewport(&self.viewport).to_query()
    }

    pub(crate) fn copy_session_link(&mut self, ctx: &egui::Context) {
        let query = self.session_query();
        ctx.copy_text(format!("?{query}"));
        self.set_status("Session link copied");
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    pub(crate) fn export_frame(&mut self) {
        let dir = preferences::images_directory();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            error!("Failed to create image directory: {e}");
            self.set_status(format!("Export failed: {e}"));
            return;
        }
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = dir.join(format!("mandel6_{stamp}.png"));
        let metadata =
            ExportMetadata::from_view(&self.viewport, &self.centers, &self.params, &self.colors);
        match export_png(&path, &self.frame_pixels, &metadata) {
            Ok(()) => {
                info!("Exported {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!("Export failed: {e}");
                self.set_status(format!("Export failed: {e}"));
            }
        }
    }
}
