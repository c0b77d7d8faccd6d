use crate::complex::Complex;
use crate::error::CoreError;
use crate::mapper::{self, GraphExtent};

/// Graph-space units per millisecond of held pan/zoom, scaled by `1 / zoom`
/// for panning.
pub const MOTION_RATE: f64 = 0.002;

/// Frame-time clamp bounds in milliseconds (144 fps .. 30 fps).
pub const MIN_FRAME_MS: f64 = 1000.0 / 144.0;
pub const MAX_FRAME_MS: f64 = 1000.0 / 30.0;

/// Clamp a measured frame time so motion speed stays sane on very fast or
/// very slow frames.
pub fn clamp_frame_ms(dt_ms: f64) -> f64 {
    if dt_ms.is_nan() {
        return MIN_FRAME_MS;
    }
    dt_ms.clamp(MIN_FRAME_MS, MAX_FRAME_MS)
}

/// Snapshot of the directional and zoom controls, polled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldControls {
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldControls {
    pub fn any(&self) -> bool {
        self.zoom_in || self.zoom_out || self.up || self.down || self.left || self.right
    }
}

/// The visible region of the complex plane.
///
/// The shorter screen axis always spans `2 / zoom` graph units; the longer
/// one follows the screen aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Graph center.
    pub center: Complex,

    /// Magnification; `1.0` shows a span of 2 on the short axis.
    pub zoom: f64,

    /// Screen width in pixels.
    pub screen_width: u32,

    /// Screen height in pixels.
    pub screen_height: u32,
}

impl Viewport {
    pub const DEFAULT_CENTER: Complex = Complex { re: -0.5, im: 0.0 };
    pub const DEFAULT_ZOOM: f64 = 1.0;

    /// Startup view at the given screen size.
    pub fn default_view(screen_width: u32, screen_height: u32) -> Self {
        Self {
            center: Self::DEFAULT_CENTER,
            zoom: Self::DEFAULT_ZOOM,
            screen_width: screen_width.max(1),
            screen_height: screen_height.max(1),
        }
    }

    pub fn new(
        center: Complex,
        zoom: f64,
        screen_width: u32,
        screen_height: u32,
    ) -> crate::Result<Self> {
        if screen_width == 0 || screen_height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("dimensions must be > 0, got {screen_width}×{screen_height}"),
            });
        }
        if zoom <= 0.0 || !zoom.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("zoom must be positive and finite, got {zoom}"),
            });
        }
        if !center.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("center must be finite, got {center}"),
            });
        }
        Ok(Self {
            center,
            zoom,
            screen_width,
            screen_height,
        })
    }

    pub fn is_portrait(&self) -> bool {
        self.screen_width < self.screen_height
    }

    /// Span of the short screen axis in graph units.
    pub fn short_span(&self) -> f64 {
        2.0 / self.zoom
    }

    /// `(width, height)` of the visible graph region.
    pub fn graph_extent(&self) -> GraphExtent {
        let span = self.short_span();
        let w = self.screen_width as f64;
        let h = self.screen_height as f64;
        if self.is_portrait() {
            (span, span * h / w)
        } else {
            (span * w / h, span)
        }
    }

    /// Map a screen pixel (row 0 at the top) to the complex plane, sampling
    /// the pixel center.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32) -> Complex {
        let uv = mapper::pixel_to_uv(px, py, self.screen_width, self.screen_height);
        mapper::to_complex(uv, self.center, self.graph_extent())
    }

    /// Map fractional screen coordinates (e.g. a pointer position) to the
    /// complex plane.
    pub fn screen_to_complex(&self, x: f64, y: f64) -> Complex {
        let uv = [
            x / self.screen_width as f64,
            1.0 - y / self.screen_height as f64,
        ];
        mapper::to_complex(uv, self.center, self.graph_extent())
    }

    /// Inverse of [`screen_to_complex`](Self::screen_to_complex).
    pub fn complex_to_screen(&self, c: Complex) -> (f64, f64) {
        let uv = mapper::from_complex(c, self.center, self.graph_extent());
        (
            uv[0] * self.screen_width as f64,
            (1.0 - uv[1]) * self.screen_height as f64,
        )
    }

    /// Update the screen size; zero dimensions are ignored.
    pub fn resize(&mut self, screen_width: u32, screen_height: u32) -> bool {
        if screen_width == 0 || screen_height == 0 {
            return false;
        }
        let changed = screen_width != self.screen_width || screen_height != self.screen_height;
        self.screen_width = screen_width;
        self.screen_height = screen_height;
        changed
    }

    /// Apply held controls for one frame of `dt_ms` (already clamped).
    /// Returns `true` if the view moved.
    pub fn apply_controls(&mut self, held: &HeldControls, dt_ms: f64) -> bool {
        let step = MOTION_RATE * dt_ms;
        let factor = 1.0 + step;
        if held.zoom_in {
            self.zoom *= factor;
        }
        if held.zoom_out {
            self.zoom /= factor;
        }
        if held.up {
            self.center.im += step / self.zoom;
        }
        if held.down {
            self.center.im -= step / self.zoom;
        }
        if held.left {
            self.center.re -= step / self.zoom;
        }
        if held.right {
            self.center.re += step / self.zoom;
        }
        held.any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn landscape_extent() {
        let vp = Viewport::default_view(800, 400);
        let (w, h) = vp.graph_extent();
        assert!((h - 2.0).abs() < EPSILON);
        assert!((w - 4.0).abs() < EPSILON);
    }

    #[test]
    fn portrait_extent() {
        let vp = Viewport::new(Complex::ZERO, 2.0, 300, 600).unwrap();
        assert!(vp.is_portrait());
        let (w, h) = vp.graph_extent();
        assert!((w - 1.0).abs() < EPSILON);
        assert!((h - 2.0).abs() < EPSILON);
    }

    #[test]
    fn pixel_to_complex_center_and_corners() {
        let vp = Viewport::new(Complex::ZERO, 1.0, 100, 100).unwrap();
        let mid = vp.screen_to_complex(50.0, 50.0);
        assert!(mid.re.abs() < EPSILON && mid.im.abs() < EPSILON);

        // Top-left pixel → negative real, positive imaginary.
        let tl = vp.pixel_to_complex(0, 0);
        assert!((tl.re - (-0.99)).abs() < EPSILON);
        assert!((tl.im - 0.99).abs() < EPSILON);

        let br = vp.pixel_to_complex(99, 99);
        assert!((br.re - 0.99).abs() < EPSILON);
        assert!((br.im - (-0.99)).abs() < EPSILON);
    }

    #[test]
    fn screen_round_trip() {
        let vp = Viewport::new(Complex::new(-0.7, 0.2), 37.0, 640, 480).unwrap();
        let c = vp.screen_to_complex(123.0, 456.0);
        let (x, y) = vp.complex_to_screen(c);
        assert!((x - 123.0).abs() < 1e-6);
        assert!((y - 456.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_viewports() {
        assert!(Viewport::new(Complex::ZERO, 1.0, 0, 100).is_err());
        assert!(Viewport::new(Complex::ZERO, 1.0, 100, 0).is_err());
        assert!(Viewport::new(Complex::ZERO, 0.0, 100, 100).is_err());
        assert!(Viewport::new(Complex::ZERO, -1.0, 100, 100).is_err());
        assert!(Viewport::new(Complex::new(f64::NAN, 0.0), 1.0, 100, 100).is_err());
    }

    #[test]
    fn resize_ignores_zero() {
        let mut vp = Viewport::default_view(100, 100);
        assert!(!vp.resize(0, 50));
        assert!(vp.resize(200, 50));
        assert!(!vp.resize(200, 50));
        assert_eq!((vp.screen_width, vp.screen_height), (200, 50));
    }

    #[test]
    fn held_controls_move_view() {
        let mut vp = Viewport::default_view(100, 100);
        let dt = clamp_frame_ms(10.0);
        let held = HeldControls {
            zoom_in: true,
            right: true,
            ..Default::default()
        };
        assert!(vp.apply_controls(&held, dt));
        let factor = 1.0 + MOTION_RATE * dt;
        assert!((vp.zoom - factor).abs() < EPSILON);
        assert!((vp.center.re - (-0.5 + MOTION_RATE * dt / factor)).abs() < EPSILON);

        assert!(!vp.apply_controls(&HeldControls::default(), dt));
    }

    #[test]
    fn frame_time_clamped() {
        assert!((clamp_frame_ms(1.0) - MIN_FRAME_MS).abs() < EPSILON);
        assert!((clamp_frame_ms(500.0) - MAX_FRAME_MS).abs() < EPSILON);
        assert!((clamp_frame_ms(20.0) - 20.0).abs() < EPSILON);
        assert!((clamp_frame_ms(f64::NAN) - MIN_FRAME_MS).abs() < EPSILON);
    }
}
