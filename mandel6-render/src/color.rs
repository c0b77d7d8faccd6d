use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::store::GridView;

/// Color of points that have not escaped.
pub const ALIVE_COLOR: [u8; 3] = [0, 0, 0];

// ---------------------------------------------------------------------------
// Color params
// ---------------------------------------------------------------------------

/// How iteration counts map onto the hue wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorParams {
    /// Number of times the hue wheel repeats across `1..=max_iterations`.
    pub color_cycles: f64,
}

impl<'de> Deserialize<'de> for ColorParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            color_cycles: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        ColorParams::new(raw.color_cycles).map_err(serde::de::Error::custom)
    }
}

impl ColorParams {
    pub const DEFAULT_COLOR_CYCLES: f64 = 2.0;

    pub fn new(color_cycles: f64) -> crate::Result<Self> {
        if color_cycles <= 0.0 || !color_cycles.is_finite() {
            return Err(RenderError::InvalidColorCycles(color_cycles));
        }
        Ok(Self { color_cycles })
    }
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            color_cycles: Self::DEFAULT_COLOR_CYCLES,
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Map a display count to RGB.
///
/// `0` is alive. Otherwise the count is placed on a log scale relative to
/// `max_iterations`, the hue cycles `color_cycles` times across that scale,
/// and saturation/value ramp up with it.
pub fn colorize(count: u32, max_iterations: u32, color_cycles: f64) -> [u8; 3] {
    if count == 0 {
        return ALIVE_COLOR;
    }
    let scaled = if max_iterations > 1 {
        (count as f64).ln() / (max_iterations as f64).ln()
    } else {
        1.0
    };
    let band = 1.0 / color_cycles;
    let hue = scaled.rem_euclid(band) * color_cycles;
    hsv_to_rgb(hue, 0.2 + 1.5 * scaled, 1.5 * scaled)
}

/// HSV → RGB with `h` wrapping in `[0, 1)` and `s`, `v` clamped to `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_byte(r), to_byte(g), to_byte(b)]
}

#[inline]
fn to_byte(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colorize a grid of point states into `out`, resizing it to match.
pub fn colorize_grid(
    grid: GridView<'_>,
    max_iterations: u32,
    params: &ColorParams,
    out: &mut RenderBuffer,
) {
    out.resize(grid.width, grid.height);
    let row_bytes = out.row_bytes();
    out.pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let states = grid.row(y as u32);
            for (pixel, state) in row.chunks_exact_mut(4).zip(states) {
                let [r, g, b] = colorize(state.display_count(), max_iterations, params.color_cycles);
                pixel.copy_from_slice(&[r, g, b, 255]);
            }
        });
}
