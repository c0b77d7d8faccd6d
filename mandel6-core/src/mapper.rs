//! Normalized viewport coordinates ↔ complex plane.
//!
//! A `uv` coordinate spans `[0, 1] × [0, 1]` across the visible graph:
//! `u` grows rightward (increasing real part), `v` grows upward (increasing
//! imaginary part). `(0.5, 0.5)` is the graph center.

use crate::complex::Complex;

/// Graph-space size of the visible region: `(width, height)`.
pub type GraphExtent = (f64, f64);

/// `c = graph_center + (uv - 0.5) · graph_extent`.
#[inline]
pub fn to_complex(uv: [f64; 2], graph_center: Complex, graph_extent: GraphExtent) -> Complex {
    Complex::new(
        graph_center.re + (uv[0] - 0.5) * graph_extent.0,
        graph_center.im + (uv[1] - 0.5) * graph_extent.1,
    )
}

/// Inverse of [`to_complex`].
#[inline]
pub fn from_complex(c: Complex, graph_center: Complex, graph_extent: GraphExtent) -> [f64; 2] {
    [
        (c.re - graph_center.re) / graph_extent.0 + 0.5,
        (c.im - graph_center.im) / graph_extent.1 + 0.5,
    ]
}

/// `uv` of the center of grid cell `(px, py)`, with row 0 at the top.
#[inline]
pub fn pixel_to_uv(px: u32, py: u32, width: u32, height: u32) -> [f64; 2] {
    [
        (px as f64 + 0.5) / width as f64,
        1.0 - (py as f64 + 0.5) / height as f64,
    ]
}
