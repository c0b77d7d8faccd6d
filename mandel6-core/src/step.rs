use crate::center::Center;
use crate::complex::Complex;
use crate::params::ESCAPE_RADIUS_SQ;

/// Apply the quadratic map once, inside `center`'s affine frame.
///
/// Both the orbit value `z` and the sample point `c` are normalized into the
/// frame, `zn² + zc` is evaluated there, and the result is mapped back onto
/// the global plane. With [`Center::UNIT`] this is exactly `z² + c`.
#[inline]
pub fn step(z: Complex, c: Complex, center: &Center) -> Complex {
    let zc = center.normalize(c);
    let zn = center.normalize(z);
    center.denormalize(zn.square() + zc)
}

/// `true` once `|zn|² >= 4` in `center`'s normalized frame.
#[inline]
pub fn escaped_in_frame(z: Complex, center: &Center) -> bool {
    !center.claims(z, ESCAPE_RADIUS_SQ)
}
