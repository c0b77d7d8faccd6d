use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A point on the complex plane, two `f64` components.
///
/// `Copy` and operator-friendly so the per-point hot loop reads like the math.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `re² + im²`.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// `z²` expanded as `(re² - im², 2·re·im)`.
    #[inline]
    pub fn square(self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: (self.re + self.re) * self.im,
        }
    }

    /// `|re| + |im|`, the L1 (diamond) norm.
    #[inline]
    pub fn l1_norm(self) -> f64 {
        self.re.abs() + self.im.abs()
    }

    /// The larger of `|re|` and `|im|`, the per-axis (box) norm.
    #[inline]
    pub fn max_axis(self) -> f64 {
        self.re.abs().max(self.im.abs())
    }

    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.re * rhs, self.im * rhs)
    }
}

impl Div<f64> for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.re / rhs, self.im / rhs)
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{} - {}i", self.re, -self.im)
        } else {
            write!(f, "{} + {}i", self.re, self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn square_matches_expansion() {
        // (1 + i)² = 2i
        let z = Complex::new(1.0, 1.0).square();
        assert!(approx_eq(z.re, 0.0));
        assert!(approx_eq(z.im, 2.0));

        // (3 - 2i)² = 9 - 12i + 4i² = 5 - 12i
        let z = Complex::new(3.0, -2.0).square();
        assert!(approx_eq(z.re, 5.0));
        assert!(approx_eq(z.im, -12.0));
    }

    #[test]
    fn affine_round_trip() {
        let p = Complex::new(5.0, -3.0);
        let z = Complex::new(1.25, 0.5);
        let back = ((z - p) / 1.5) * 1.5 + p;
        assert!(approx_eq(back.re, z.re));
        assert!(approx_eq(back.im, z.im));
    }

    #[test]
    fn norms_order() {
        let z = Complex::new(3.0, -4.0);
        assert!(approx_eq(z.norm_sq(), 25.0));
        assert!(approx_eq(z.l1_norm(), 7.0));
        assert!(approx_eq(z.max_axis(), 4.0));
    }

    #[test]
    fn negation_flips_both_parts() {
        let z = -Complex::new(1.0, -2.0);
        assert_eq!(z, Complex::new(-1.0, 2.0));
    }

    #[test]
    fn display_handles_sign() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1 - 2i");
        assert_eq!(Complex::new(-0.5, 0.0).to_string(), "-0.5 + 0i");
    }
}
