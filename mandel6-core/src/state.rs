use crate::complex::Complex;

/// Bit 0: the real part was negative before magnitude-only storage.
pub const SIGN_RE_NEGATIVE: u8 = 0b001;
/// Bit 1: the imaginary part was negative before magnitude-only storage.
pub const SIGN_IM_NEGATIVE: u8 = 0b010;
/// Bit 2: the orbit escaped; `iteration` holds the terminal count.
pub const ESCAPED: u8 = 0b100;

const SIGN_MASK: u8 = SIGN_RE_NEGATIVE | SIGN_IM_NEGATIVE;

/// Packed per-point iteration state as stored in the progressive buffers.
///
/// The orbit value is kept as two unsigned magnitudes plus sign flags.
/// [`encode`](Self::encode) records the sign of the new value before
/// dropping it, and [`value`](Self::value) restores it, so a round trip is
/// bit-exact (negative zero included).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointState {
    re_mag: f64,
    im_mag: f64,
    iteration: u32,
    flags: u8,
}

/// Where a point is in its lifecycle.
///
/// `Fresh → Iterating → Saturated`, or `Fresh/Iterating → Escaped`. Only a
/// buffer reset moves a point back to `Fresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStatus {
    Fresh,
    Iterating,
    Escaped { iterations: u32 },
    Saturated,
}

impl PointStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Escaped { .. } | Self::Saturated)
    }
}

impl PointState {
    /// `iteration = 0`, `z = (0, 0)`.
    pub const FRESH: Self = Self {
        re_mag: 0.0,
        im_mag: 0.0,
        iteration: 0,
        flags: 0,
    };

    /// Pack a live orbit value at `iteration`.
    #[inline]
    pub fn encode(z: Complex, iteration: u32) -> Self {
        let mut flags = 0;
        if z.re.is_sign_negative() {
            flags |= SIGN_RE_NEGATIVE;
        }
        if z.im.is_sign_negative() {
            flags |= SIGN_IM_NEGATIVE;
        }
        Self {
            re_mag: z.re.abs(),
            im_mag: z.im.abs(),
            iteration,
            flags,
        }
    }

    /// Pack the final orbit value of a point that escaped at `iteration`.
    #[inline]
    pub fn escaped(z: Complex, iteration: u32) -> Self {
        let mut state = Self::encode(z, iteration);
        state.flags |= ESCAPED;
        state
    }

    /// Restore the signed orbit value.
    #[inline]
    pub fn value(&self) -> Complex {
        let re = if self.flags & SIGN_RE_NEGATIVE != 0 {
            -self.re_mag
        } else {
            self.re_mag
        };
        let im = if self.flags & SIGN_IM_NEGATIVE != 0 {
            -self.im_mag
        } else {
            self.im_mag
        };
        Complex::new(re, im)
    }

    #[inline]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// The two sign bits.
    #[inline]
    pub fn sign_flags(&self) -> u8 {
        self.flags & SIGN_MASK
    }

    /// All flag bits, including [`ESCAPED`].
    #[inline]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Stored magnitudes `(|re|, |im|)`.
    #[inline]
    pub fn magnitudes(&self) -> (f64, f64) {
        (self.re_mag, self.im_mag)
    }

    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.iteration == 0
    }

    #[inline]
    pub fn is_escaped(&self) -> bool {
        self.flags & ESCAPED != 0
    }

    /// Escaped, or saturated at `max_iterations`.
    #[inline]
    pub fn is_terminal(&self, max_iterations: u32) -> bool {
        self.is_escaped() || self.iteration >= max_iterations
    }

    pub fn status(&self, max_iterations: u32) -> PointStatus {
        if self.is_escaped() {
            PointStatus::Escaped {
                iterations: self.iteration,
            }
        } else if self.iteration == 0 {
            PointStatus::Fresh
        } else if self.iteration >= max_iterations {
            PointStatus::Saturated
        } else {
            PointStatus::Iterating
        }
    }

    /// The count handed to the color mapper: the terminal count for escaped
    /// points, `0` (alive) for everything else.
    #[inline]
    pub fn display_count(&self) -> u32 {
        if self.is_escaped() {
            self.iteration
        } else {
            0
        }
    }
}
