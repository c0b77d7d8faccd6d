use crate::error::CoreError;

/// Largest supported top-K candidate set. Candidate sets are fixed-size
/// arrays of this length; [`EvalParams::candidate_count`] picks how many
/// slots are used.
pub const MAX_CANDIDATES: usize = 16;

/// Escape radius of the base map, measured in a center's normalized frame.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// Squared [`ESCAPE_RADIUS`].
pub const ESCAPE_RADIUS_SQ: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

/// Parameters controlling per-point evaluation.
///
/// The cached `draw_range_sq` field is recomputed on deserialization so
/// persisted settings stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EvalParams {
    /// Saturation ceiling. A point that reaches this count without escaping
    /// is terminal and never advanced again.
    pub max_iterations: u32,

    /// How far (in a center's normalized units) an orbit value may sit from
    /// a center and still be advanced by it, boundary included. Only used
    /// with more than one center. Never below [`ESCAPE_RADIUS`], so a value
    /// some frame has not escaped is always advanced by that frame.
    pub draw_range: f64,

    /// Top-K size for the nearest-center selector.
    pub candidate_count: usize,

    /// Iterations granted to a freshly reset point on its first tick.
    /// Every later tick advances exactly one iteration.
    pub first_tick_burst: u32,

    #[serde(skip)]
    draw_range_sq: f64,
}

impl<'de> serde::Deserialize<'de> for EvalParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            max_iterations: u32,
            draw_range: f64,
            candidate_count: usize,
            first_tick_burst: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        EvalParams::new(
            raw.max_iterations,
            raw.draw_range,
            raw.candidate_count,
            raw.first_tick_burst,
        )
        .map_err(serde::de::Error::custom)
    }
}

impl EvalParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 200;
    pub const DEFAULT_DRAW_RANGE: f64 = 10.0;
    pub const DEFAULT_CANDIDATE_COUNT: usize = 4;
    pub const DEFAULT_FIRST_TICK_BURST: u32 = 10;

    pub fn new(
        max_iterations: u32,
        draw_range: f64,
        candidate_count: usize,
        first_tick_burst: u32,
    ) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        if !(ESCAPE_RADIUS..=f64::MAX).contains(&draw_range) {
            return Err(CoreError::InvalidDrawRange(draw_range));
        }
        if candidate_count == 0 || candidate_count > MAX_CANDIDATES {
            return Err(CoreError::InvalidCandidateCount {
                count: candidate_count,
                max: MAX_CANDIDATES,
            });
        }
        if first_tick_burst < 1 {
            return Err(CoreError::InvalidBurst(first_tick_burst));
        }
        Ok(Self {
            max_iterations,
            draw_range,
            candidate_count,
            first_tick_burst,
            draw_range_sq: draw_range * draw_range,
        })
    }

    #[inline]
    pub fn draw_range_sq(&self) -> f64 {
        self.draw_range_sq
    }

    /// Return a copy with a different `max_iterations` value.
    pub fn with_max_iterations(self, max_iterations: u32) -> crate::Result<Self> {
        Self::new(
            max_iterations,
            self.draw_range,
            self.candidate_count,
            self.first_tick_burst,
        )
    }

    /// Return a copy with a different draw range.
    pub fn with_draw_range(self, draw_range: f64) -> crate::Result<Self> {
        Self::new(
            self.max_iterations,
            draw_range,
            self.candidate_count,
            self.first_tick_burst,
        )
    }

    /// Return a copy with a different top-K size.
    pub fn with_candidate_count(self, candidate_count: usize) -> crate::Result<Self> {
        Self::new(
            self.max_iterations,
            self.draw_range,
            candidate_count,
            self.first_tick_burst,
        )
    }

    /// Return a copy with a different first-tick burst.
    pub fn with_first_tick_burst(self, first_tick_burst: u32) -> crate::Result<Self> {
        Self::new(
            self.max_iterations,
            self.draw_range,
            self.candidate_count,
            first_tick_burst,
        )
    }
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            draw_range: Self::DEFAULT_DRAW_RANGE,
            candidate_count: Self::DEFAULT_CANDIDATE_COUNT,
            first_tick_burst: Self::DEFAULT_FIRST_TICK_BURST,
            draw_range_sq: Self::DEFAULT_DRAW_RANGE * Self::DEFAULT_DRAW_RANGE,
        }
    }
}
