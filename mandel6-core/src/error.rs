use thiserror::Error;

/// Configuration errors raised by the core evaluator.
///
/// All of these are rejected at construction time; nothing in the per-point
/// loop can fail.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid center scale: {0} (must be positive and finite)")]
    InvalidCenterScale(f64),

    #[error("invalid center position: {re} + {im}i (must be finite)")]
    InvalidCenterPosition { re: f64, im: f64 },

    #[error("center table is full ({max} centers)")]
    TooManyCenters { max: usize },

    #[error("center table must hold at least one center")]
    EmptyCenterTable,

    #[error("no center at index {index} (table holds {len})")]
    CenterIndexOutOfRange { index: usize, len: usize },

    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid draw range: {0} (must be finite and at least the escape radius 2)")]
    InvalidDrawRange(f64),

    #[error("invalid candidate count: {count} (must be in 1..={max})")]
    InvalidCandidateCount { count: usize, max: usize },

    #[error("invalid first-tick burst: {0} (must be >= 1)")]
    InvalidBurst(u32),

    #[error("invalid session: x={x} y={y} z={z} (coordinates must be finite, zoom positive)")]
    InvalidSession { x: f64, y: f64, z: f64 },

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },
}
