pub mod center;
pub mod complex;
pub mod error;
pub mod mapper;
pub mod orbit;
pub mod params;
pub mod selector;
pub mod session;
pub mod state;
pub mod step;
pub mod viewport;

// Re-export primary types for convenience.
pub use center::{Center, CenterTable, MAX_CENTERS};
pub use complex::Complex;
pub use error::CoreError;
pub use orbit::{advance, evaluate_to_completion};
pub use params::{EvalParams, ESCAPE_RADIUS, MAX_CANDIDATES};
pub use session::SessionParams;
pub use state::{PointState, PointStatus};
pub use viewport::{clamp_frame_ms, HeldControls, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
