pub mod buffer;
pub mod color;
pub mod driver;
pub mod error;
pub mod export;
pub mod store;

pub use buffer::RenderBuffer;
pub use color::{colorize, colorize_grid, ColorParams, ALIVE_COLOR};
pub use driver::{advance_grid, EvalMode, FrameDriver, FrameInputs, FrameStats, GridLayout, PointCounts};
pub use error::RenderError;
pub use export::{export_png, write_png, ExportMetadata};
pub use store::{GridView, Parity, ProgressiveStore, CAPACITY_CEILING};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
