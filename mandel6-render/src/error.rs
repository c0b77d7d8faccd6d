use thiserror::Error;

/// Errors originating from the evaluation and export pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid grid dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid color cycles: {0} (must be positive and finite)")]
    InvalidColorCycles(f64),

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("PNG export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] mandel6_core::CoreError),
}

impl From<png::EncodingError> for RenderError {
    fn from(e: png::EncodingError) -> Self {
        Self::Export(e.to_string())
    }
}
