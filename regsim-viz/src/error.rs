//! Error types for visualization

use thiserror::Error;

/// Errors related to chart generation
#[derive(Debug, Error)]
pub enum VizError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Rendering error: {0}")]
    RenderingError(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
