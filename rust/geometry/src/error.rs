use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid mesh: {0}")]
    Structural(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Triangulation failed: {0}")]
    Triangulation(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid precision {precision}: at most {max} decimals are supported")]
    InvalidPrecision { precision: usize, max: usize },

    #[error(transparent)]
    Surface(#[from] geofence_core::Error),
}
