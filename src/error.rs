//! Error type shared by the library.
//!
//! Nothing raised during a step is fatal: out-of-bounds insertion and zero
//! separation are reported through return values. `SimError` covers setup-time
//! contract violations and scenario loading.

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid body: mass must be positive and finite, got {0}")]
    InvalidBody(f64),

    #[error("invalid boundary: half extents must be positive, got {half_width} x {half_height}")]
    InvalidBoundary { half_width: f64, half_height: f64 },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
