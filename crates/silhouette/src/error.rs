use thiserror::Error;

#[derive(Error, Debug)]
pub enum SilhouetteError {
    #[error("Frame source error: {0}")]
    Source(String),

    #[error("Frame dimensions do not match: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        got: (u32, u32),
    },

    /// The foreground mask contained no closed boundary. A legitimate,
    /// retryable state (empty scene), not a crash.
    #[error("No contour found: scene appears empty")]
    EmptyScene,

    #[error("Too few points for spline fitting: need {needed}, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("Numerical failure: {0}")]
    NumericalFailure(String),

    #[error("Malformed contour data: {0}")]
    ContourParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SilhouetteError>;
