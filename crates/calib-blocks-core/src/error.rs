/// Validation errors for camera and target construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{block} block expects {expected} values, got {got}")]
    BlockLength {
        block: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("rows and cols must be >= 1")]
    InvalidGridSize,
    #[error("spacing must be finite and > 0, got {0}")]
    InvalidSpacing(f64),
    #[error("circle diameter must be finite and > 0, got {0}")]
    InvalidDiameter(f64),
}
