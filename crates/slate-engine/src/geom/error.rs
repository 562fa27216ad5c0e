use thiserror::Error;

/// Errors raised while building geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    #[error("coordinate list has odd length {0}; expected x,y pairs")]
    OddCoordinateCount(usize),

    #[error("coordinate at index {index} is not finite")]
    NonFinite { index: usize },

    #[error("ellipse needs at least 3 segments, got {0}")]
    TooFewSegments(u32),

    #[error("tessellation failed: {0}")]
    Tessellation(String),
}
