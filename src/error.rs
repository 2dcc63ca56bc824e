use thiserror::Error;

/// Errors reported by the construction APIs.
///
/// These all surface at creation time; once a [Simulation](crate::Simulation)
/// is well formed, stepping it never fails.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// A signal was created for a segment index that does not exist.
    #[error("segment index {index} is out of range (0..{len})")]
    SegmentOutOfRange { index: usize, len: usize },
    /// A vehicle path references a segment index that does not exist.
    #[error("vehicle path references segment {index} which does not exist (0..{len})")]
    InvalidPath { index: usize, len: usize },
    /// A vehicle was created with no path segments. Only the synthetic
    /// phantom vehicle is pathless; a real pathless vehicle could never be
    /// updated or retired.
    #[error("vehicle path must contain at least one segment")]
    EmptyPath,
    /// A vehicle was created with a deceleration limit it cannot brake with.
    #[error("maximum deceleration must be positive, got {max_dec}")]
    InvalidDeceleration { max_dec: f64 },
}
