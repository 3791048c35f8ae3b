use thiserror::Error;

/// Embedding-to-track attribution and per-frame record collection
pub mod attribution;

/// Labels for drawing tracked players on the video frames
pub mod annotate;

/// Distance functions for feature vectors
pub mod distance;

/// Cross-view identity matching
pub mod matching;

/// Persistence of the data exchanged between pipeline stages
pub mod persist;

/// Frequently used types
pub mod prelude;

/// Representative embeddings of the tracks
pub mod summary;

/// Helpers for tests and benchmarks
pub mod test_stuff;

/// Per-camera tracking data model
pub mod track;

/// Geometry utilities
pub mod utils;

#[cfg(feature = "python")]
pub mod py;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Errors {
    #[error("Embedding of track {track_id} has dimension {found}, expected {expected}.")]
    DimensionMismatch {
        track_id: u64,
        expected: usize,
        found: usize,
    },
    #[error("Match threshold must be a finite non-negative number, got {0}.")]
    InvalidThreshold(f32),
    #[error("Minimal number of observations must be positive.")]
    InvalidMinObservations,
}

pub(crate) const EPS: f32 = 0.00001;
