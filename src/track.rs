use crate::utils::bbox::BoundingBox;
use serde::{Deserialize, Serialize};
use ultraviolet::f32x8;

pub mod utils;

/// Track identifier assigned by the within-camera tracker.
pub type TrackId = u64;

/// Feature vector representation. The last block is padded with zeros.
pub type Feature = Vec<f32x8>;

/// Number of SIMD lanes used to store feature parts internally
pub const FEATURE_LANES_SIZE: usize = 8;

/// Single tracked observation within one frame.
///
/// The tracker reports the box and track id, the embedding is the appearance vector of the detection
/// attributed to the track in this frame.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub track_id: TrackId,
    pub bbox: BoundingBox,
    pub embedding: Vec<f32>,
}

impl Detection {
    pub fn new(track_id: TrackId, bbox: BoundingBox, embedding: Vec<f32>) -> Self {
        Self {
            track_id,
            bbox,
            embedding,
        }
    }
}

/// Tracked observations of a single frame
pub type Frame = Vec<Detection>;

/// Tracked observations of a whole video, one entry per decoded frame
pub type ViewDetections = Vec<Frame>;

/// Embedding kept in SIMD form together with its real dimensionality.
///
/// The dimensionality is kept apart because [Feature] is padded to the lanes size, so two embeddings of
/// different lengths may occupy the same number of blocks.
///
#[derive(Debug, Clone, Default)]
pub struct Embedding {
    dim: usize,
    feature: Feature,
}

impl Embedding {
    pub fn new(values: &[f32]) -> Self {
        Self {
            dim: values.len(),
            feature: utils::feature_from_slice(values),
        }
    }

    pub(crate) fn from_parts(dim: usize, feature: Feature) -> Self {
        Self { dim, feature }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Returns the embedding as a plain vector without the padding
    ///
    pub fn to_vec(&self) -> Vec<f32> {
        let mut v = utils::feature_to_vec(&self.feature);
        v.truncate(self.dim);
        v
    }
}

#[cfg(test)]
mod tests {
    use crate::track::Embedding;

    #[test]
    fn embedding_keeps_dimension() {
        let e = Embedding::new(&[1.0, 2.0, 3.0]);
        assert_eq!(e.dim(), 3);
        assert_eq!(e.feature().len(), 1);
        assert_eq!(e.to_vec(), vec![1.0, 2.0, 3.0]);

        let e = Embedding::new(&[0.5; 17]);
        assert_eq!(e.dim(), 17);
        assert_eq!(e.feature().len(), 3);
        assert_eq!(e.to_vec().len(), 17);
    }

    #[test]
    fn empty_embedding() {
        let e = Embedding::new(&[]);
        assert_eq!(e.dim(), 0);
        assert!(e.feature().is_empty());
    }
}
