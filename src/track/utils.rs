use crate::track::{Feature, FEATURE_LANES_SIZE};
use ultraviolet::f32x8;

/// Packs a plain embedding into SIMD blocks, the tail block is padded with zeros
///
pub fn feature_from_slice(values: &[f32]) -> Feature {
    values
        .chunks(FEATURE_LANES_SIZE)
        .map(|chunk| {
            let mut acc = [0.0; FEATURE_LANES_SIZE];
            acc[..chunk.len()].copy_from_slice(chunk);
            f32x8::new(acc)
        })
        .collect()
}

/// Unpacks SIMD blocks into a plain vector including the padding
///
pub fn feature_to_vec(feature: &Feature) -> Vec<f32> {
    let mut res = Vec::with_capacity(feature.len() * FEATURE_LANES_SIZE);
    for e in feature {
        res.extend_from_slice(e.as_array_ref());
    }
    res
}

/// Utility trait to get conversion between feature vector representations
///
pub trait FromVec<V, R> {
    fn from_vec(vec: V) -> R;
}

impl FromVec<&Feature, Vec<f32>> for Vec<f32> {
    fn from_vec(vec: &Feature) -> Vec<f32> {
        feature_to_vec(vec)
    }
}

impl FromVec<&[f32], Feature> for Feature {
    fn from_vec(vec: &[f32]) -> Feature {
        feature_from_slice(vec)
    }
}

impl FromVec<Vec<f32>, Feature> for Feature {
    fn from_vec(vec: Vec<f32>) -> Feature {
        feature_from_slice(&vec)
    }
}
