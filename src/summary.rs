use crate::track::{Embedding, Frame, TrackId};
use crate::Errors;
use anyhow::Result;
use itertools::Itertools;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use ultraviolet::f32x8;

/// Default minimal number of observations required for a track to get a representative embedding
pub const DEFAULT_MIN_OBSERVATIONS: usize = 3;

/// Mean appearance of a track over the whole video
///
#[derive(Debug, Clone)]
pub struct Representative {
    embedding: Embedding,
    observations: usize,
}

impl Representative {
    pub fn new(embedding: Embedding, observations: usize) -> Self {
        Self {
            embedding,
            observations,
        }
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// How many embeddings were averaged
    ///
    pub fn observations(&self) -> usize {
        self.observations
    }
}

/// Representative embeddings of one camera view. Tracks without enough observations are absent.
pub type Representatives = HashMap<TrackId, Representative>;

/// Reduces per-frame records of a video to one mean embedding per track.
///
/// Short-living tracks are usually spurious, so the tracks observed fewer than `min_obs` times
/// are excluded from the output.
///
#[derive(Debug, Clone)]
pub struct TrackSummarizer {
    min_obs: usize,
}

impl Default for TrackSummarizer {
    fn default() -> Self {
        Self {
            min_obs: DEFAULT_MIN_OBSERVATIONS,
        }
    }
}

impl TrackSummarizer {
    /// Creates the summarizer
    ///
    /// # Parameters
    /// * `min_obs` - minimal amount of embeddings the track must have to be summarized, must be positive
    ///
    pub fn new(min_obs: usize) -> Result<Self> {
        if min_obs == 0 {
            return Err(Errors::InvalidMinObservations.into());
        }
        Ok(Self { min_obs })
    }

    pub fn min_obs(&self) -> usize {
        self.min_obs
    }

    /// Computes the element-wise mean embedding for every track with enough observations.
    ///
    /// All embeddings of the video must share the same dimension, otherwise
    /// [`Errors::DimensionMismatch`](Errors::DimensionMismatch) is returned.
    ///
    pub fn summarize(&self, frames: &[Frame]) -> Result<Representatives> {
        let mut dim: Option<usize> = None;
        for d in frames.iter().flatten() {
            match dim {
                None => dim = Some(d.embedding.len()),
                Some(expected) if expected != d.embedding.len() => {
                    return Err(Errors::DimensionMismatch {
                        track_id: d.track_id,
                        expected,
                        found: d.embedding.len(),
                    }
                    .into());
                }
                _ => {}
            }
        }

        let groups = frames
            .iter()
            .flatten()
            .map(|d| (d.track_id, &d.embedding))
            .into_group_map();

        let total = groups.len();
        let res: Representatives = groups
            .into_iter()
            .filter(|(_, embeddings)| embeddings.len() >= self.min_obs)
            .map(|(track_id, embeddings)| {
                let count = embeddings.len();
                let mut acc = Vec::new();
                let mut dim = 0;
                for e in embeddings {
                    let e = Embedding::new(e);
                    dim = e.dim();
                    if acc.is_empty() {
                        acc = e.feature().clone();
                    } else {
                        for (a, b) in acc.iter_mut().zip(e.feature()) {
                            *a += *b;
                        }
                    }
                }
                let scale = f32x8::splat(1.0 / count as f32);
                for a in acc.iter_mut() {
                    *a *= scale;
                }
                (
                    track_id,
                    Representative::new(Embedding::from_parts(dim, acc), count),
                )
            })
            .collect();

        debug!(
            "Summarized {} of {} tracks (min observations: {})",
            res.len(),
            total,
            self.min_obs
        );
        Ok(res)
    }
}

/// All track ids that appear in the per-frame records, including the short-living ones
///
pub fn track_ids(frames: &[Frame]) -> BTreeSet<TrackId> {
    frames.iter().flatten().map(|d| d.track_id).collect()
}
