use crate::distance::cosine_distance;
use crate::matching::assignment::linear_sum_assignment;
use crate::matching::options::MatcherOptions;
use crate::summary::{track_ids, Representatives, TrackSummarizer};
use crate::track::{Frame, TrackId};
use crate::Errors;
use anyhow::Result;
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rectangular linear sum assignment solver
pub mod assignment;

/// Matcher configuration
pub mod options;

/// Marker of the labels synthesized for the unmatched secondary tracks
pub const UNMATCHED_PREFIX: &str = "T";

/// Canonical identity of a secondary camera track.
///
/// Persisted as the primary track id (number) for matched tracks and as the synthesized label
/// (string, e.g. `"T10"`) for unmatched ones, so the labels never collide with real track ids.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentityValue", into = "IdentityValue")]
pub enum Identity {
    /// The track depicts the same player as the primary camera track
    Matched(TrackId),
    /// No accepted cross-view match, the track keeps its own id
    Unmatched(TrackId),
}

impl Identity {
    pub fn is_matched(&self) -> bool {
        matches!(self, Identity::Matched(_))
    }

    /// Primary camera track id if the identity is matched
    ///
    pub fn primary(&self) -> Option<TrackId> {
        match self {
            Identity::Matched(id) => Some(*id),
            Identity::Unmatched(_) => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Matched(id) => write!(f, "{}", id),
            Identity::Unmatched(id) => write!(f, "{}{}", UNMATCHED_PREFIX, id),
        }
    }
}

/// Value form of [Identity] used by the external representations: a primary track id for the
/// matched tracks and the synthesized label for the unmatched ones.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityValue {
    Id(TrackId),
    Label(String),
}

impl From<Identity> for IdentityValue {
    fn from(identity: Identity) -> Self {
        match identity {
            Identity::Matched(id) => IdentityValue::Id(id),
            Identity::Unmatched(_) => IdentityValue::Label(identity.to_string()),
        }
    }
}

impl TryFrom<IdentityValue> for Identity {
    type Error = String;

    fn try_from(raw: IdentityValue) -> Result<Self, Self::Error> {
        match raw {
            IdentityValue::Id(id) => Ok(Identity::Matched(id)),
            IdentityValue::Label(label) => label
                .strip_prefix(UNMATCHED_PREFIX)
                .and_then(|id| id.parse().ok())
                .map(Identity::Unmatched)
                .ok_or_else(|| format!("Malformed unmatched identity label: {}", label)),
        }
    }
}

/// Secondary track id to canonical identity, total over the secondary camera tracks
pub type IdentityMap = BTreeMap<TrackId, Identity>;

/// Why the secondary track received its identity
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchReason {
    /// The assigned pair is closer than the threshold
    Accepted { distance: f32 },
    /// The assigned primary track is too far
    Rejected { primary: TrackId, distance: f32 },
    /// There were fewer primary tracks than secondary ones, the row stayed unassigned
    Surplus,
    /// The track had too few observations to get a representative embedding
    NoRepresentative,
}

/// Matching decision for a single secondary track
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchDecision {
    pub secondary: TrackId,
    pub identity: Identity,
    pub reason: MatchReason,
}

/// Result of the cross-view matching: the identity map and the decisions behind it
///
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    identities: IdentityMap,
    decisions: Vec<MatchDecision>,
}

impl MatchOutcome {
    fn decide(&mut self, secondary: TrackId, identity: Identity, reason: MatchReason) {
        self.identities.insert(secondary, identity);
        self.decisions.push(MatchDecision {
            secondary,
            identity,
            reason,
        });
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.identities
    }

    pub fn into_identities(self) -> IdentityMap {
        self.identities
    }

    /// Decisions ordered by the secondary track id
    ///
    pub fn decisions(&self) -> &[MatchDecision] {
        &self.decisions
    }

    pub fn matched(&self) -> usize {
        self.identities.values().filter(|i| i.is_matched()).count()
    }

    /// Adds the unmatched identity for every secondary track id without a decision.
    ///
    /// Used to make the map total over the tracks that were observed in the video but were too short
    /// to get a representative embedding.
    ///
    pub fn complete<I>(&mut self, secondary_ids: I)
    where
        I: IntoIterator<Item = TrackId>,
    {
        for id in secondary_ids {
            if !self.identities.contains_key(&id) {
                self.decide(id, Identity::Unmatched(id), MatchReason::NoRepresentative);
            }
        }
        self.decisions.sort_by_key(|d| d.secondary);
    }
}

/// Matches the tracks of the secondary camera against the tracks of the primary camera.
///
/// The matcher builds the cosine distance matrix between representative embeddings and solves the
/// assignment problem over it globally, so two secondary tracks never compete greedily for the same
/// primary track. Pairs that are not closer than the threshold are rejected.
///
#[derive(Debug, Clone, Default)]
pub struct CrossViewMatcher {
    opts: MatcherOptions,
}

impl CrossViewMatcher {
    pub fn new(opts: MatcherOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.opts
    }

    /// Matches two sets of representative embeddings.
    ///
    /// Every secondary key receives an identity. Empty inputs are not an error: all secondary tracks
    /// become unmatched. Embeddings of different dimensions are a configuration error reported with
    /// [`Errors::DimensionMismatch`](Errors::DimensionMismatch) before any distance is calculated.
    ///
    /// # Parameters
    /// * `primary` - representatives of the camera defining the canonical identities
    /// * `secondary` - representatives of the camera to relabel
    ///
    pub fn match_views(
        &self,
        primary: &Representatives,
        secondary: &Representatives,
    ) -> Result<MatchOutcome> {
        let primary_ids = primary.keys().copied().sorted().collect::<Vec<_>>();
        let secondary_ids = secondary.keys().copied().sorted().collect::<Vec<_>>();

        let mut outcome = MatchOutcome::default();

        if primary_ids.is_empty() || secondary_ids.is_empty() {
            debug!(
                "Nothing to match: {} primary and {} secondary tracks",
                primary_ids.len(),
                secondary_ids.len()
            );
            for id in secondary_ids {
                outcome.decide(id, Identity::Unmatched(id), MatchReason::Surplus);
            }
            return Ok(outcome);
        }

        check_dimensions(&primary_ids, primary, &secondary_ids, secondary)?;

        let distances = secondary_ids
            .par_iter()
            .map(|s| {
                let s = secondary[s].embedding().feature();
                primary_ids
                    .iter()
                    .map(|p| cosine_distance(s, primary[p].embedding().feature()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let pairs = linear_sum_assignment(&distances);
        let mut assigned = vec![None; secondary_ids.len()];
        for (row, col) in pairs {
            assigned[row] = Some(col);
        }

        let threshold = self.opts.get_threshold();
        for (row, col) in assigned.into_iter().enumerate() {
            let secondary_id = secondary_ids[row];
            match col {
                Some(col) => {
                    let primary_id = primary_ids[col];
                    let distance = distances[row][col];
                    debug!(
                        "Pair | Secondary: {}, Primary: {}, Distance: {}",
                        secondary_id, primary_id, distance
                    );
                    if distance < threshold {
                        outcome.decide(
                            secondary_id,
                            Identity::Matched(primary_id),
                            MatchReason::Accepted { distance },
                        );
                    } else {
                        outcome.decide(
                            secondary_id,
                            Identity::Unmatched(secondary_id),
                            MatchReason::Rejected {
                                primary: primary_id,
                                distance,
                            },
                        );
                    }
                }
                None => outcome.decide(
                    secondary_id,
                    Identity::Unmatched(secondary_id),
                    MatchReason::Surplus,
                ),
            }
        }

        info!(
            "Matched: {} / {} (threshold: {})",
            outcome.matched(),
            secondary_ids.len(),
            threshold
        );
        Ok(outcome)
    }

    /// Runs the summarization and the matching over the per-frame records of both cameras.
    ///
    /// The resulting identity map covers every track id observed in the secondary video.
    ///
    pub fn match_videos(
        &self,
        summarizer: &TrackSummarizer,
        primary: &[Frame],
        secondary: &[Frame],
    ) -> Result<MatchOutcome> {
        let primary_reps = summarizer.summarize(primary)?;
        let secondary_reps = summarizer.summarize(secondary)?;
        let mut outcome = self.match_views(&primary_reps, &secondary_reps)?;
        outcome.complete(track_ids(secondary));
        Ok(outcome)
    }
}

fn check_dimensions(
    primary_ids: &[TrackId],
    primary: &Representatives,
    secondary_ids: &[TrackId],
    secondary: &Representatives,
) -> Result<()> {
    let mut all = primary_ids
        .iter()
        .map(|id| (*id, primary[id].embedding().dim()))
        .chain(
            secondary_ids
                .iter()
                .map(|id| (*id, secondary[id].embedding().dim())),
        );

    if let Some((_, expected)) = all.next() {
        for (track_id, found) in all {
            if found != expected {
                return Err(Errors::DimensionMismatch {
                    track_id,
                    expected,
                    found,
                }
                .into());
            }
        }
    }
    Ok(())
}
