pub use crate::annotate::{Annotator, Canvas, LabeledBox, ViewRole};
pub use crate::attribution::{
    CentroidAttribution, DetectionFilter, EmbeddingAttribution, FrameCollector, RawDetection,
    TrackedBox,
};
pub use crate::matching::options::MatcherOptions;
pub use crate::matching::{CrossViewMatcher, Identity, IdentityMap, MatchOutcome, MatchReason};
pub use crate::summary::{Representative, Representatives, TrackSummarizer};
pub use crate::track::{Detection, Embedding, Frame, TrackId, ViewDetections};
pub use crate::utils::bbox::BoundingBox;
