use crate::track::{Detection, Frame, TrackId, ViewDetections};
use crate::utils::bbox::BoundingBox;
use log::{debug, warn};

/// Default radius for the box center proximity used by [CentroidAttribution]
pub const DEFAULT_MAX_CENTER_DISTANCE: f32 = 40.0;

/// Box reported by the detector together with the embedding of its crop
///
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: i64,
    pub label: String,
    pub embedding: Vec<f32>,
}

/// Box reported by the within-camera tracker for the current frame
///
#[derive(Debug, Clone)]
pub struct TrackedBox {
    pub track_id: TrackId,
    pub bbox: BoundingBox,
    pub confirmed: bool,
}

/// Selects the detector boxes that depict players and are large enough to produce a usable embedding
///
#[derive(Debug, Clone)]
pub struct DetectionFilter {
    min_width: f32,
    min_height: f32,
    min_confidence: f32,
    player_class: i64,
    player_label: String,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            min_width: 20.0,
            min_height: 40.0,
            min_confidence: 0.6,
            player_class: 0,
            player_label: "player".to_string(),
        }
    }
}

impl DetectionFilter {
    /// Boxes narrower than `w` pixels are dropped
    pub fn min_width(mut self, w: f32) -> Self {
        self.min_width = w;
        self
    }

    /// Boxes lower than `h` pixels are dropped
    pub fn min_height(mut self, h: f32) -> Self {
        self.min_height = h;
        self
    }

    pub fn min_confidence(mut self, conf: f32) -> Self {
        self.min_confidence = conf;
        self
    }

    /// The detection is a player when its class id is `class_id` or its label is `label`
    /// (case-insensitive).
    ///
    pub fn player_class(mut self, class_id: i64, label: &str) -> Self {
        self.player_class = class_id;
        self.player_label = label.to_lowercase();
        self
    }

    pub fn accepts(&self, d: &RawDetection) -> bool {
        let is_player =
            d.class_id == self.player_class || d.label.to_lowercase() == self.player_label;
        is_player
            && d.confidence >= self.min_confidence
            && d.bbox.width() >= self.min_width
            && d.bbox.height() >= self.min_height
            && !d.embedding.is_empty()
    }
}

/// Recovers which embedding belongs to which confirmed track in the frame.
///
/// Trackers that report the embedding of the detection they associated the track with should
/// implement it directly; the trait lets the collector stay independent of the tracker.
///
pub trait EmbeddingAttribution {
    fn attribute(&self, tracks: &[TrackedBox], detections: &[RawDetection]) -> Frame;
}

/// Attributes to the track the embedding of the first detection whose center lies within the
/// radius from the center of the track box.
///
#[derive(Debug, Clone)]
pub struct CentroidAttribution {
    max_center_distance: f32,
}

impl Default for CentroidAttribution {
    fn default() -> Self {
        Self {
            max_center_distance: DEFAULT_MAX_CENTER_DISTANCE,
        }
    }
}

impl CentroidAttribution {
    pub fn new(max_center_distance: f32) -> Self {
        assert!(
            max_center_distance > 0.0,
            "Attribution radius must be a positive number"
        );
        Self {
            max_center_distance,
        }
    }
}

impl EmbeddingAttribution for CentroidAttribution {
    fn attribute(&self, tracks: &[TrackedBox], detections: &[RawDetection]) -> Frame {
        tracks
            .iter()
            .filter(|t| t.confirmed)
            .filter_map(|t| {
                let donor = detections
                    .iter()
                    .find(|d| d.bbox.center_distance(&t.bbox) < self.max_center_distance);
                if donor.is_none() {
                    debug!("No detection near track {} - skipped", t.track_id);
                }
                donor.map(|d| Detection::new(t.track_id, t.bbox, d.embedding.clone()))
            })
            .collect()
    }
}

/// Accumulates per-frame records of one camera video.
///
pub struct FrameCollector<A: EmbeddingAttribution> {
    filter: DetectionFilter,
    attribution: A,
    frames: ViewDetections,
}

impl<A: EmbeddingAttribution> FrameCollector<A> {
    pub fn new(filter: DetectionFilter, attribution: A) -> Self {
        Self {
            filter,
            attribution,
            frames: ViewDetections::default(),
        }
    }

    /// The detections that pass the filter, they are the ones to pass to the tracker
    ///
    pub fn accepted(&self, detections: Vec<RawDetection>) -> Vec<RawDetection> {
        detections
            .into_iter()
            .filter(|d| self.filter.accepts(d))
            .collect()
    }

    /// Stores the records of the next frame.
    ///
    /// # Parameters
    /// * `tracks` - boxes reported by the tracker for the frame
    /// * `detections` - filtered detections the tracker received for the frame
    ///
    pub fn push_frame(&mut self, tracks: &[TrackedBox], detections: &[RawDetection]) {
        let frame = self.attribution.attribute(tracks, detections);
        let confirmed = tracks.iter().filter(|t| t.confirmed).count();
        if frame.len() < confirmed {
            warn!(
                "Frame {}: {} of {} confirmed tracks have no embedding",
                self.frames.len(),
                confirmed - frame.len(),
                confirmed
            );
        }
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn finish(self) -> ViewDetections {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use crate::attribution::{
        CentroidAttribution, DetectionFilter, EmbeddingAttribution, FrameCollector, RawDetection,
        TrackedBox,
    };
    use crate::utils::bbox::BoundingBox;

    fn raw(bbox: BoundingBox, class_id: i64, label: &str, embedding: Vec<f32>) -> RawDetection {
        RawDetection {
            bbox,
            confidence: 0.9,
            class_id,
            label: label.to_string(),
            embedding,
        }
    }

    #[test]
    fn filter() {
        let f = DetectionFilter::default();
        let b = BoundingBox::from_ltwh(0.0, 0.0, 30.0, 60.0);
        assert!(f.accepts(&raw(b, 0, "ball", vec![1.0])));
        assert!(f.accepts(&raw(b, 2, "Player", vec![1.0])));
        assert!(!f.accepts(&raw(b, 2, "referee", vec![1.0])));
        assert!(!f.accepts(&raw(b, 0, "player", vec![])));

        let narrow = BoundingBox::from_ltwh(0.0, 0.0, 19.0, 60.0);
        assert!(!f.accepts(&raw(narrow, 0, "player", vec![1.0])));
        let low = BoundingBox::from_ltwh(0.0, 0.0, 30.0, 39.0);
        assert!(!f.accepts(&raw(low, 0, "player", vec![1.0])));

        let mut weak = raw(b, 0, "player", vec![1.0]);
        weak.confidence = 0.5;
        assert!(!f.accepts(&weak));
        assert!(DetectionFilter::default().min_confidence(0.4).accepts(&weak));

        let f = DetectionFilter::default().player_class(3, "Goalkeeper");
        assert!(f.accepts(&raw(b, 7, "goalkeeper", vec![1.0])));
        assert!(!f.accepts(&raw(b, 0, "player", vec![1.0])));
    }

    #[test]
    fn centroid_attribution() {
        let detections = vec![
            raw(BoundingBox::new(0.0, 0.0, 30.0, 60.0), 0, "player", vec![1.0, 0.0]),
            raw(BoundingBox::new(200.0, 0.0, 230.0, 60.0), 0, "player", vec![0.0, 1.0]),
        ];
        let tracks = vec![
            TrackedBox {
                track_id: 1,
                bbox: BoundingBox::new(5.0, 5.0, 35.0, 65.0),
                confirmed: true,
            },
            TrackedBox {
                track_id: 2,
                bbox: BoundingBox::new(195.0, 0.0, 225.0, 60.0),
                confirmed: true,
            },
            TrackedBox {
                track_id: 3,
                bbox: BoundingBox::new(0.0, 0.0, 30.0, 60.0),
                confirmed: false,
            },
            TrackedBox {
                track_id: 4,
                bbox: BoundingBox::new(500.0, 0.0, 530.0, 60.0),
                confirmed: true,
            },
        ];
        let frame = CentroidAttribution::default().attribute(&tracks, &detections);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].track_id, 1);
        assert_eq!(frame[0].embedding, vec![1.0, 0.0]);
        assert_eq!(frame[0].bbox, tracks[0].bbox);
        assert_eq!(frame[1].track_id, 2);
        assert_eq!(frame[1].embedding, vec![0.0, 1.0]);
    }

    #[test]
    fn radius_is_exclusive() {
        let detections = vec![raw(
            BoundingBox::new(0.0, 0.0, 30.0, 60.0),
            0,
            "player",
            vec![1.0],
        )];
        let tracks = vec![TrackedBox {
            track_id: 1,
            bbox: BoundingBox::new(40.0, 0.0, 70.0, 60.0),
            confirmed: true,
        }];
        assert!(CentroidAttribution::new(40.0)
            .attribute(&tracks, &detections)
            .is_empty());
        assert_eq!(
            CentroidAttribution::new(40.5)
                .attribute(&tracks, &detections)
                .len(),
            1
        );
    }

    #[test]
    fn collector() {
        let mut c = FrameCollector::new(DetectionFilter::default(), CentroidAttribution::default());
        assert!(c.is_empty());
        let detections = c.accepted(vec![
            raw(BoundingBox::new(0.0, 0.0, 30.0, 60.0), 0, "player", vec![1.0]),
            raw(BoundingBox::new(100.0, 0.0, 105.0, 10.0), 0, "player", vec![1.0]),
        ]);
        assert_eq!(detections.len(), 1);
        let tracks = vec![TrackedBox {
            track_id: 8,
            bbox: BoundingBox::new(0.0, 0.0, 30.0, 60.0),
            confirmed: true,
        }];
        c.push_frame(&tracks, &detections);
        c.push_frame(&[], &[]);
        assert_eq!(c.len(), 2);
        let frames = c.finish();
        assert_eq!(frames[0].len(), 1);
        assert!(frames[1].is_empty());
    }
}
