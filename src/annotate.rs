use crate::matching::{Identity, IdentityMap};
use crate::track::{Frame, TrackId};
use crate::utils::bbox::BoundingBox;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Camera the drawn detections come from
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewRole {
    /// Defines the canonical identities, ids are drawn as is
    Primary,
    /// Ids are replaced with the matched identities
    Secondary,
}

impl FromStr for ViewRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(ViewRole::Primary),
            "secondary" => Ok(ViewRole::Secondary),
            _ => Err(format!("Unknown view role: {}", s)),
        }
    }
}

impl fmt::Display for ViewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewRole::Primary => write!(f, "primary"),
            ViewRole::Secondary => write!(f, "secondary"),
        }
    }
}

/// Box with the caption to draw over the frame
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBox {
    pub bbox: BoundingBox,
    pub label: String,
}

impl LabeledBox {
    pub fn caption(&self) -> String {
        format!("Player {}", self.label)
    }
}

/// Drawing backend for the annotated frames, usually a video writer
///
pub trait Canvas {
    fn draw_box(&mut self, labeled: &LabeledBox) -> Result<()>;

    /// Called once all boxes of the frame are drawn
    fn finish_frame(&mut self) -> Result<()>;
}

/// Resolves the labels shown for tracked players
///
pub struct Annotator<'a> {
    identities: &'a IdentityMap,
    role: ViewRole,
}

impl<'a> Annotator<'a> {
    pub fn new(identities: &'a IdentityMap, role: ViewRole) -> Self {
        Self { identities, role }
    }

    /// Label of the track: the raw id for the primary camera, the matched identity for the secondary one.
    ///
    /// A secondary track missing from the map is shown as unmatched.
    ///
    pub fn label(&self, track_id: TrackId) -> String {
        match self.role {
            ViewRole::Primary => track_id.to_string(),
            ViewRole::Secondary => self
                .identities
                .get(&track_id)
                .copied()
                .unwrap_or(Identity::Unmatched(track_id))
                .to_string(),
        }
    }

    pub fn annotate_frame(&self, frame: &Frame) -> Vec<LabeledBox> {
        frame
            .iter()
            .map(|d| LabeledBox {
                bbox: d.bbox,
                label: self.label(d.track_id),
            })
            .collect()
    }

    pub fn annotate(&self, frames: &[Frame]) -> Vec<Vec<LabeledBox>> {
        frames.iter().map(|f| self.annotate_frame(f)).collect()
    }

    /// Draws all frames on the canvas
    ///
    pub fn render<C: Canvas>(&self, frames: &[Frame], canvas: &mut C) -> Result<()> {
        for frame in frames {
            for labeled in self.annotate_frame(frame) {
                canvas.draw_box(&labeled)?;
            }
            canvas.finish_frame()?;
        }
        Ok(())
    }
}
