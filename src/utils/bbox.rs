use crate::EPS;
use serde::{Deserialize, Serialize};

/// Bounding box in the format (left, top, right, bottom), pixels
///
/// Persisted as the `[left, top, right, bottom]` array.
///
#[derive(Clone, Default, Debug, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl BoundingBox {
    /// Constructor
    ///
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds the box from the detector format `(left, top, width, height)`
    ///
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Euclidean distance between the box centers
    ///
    pub fn center_distance(&self, other: &Self) -> f32 {
        let (x1, y1) = self.center();
        let (x2, y2) = other.center();
        ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
    }

    /// Allows comparing bboxes
    ///
    pub fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self.left - other.left).abs() < eps
            && (self.top - other.top).abs() < eps
            && (self.right - other.right).abs() < eps
            && (self.bottom - other.bottom).abs() < eps
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() < EPS || self.height() < EPS
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.left, b.top, b.right, b.bottom]
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::bbox::BoundingBox;
    use crate::EPS;

    #[test]
    fn geometry() {
        let b = BoundingBox::from_ltwh(10.0, 20.0, 30.0, 60.0);
        assert!(b.almost_same(&BoundingBox::new(10.0, 20.0, 40.0, 80.0), EPS));
        assert!((b.width() - 30.0).abs() < EPS);
        assert!((b.height() - 60.0).abs() < EPS);
        assert!((b.area() - 1800.0).abs() < EPS);
        assert_eq!(b.center(), (25.0, 50.0));
        assert!(!b.is_degenerate());
        assert!(BoundingBox::new(1.0, 1.0, 1.0, 5.0).is_degenerate());
    }

    #[test]
    fn center_distance() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(3.0, 4.0, 13.0, 14.0);
        assert!((a.center_distance(&b) - 5.0).abs() < EPS);
        assert!(a.center_distance(&a).abs() < EPS);
    }

    #[test]
    fn serialized_as_array() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let s = serde_json::to_string(&b).unwrap();
        assert_eq!(s, "[1.0,2.0,3.0,4.0]");
        let b2: BoundingBox = serde_json::from_str(&s).unwrap();
        assert_eq!(b, b2);
    }
}
