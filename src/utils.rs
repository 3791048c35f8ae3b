/// Bounding boxes
pub mod bbox;
