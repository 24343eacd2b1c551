//! Geometry for horizontal bounding boxes.
//!
//! YOLO labels store boxes as normalized `(cx, cy, w, h)`; AnyLabeling
//! documents want absolute pixel corners. The types here carry the coordinate
//! space as a type parameter so the two cannot be mixed up.
//!
//! ```
//! use yoloprep::geom::{BBoxXYXY, Normalized};
//!
//! let norm = BBoxXYXY::<Normalized>::from_cxcywh(0.5, 0.5, 0.4, 0.4);
//! let px = norm.to_pixel(100.0, 200.0).clamp_to(100.0, 200.0);
//! assert!((px.xmin() - 30.0).abs() < 1e-9);
//! assert!((px.ymax() - 140.0).abs() < 1e-9);
//! ```

mod bbox;
mod coord;
mod space;

pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use space::{Normalized, Pixel};
