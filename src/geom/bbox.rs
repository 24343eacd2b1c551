//! Axis-aligned bounding boxes in XYXY form.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// An axis-aligned bounding box stored as (xmin, ymin, xmax, ymax).
///
/// The constructor does not enforce `min <= max`; boxes built from odd label
/// rows are still representable and get fixed up by [`BBoxXYXY::clamp_to`].
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Builds a box from its center point and size, the layout YOLO uses.
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::from_xyxy(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl BBoxXYXY<Normalized> {
    /// Scales normalized coordinates up to pixel coordinates.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xyxy(
            self.min.x * image_width,
            self.min.y * image_height,
            self.max.x * image_width,
            self.max.y * image_height,
        )
    }
}

impl BBoxXYXY<Pixel> {
    /// Clamps every coordinate into `[0, image_width]` / `[0, image_height]`.
    ///
    /// Each coordinate is clamped on its own, so a box lying entirely outside
    /// the image collapses onto the nearest edge. Non-finite inputs must be
    /// filtered out beforehand; NaN passes through `f64::clamp` unchanged.
    pub fn clamp_to(&self, image_width: f64, image_height: f64) -> Self {
        let width = image_width.max(0.0);
        let height = image_height.max(0.0);
        // `+ 0.0` turns a surviving -0.0 into 0.0.
        Self::from_xyxy(
            self.min.x.clamp(0.0, width) + 0.0,
            self.min.y.clamp(0.0, height) + 0.0,
            self.max.x.clamp(0.0, width) + 0.0,
            self.max.y.clamp(0.0, height) + 0.0,
        )
    }

    /// Corner points clockwise from the top-left: TL, TR, BR, BL.
    pub fn corners(&self) -> [Coord<Pixel>; 4] {
        [
            Coord::new(self.min.x, self.min.y),
            Coord::new(self.max.x, self.min.y),
            Coord::new(self.max.x, self.max.y),
            Coord::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn from_cxcywh_centers_the_box() {
        let bbox: BBoxXYXY<Normalized> = BBoxXYXY::from_cxcywh(0.5, 0.25, 0.2, 0.1);
        assert!(approx(bbox.xmin(), 0.4));
        assert!(approx(bbox.ymin(), 0.2));
        assert!(approx(bbox.xmax(), 0.6));
        assert!(approx(bbox.ymax(), 0.3));
    }

    #[test]
    fn to_pixel_scales_each_axis() {
        let px = BBoxXYXY::<Normalized>::from_xyxy(0.1, 0.2, 0.5, 1.0).to_pixel(200.0, 50.0);
        assert!(approx(px.xmin(), 20.0));
        assert!(approx(px.ymin(), 10.0));
        assert!(approx(px.xmax(), 100.0));
        assert!(approx(px.ymax(), 50.0));
    }

    #[test]
    fn clamp_to_pulls_coordinates_inside_the_image() {
        let px = BBoxXYXY::<Pixel>::from_xyxy(-12.0, -0.5, 130.0, 40.0).clamp_to(100.0, 80.0);
        assert_eq!(px, BBoxXYXY::from_xyxy(0.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn clamp_to_leaves_inner_boxes_alone() {
        let original = BBoxXYXY::<Pixel>::from_xyxy(10.0, 20.0, 30.0, 40.0);
        assert_eq!(original.clamp_to(100.0, 100.0), original);
    }

    #[test]
    fn corners_run_clockwise_from_top_left() {
        let corners = BBoxXYXY::<Pixel>::from_xyxy(1.0, 2.0, 3.0, 4.0).corners();
        let pairs: Vec<(f64, f64)> = corners.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(pairs, vec![(1.0, 2.0), (3.0, 2.0), (3.0, 4.0), (1.0, 4.0)]);
    }

    #[test]
    fn clamp_to_normalizes_negative_zero() {
        let px = BBoxXYXY::<Pixel>::from_xyxy(-0.0, -0.0, 1.0, 1.0).clamp_to(0.0, 0.0);
        assert!(px.xmin().is_sign_positive());
        assert!(px.ymin().is_sign_positive());
    }
}
