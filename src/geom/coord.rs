//! Typed points.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::marker::PhantomData;

/// A 2D point tagged with the coordinate space it lives in.
///
/// Serializes as a two-element `[x, y]` array, which is how LabelMe-style
/// documents store shape points.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Coord").field(&self.x).field(&self.y).finish()
    }
}

// Manual impl so `TSpace` does not need to be `Serialize`.
impl<TSpace> Serialize for Coord<TSpace> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.x)?;
        pair.serialize_element(&self.y)?;
        pair.end()
    }
}
