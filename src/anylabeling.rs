//! X-AnyLabeling / LabelMe style JSON annotation documents.
//!
//! One document per image. Only rectangles are produced here; the many
//! optional fields the labeling tool expects are written out with their
//! empty defaults so the tool opens the files without complaint.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::YoloprepError;
use crate::geom::{BBoxXYXY, Coord, Pixel};

/// Format version written into every document.
pub const ANYLABELING_VERSION: &str = "3.3.9";

const SHAPE_TYPE_RECTANGLE: &str = "rectangle";

/// A single labelled shape.
#[derive(Clone, Debug, Serialize)]
pub struct Shape {
    pub label: String,
    pub score: Option<f64>,
    pub points: [Coord<Pixel>; 4],
    pub group_id: Option<i64>,
    pub description: String,
    pub difficult: bool,
    pub shape_type: String,
    pub flags: BTreeMap<String, bool>,
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub kie_linking: Vec<serde_json::Value>,
}

impl Shape {
    /// A rectangle shape with its corners clockwise from the top-left.
    pub fn rectangle(label: impl Into<String>, bbox: &BBoxXYXY<Pixel>) -> Self {
        Self {
            label: label.into(),
            score: None,
            points: bbox.corners(),
            group_id: None,
            description: String::new(),
            difficult: false,
            shape_type: SHAPE_TYPE_RECTANGLE.to_string(),
            flags: BTreeMap::new(),
            attributes: BTreeMap::new(),
            kie_linking: Vec::new(),
        }
    }
}

/// The per-image annotation document.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDocument {
    pub version: String,
    pub flags: BTreeMap<String, bool>,
    pub shapes: Vec<Shape>,
    pub image_path: String,
    pub image_data: Option<String>,
    pub image_height: u32,
    pub image_width: u32,
}

impl ImageDocument {
    /// An empty document for an image of the given size.
    pub fn new(image_path: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self {
            version: ANYLABELING_VERSION.to_string(),
            flags: BTreeMap::new(),
            shapes: Vec::new(),
            image_path: image_path.into(),
            image_data: None,
            image_height,
            image_width,
        }
    }
}

/// Renders a document as pretty JSON (two-space indent, UTF-8 kept as is).
pub fn to_json_string(document: &ImageDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Writes a document to `path`, replacing any existing file.
pub fn write_document(path: &Path, document: &ImageDocument) -> Result<(), YoloprepError> {
    let json = to_json_string(document).map_err(|source| YoloprepError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(YoloprepError::io_at(path))
}
