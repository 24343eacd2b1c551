//! YOLO horizontal-bounding-box label files.
//!
//! One `.txt` file per image, one `class cx cy w h` row per line, all box
//! values normalized to the image size. Rows that cannot be parsed are
//! reported and skipped; they never abort the file.

use std::path::Path;

use log::warn;

use crate::error::YoloprepError;
use crate::geom::{BBoxXYXY, Normalized};

/// File extension of YOLO label files.
pub const LABEL_EXTENSION: &str = "txt";

/// One parsed label row.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRow {
    pub class_id: usize,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelRow {
    pub fn bbox(&self) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_cxcywh(self.cx, self.cy, self.w, self.h)
    }
}

/// Result of parsing a whole label file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedLabels {
    /// Valid rows, in file order.
    pub rows: Vec<LabelRow>,
    /// Number of non-blank lines that were rejected.
    pub malformed: usize,
}

/// Parses the contents of a label file.
///
/// `path` is only used for diagnostics. Every rejected line is logged at
/// `warn` level and counted in [`ParsedLabels::malformed`].
pub fn parse_labels(content: &str, path: &Path) -> ParsedLabels {
    let mut parsed = ParsedLabels::default();

    for (line_idx, line) in content.lines().enumerate() {
        match parse_label_line(line, path, line_idx + 1) {
            Ok(Some(row)) => parsed.rows.push(row),
            Ok(None) => {}
            Err(err) => {
                warn!("skipping label row: {err}");
                parsed.malformed += 1;
            }
        }
    }

    parsed
}

/// Parses a single label line.
///
/// Blank lines yield `Ok(None)`. Tokens past the fifth (for example a
/// confidence column from a detector dump) are ignored.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<LabelRow>, YoloprepError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().take(5).collect();

    if tokens.len() < 5 {
        return Err(YoloprepError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected 5 tokens, found {} in '{}'", tokens.len(), trimmed),
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| YoloprepError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid class_id '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    let cx = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(Some(LabelRow {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), YoloprepError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, YoloprepError> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| YoloprepError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })?;

    if !value.is_finite() {
        return Err(YoloprepError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("{field_name} '{raw}' is not finite"),
        });
    }

    Ok(value)
}
