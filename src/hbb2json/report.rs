//! Summary of an `hbb2json` batch.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened during a batch conversion.
///
/// Per-file failures never abort the batch; they end up in
/// [`ConvertReport::skipped`] instead.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConvertReport {
    /// Label files found in the labels directory.
    pub label_files: usize,
    /// JSON documents written.
    pub documents_written: usize,
    /// Shapes written across all documents.
    pub shapes: usize,
    /// Label rows rejected as malformed.
    pub malformed_lines: usize,
    /// Label files that produced no document.
    pub skipped: Vec<SkippedFile>,
    /// Absolute path of the output directory.
    pub output_dir: PathBuf,
}

impl ConvertReport {
    pub fn new(label_files: usize, output_dir: PathBuf) -> Self {
        Self {
            label_files,
            output_dir,
            ..Default::default()
        }
    }

    pub fn skipped_count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Conversion finished")?;
        writeln!(f, "  label files processed: {}", self.label_files)?;
        writeln!(f, "  documents written: {}", self.documents_written)?;
        writeln!(f, "  total shapes: {}", self.shapes)?;
        if self.malformed_lines > 0 {
            writeln!(f, "  malformed lines skipped: {}", self.malformed_lines)?;
        }
        writeln!(f, "  output directory: {}", self.output_dir.display())?;

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "  - {}", skipped)?;
            }
        }

        Ok(())
    }
}

/// A label file that was left out of the output.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedFile {
    pub label_file: PathBuf,
    pub reason: SkipReason,
    pub message: String,
}

impl SkippedFile {
    pub fn new(label_file: &Path, reason: SkipReason, message: impl Into<String>) -> Self {
        Self {
            label_file: label_file.to_path_buf(),
            reason,
            message: message.into(),
        }
    }
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .label_file
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| self.label_file.to_string_lossy());
        write!(f, "{}: {} ({})", name, self.reason, self.message)
    }
}

/// Why a label file produced no document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingImage,
    UnreadableImage,
    UnreadableLabels,
    WriteFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingImage => "no matching image",
            SkipReason::UnreadableImage => "image unreadable",
            SkipReason::UnreadableLabels => "label file unreadable",
            SkipReason::WriteFailed => "write failed",
        };
        f.write_str(text)
    }
}
