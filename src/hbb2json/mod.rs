//! YOLO HBB labels to X-AnyLabeling JSON.
//!
//! For every `<stem>.txt` in the labels directory the matching image is looked
//! up, its size read from the file header, and the normalized boxes are turned
//! into pixel rectangles in `<stem>.json`. A problem with one file is logged
//! and recorded in the [`ConvertReport`]; the rest of the batch carries on.

pub mod report;

pub use report::{ConvertReport, SkipReason, SkippedFile};

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use walkdir::WalkDir;

use crate::anylabeling::{self, ImageDocument, Shape};
use crate::classes::{ClassNames, Strictness, CLASSES_TXT};
use crate::error::YoloprepError;
use crate::paths;
use crate::yolo_txt::{self, LabelRow, LABEL_EXTENSION};

/// Image extensions probed for each label file, in priority order.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Placeholder replaced by the image file name in an image path template.
pub const FILE_NAME_PLACEHOLDER: &str = "{file_name}";

/// Default `imagePath` template: documents live in `labels/<split>/` next to
/// an `images/train/` tree.
pub const DEFAULT_IMAGE_PATH_TEMPLATE: &str = "../../images/train/{file_name}";

/// Inputs of a batch conversion.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    /// Defaults to `labels_dir`.
    pub output_dir: Option<PathBuf>,
    /// Defaults to `labels_dir/classes.txt`.
    pub classes_file: Option<PathBuf>,
    /// Template for the `imagePath` field; see [`render_image_path`].
    pub image_path_template: String,
}

impl ConvertOptions {
    pub fn new(images_dir: impl Into<PathBuf>, labels_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            labels_dir: labels_dir.into(),
            output_dir: None,
            classes_file: None,
            image_path_template: DEFAULT_IMAGE_PATH_TEMPLATE.to_string(),
        }
    }
}

/// Converts every label file in `options.labels_dir`.
///
/// # Errors
/// Only setup problems are errors: a missing input directory or an output
/// directory that cannot be created. Everything per-file is reported through
/// the returned [`ConvertReport`].
pub fn convert(options: &ConvertOptions) -> Result<ConvertReport, YoloprepError> {
    paths::require_dir(&options.images_dir, "images")?;
    paths::require_dir(&options.labels_dir, "labels")?;

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| options.labels_dir.clone());
    fs::create_dir_all(&output_dir).map_err(YoloprepError::io_at(&output_dir))?;

    let classes_source = options
        .classes_file
        .clone()
        .unwrap_or_else(|| options.labels_dir.join(CLASSES_TXT));
    let classes = ClassNames::load(Some(&classes_source), Strictness::Lenient)?;

    let label_files = collect_label_files(&options.labels_dir, classes.source())?;
    let mut report = ConvertReport::new(label_files.len(), paths::absolute(&output_dir)?);

    for label_path in &label_files {
        match convert_one(label_path, options, &classes, &output_dir) {
            Ok(converted) => {
                report.documents_written += 1;
                report.shapes += converted.shapes;
                report.malformed_lines += converted.malformed_lines;
            }
            Err(skipped) => {
                match skipped.reason {
                    SkipReason::MissingImage => warn!("skipping {}", skipped),
                    _ => error!("skipping {}", skipped),
                }
                report.skipped.push(skipped);
            }
        }
    }

    info!(
        "converted {} of {} label file(s), {} shape(s)",
        report.documents_written, report.label_files, report.shapes
    );

    Ok(report)
}

struct Converted {
    shapes: usize,
    malformed_lines: usize,
}

fn convert_one(
    label_path: &Path,
    options: &ConvertOptions,
    classes: &ClassNames,
    output_dir: &Path,
) -> Result<Converted, SkippedFile> {
    let stem = label_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image_path = find_image_for_label(&options.images_dir, &stem).ok_or_else(|| {
        SkippedFile::new(
            label_path,
            SkipReason::MissingImage,
            format!(
                "looked for {} in {}",
                IMAGE_EXTENSIONS
                    .iter()
                    .map(|ext| format!("{stem}.{ext}"))
                    .collect::<Vec<_>>()
                    .join(", "),
                options.images_dir.display()
            ),
        )
    })?;

    let (width, height) = read_image_dimensions(&image_path)
        .map_err(|err| SkippedFile::new(label_path, SkipReason::UnreadableImage, err.to_string()))?;

    let content = fs::read_to_string(label_path).map_err(|source| {
        SkippedFile::new(
            label_path,
            SkipReason::UnreadableLabels,
            YoloprepError::io_at(label_path)(source).to_string(),
        )
    })?;
    let parsed = yolo_txt::parse_labels(&content, label_path);

    let image_file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = build_document(
        &parsed.rows,
        classes,
        render_image_path(&options.image_path_template, &image_file_name),
        width,
        height,
    );

    let json_path = output_dir.join(format!("{stem}.json"));
    anylabeling::write_document(&json_path, &document)
        .map_err(|err| SkippedFile::new(label_path, SkipReason::WriteFailed, err.to_string()))?;

    info!(
        "{} -> {} ({} shape(s))",
        label_path.display(),
        json_path.display(),
        document.shapes.len()
    );

    Ok(Converted {
        shapes: document.shapes.len(),
        malformed_lines: parsed.malformed,
    })
}

/// Builds the document for one image from its parsed label rows.
///
/// Boxes are scaled to pixels and clamped into the image; shapes keep the
/// order of `rows`.
pub fn build_document(
    rows: &[LabelRow],
    classes: &ClassNames,
    image_path: String,
    image_width: u32,
    image_height: u32,
) -> ImageDocument {
    let width = f64::from(image_width);
    let height = f64::from(image_height);

    let mut document = ImageDocument::new(image_path, image_width, image_height);
    document.shapes = rows
        .iter()
        .map(|row| {
            let bbox = row.bbox().to_pixel(width, height).clamp_to(width, height);
            Shape::rectangle(classes.resolve(row.class_id), &bbox)
        })
        .collect();

    document
}

/// Fills `{file_name}` in an image path template.
pub fn render_image_path(template: &str, image_file_name: &str) -> String {
    template.replace(FILE_NAME_PLACEHOLDER, image_file_name)
}

/// Label files directly inside `labels_dir`, sorted by name.
///
/// The reserved `classes.txt` and the class file actually in use are left out.
fn collect_label_files(
    labels_dir: &Path,
    classes_source: Option<&Path>,
) -> Result<Vec<PathBuf>, YoloprepError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(labels_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Only a failure to list the directory itself is fatal.
            Err(err) if err.depth() == 0 => {
                return Err(YoloprepError::IoAt {
                    path: labels_dir.to_path_buf(),
                    source: err.into(),
                })
            }
            Err(err) => {
                warn!("ignoring unreadable entry in {}: {err}", labels_dir.display());
                continue;
            }
        };
        let path = entry.path();

        if !entry.file_type().is_file() || !paths::has_extension(path, &[LABEL_EXTENSION]) {
            continue;
        }
        if entry.file_name() == CLASSES_TXT {
            continue;
        }
        if classes_source.is_some_and(|source| paths::same_file(path, source)) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn find_image_for_label(images_dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| images_dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), YoloprepError> {
    let size = imagesize::size(path).map_err(|source| YoloprepError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(YoloprepError::ImageTooLarge {
            path: path.to_path_buf(),
            width: size.width,
            height: size.height,
        }),
    }
}
