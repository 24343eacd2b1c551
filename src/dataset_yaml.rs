//! YOLO dataset descriptor (`dataset.yaml`) generation.
//!
//! The descriptor tells a trainer where the images and labels live and what
//! the classes are called:
//!
//! ```yaml
//! path: /data
//! train: images/train
//! val: images/val
//! labels: labels
//! names:
//!   0: cat
//!   1: dog
//! ```
//!
//! Unlike `hbb2json` this produces a single artifact, so any problem aborts
//! the run before anything is written.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::classes::{ClassNames, Strictness};
use crate::error::YoloprepError;
use crate::paths;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "dataset.yaml";

const TRAIN_DIR: &str = "train";
const VAL_DIR: &str = "val";

/// Inputs of descriptor generation.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    /// A `.txt`, `.yaml` or `.yml` class list.
    pub classes_file: PathBuf,
    pub output_path: PathBuf,
}

/// The dataset descriptor. Field order is the order keys are written in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetDescriptor {
    /// Absolute dataset root (parent of the images directory).
    pub path: String,
    pub train: String,
    pub val: String,
    pub labels: String,
    pub names: BTreeMap<usize, String>,
}

impl DatasetDescriptor {
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// What [`generate`] wrote.
#[derive(Clone, Debug, Serialize)]
pub struct GenerateReport {
    pub output_path: PathBuf,
    pub train: String,
    pub val: String,
    pub labels: String,
    pub class_count: usize,
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wrote dataset descriptor: {}", self.output_path.display())?;
        writeln!(f, "  train: {}", self.train)?;
        writeln!(f, "  val: {}", self.val)?;
        writeln!(f, "  labels: {}", self.labels)?;
        writeln!(f, "  classes: {}", self.class_count)
    }
}

/// Builds the descriptor without writing it.
pub fn build_descriptor(options: &GenerateOptions) -> Result<DatasetDescriptor, YoloprepError> {
    paths::require_dir(&options.images_dir, "images")?;
    paths::require_dir(&options.labels_dir, "labels")?;

    let classes = ClassNames::load(Some(&options.classes_file), Strictness::Strict)?;

    let images_dir = paths::absolute(&options.images_dir)?;
    let labels_dir = paths::absolute(&options.labels_dir)?;
    let base = images_dir
        .parent()
        .unwrap_or(images_dir.as_path())
        .to_path_buf();

    let (train, val) = infer_train_val(&images_dir, &base)?;

    Ok(DatasetDescriptor {
        path: base.to_string_lossy().into_owned(),
        train,
        val,
        labels: paths::relative_to(&labels_dir, &base)?,
        names: classes.ordered_names().into_iter().enumerate().collect(),
    })
}

/// Builds the descriptor and writes it to `options.output_path`.
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, YoloprepError> {
    let descriptor = build_descriptor(options)?;
    let yaml = descriptor
        .to_yaml_string()
        .map_err(|source| YoloprepError::YamlWrite {
            path: options.output_path.clone(),
            source,
        })?;

    if let Some(parent) = options.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(YoloprepError::io_at(parent))?;
        }
    }
    fs::write(&options.output_path, yaml).map_err(YoloprepError::io_at(&options.output_path))?;

    info!("wrote {}", options.output_path.display());

    Ok(GenerateReport {
        output_path: options.output_path.clone(),
        train: descriptor.train,
        val: descriptor.val,
        labels: descriptor.labels,
        class_count: descriptor.names.len(),
    })
}

/// Picks the train/val directories relative to `base`.
///
/// Separate `train/` and `val/` subdirectories are only used when both exist;
/// otherwise train and val share the images directory itself.
fn infer_train_val(images_dir: &Path, base: &Path) -> Result<(String, String), YoloprepError> {
    let train_dir = images_dir.join(TRAIN_DIR);
    let val_dir = images_dir.join(VAL_DIR);

    if train_dir.is_dir() && val_dir.is_dir() {
        Ok((
            paths::relative_to(&train_dir, base)?,
            paths::relative_to(&val_dir, base)?,
        ))
    } else {
        let shared = paths::relative_to(images_dir, base)?;
        Ok((shared.clone(), shared))
    }
}
