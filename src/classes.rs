//! Class-name tables.
//!
//! Both subcommands need the index → name mapping of a dataset. It comes
//! either from a `classes.txt` (one name per line) or from a YAML file with a
//! `names` field holding a list or an index-keyed mapping, the same shape
//! Ultralytics uses in `data.yaml`.
//!
//! The loader has two failure policies. [`Strictness::Lenient`] is for batch
//! conversion: problems are logged and an empty (or partial) table comes back,
//! because every unknown class still gets a usable fallback label.
//! [`Strictness::Strict`] is for producing a dataset descriptor, where a wrong
//! class list would silently poison training, so every problem is an error.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::YoloprepError;
use crate::paths::has_extension;

/// Reserved file name of the line-per-class list.
pub const CLASSES_TXT: &str = "classes.txt";
/// Reserved file name of the YAML class list.
pub const CLASSES_YAML: &str = "classes.yaml";

/// How the loader reacts to missing or malformed class files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strictness {
    /// Log and fall back to whatever was found (possibly nothing).
    Lenient,
    /// Any problem is a fatal [`YoloprepError`].
    Strict,
}

/// Mapping from class index to display name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: BTreeMap<usize, String>,
    source: Option<PathBuf>,
}

impl ClassNames {
    /// Builds a table from names in index order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .enumerate()
                .collect(),
            source: None,
        }
    }

    /// Loads a class table.
    ///
    /// In lenient mode `path` may be a file or a directory holding
    /// `classes.txt` / `classes.yaml`; the text form is tried first. In strict
    /// mode `path` must be an existing `.txt`, `.yaml` or `.yml` file.
    pub fn load(path: Option<&Path>, strictness: Strictness) -> Result<Self, YoloprepError> {
        let table = match (path, strictness) {
            (None, Strictness::Lenient) => Self::default(),
            (None, Strictness::Strict) => return Err(YoloprepError::ClassesRequired),
            (Some(path), Strictness::Lenient) => load_lenient(path),
            (Some(path), Strictness::Strict) => load_strict(path)?,
        };

        if let Some(source) = &table.source {
            info!(
                "loaded {} class name(s) from {}",
                table.len(),
                source.display()
            );
        }

        Ok(table)
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    /// Returns the name for `class_id`, or the id zero-padded to three digits
    /// when the table has no entry for it.
    pub fn resolve(&self, class_id: usize) -> Cow<'_, str> {
        match self.get(class_id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("{class_id:03}")),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names ordered by class index, with gaps closed up.
    pub fn ordered_names(&self) -> Vec<String> {
        self.names.values().cloned().collect()
    }

    /// The file the table was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn load_lenient(path: &Path) -> ClassNames {
    let txt_candidate = if has_extension(path, &["txt"]) {
        path.to_path_buf()
    } else {
        path.join(CLASSES_TXT)
    };

    if txt_candidate.is_file() {
        match read_classes_txt(&txt_candidate) {
            Ok(names) => return with_source(names, txt_candidate),
            Err(err) => warn!("ignoring classes file: {err}"),
        }
    }

    let yaml_candidate = if has_extension(path, &["yaml", "yml"]) {
        path.to_path_buf()
    } else if path.is_dir() {
        path.join(CLASSES_YAML)
    } else {
        path.with_file_name(CLASSES_YAML)
    };

    if yaml_candidate.is_file() {
        match read_classes_yaml(&yaml_candidate) {
            Ok(Some(names)) => return with_source(names, yaml_candidate),
            Ok(None) => warn!(
                "ignoring classes file {}: no 'names' field",
                yaml_candidate.display()
            ),
            Err(err) => warn!("ignoring classes file: {err}"),
        }
    }

    ClassNames::default()
}

fn load_strict(path: &Path) -> Result<ClassNames, YoloprepError> {
    if !path.is_file() {
        return Err(YoloprepError::ClassesNotFound {
            path: path.to_path_buf(),
        });
    }

    let names = if has_extension(path, &["yaml", "yml"]) {
        read_classes_yaml(path)?.unwrap_or_default()
    } else if has_extension(path, &["txt"]) {
        read_classes_txt(path)?
    } else {
        return Err(YoloprepError::UnsupportedFormat(format!(
            "classes file '{}' (supported: .txt, .yaml, .yml)",
            path.display()
        )));
    };

    Ok(with_source(names, path.to_path_buf()))
}

fn with_source(names: BTreeMap<usize, String>, source: PathBuf) -> ClassNames {
    ClassNames {
        names,
        source: Some(source),
    }
}

fn read_classes_txt(path: &Path) -> Result<BTreeMap<usize, String>, YoloprepError> {
    let data = fs::read_to_string(path).map_err(YoloprepError::io_at(path))?;

    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .enumerate()
        .collect())
}

#[derive(Debug, Default, Deserialize)]
struct ClassesYaml {
    #[serde(default)]
    names: Option<Value>,
}

/// Reads the `names` field of a YAML class file.
///
/// Returns `Ok(None)` for an empty document or one without `names`.
fn read_classes_yaml(path: &Path) -> Result<Option<BTreeMap<usize, String>>, YoloprepError> {
    let data = fs::read_to_string(path).map_err(YoloprepError::io_at(path))?;
    if data.trim().is_empty() {
        return Ok(None);
    }

    let parsed: Option<ClassesYaml> =
        serde_yaml::from_str(&data).map_err(|source| YoloprepError::ClassesParse {
            path: path.to_path_buf(),
            source,
        })?;

    match parsed.and_then(|doc| doc.names) {
        None | Some(Value::Null) => Ok(None),
        Some(names) => names_from_value(names, path).map(Some),
    }
}

fn names_from_value(names: Value, path: &Path) -> Result<BTreeMap<usize, String>, YoloprepError> {
    match names {
        Value::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| scalar_name(item, path).map(|name| (index, name)))
            .collect(),
        Value::Mapping(mapping) => {
            let mut indexed = BTreeMap::new();
            let mut keyed = BTreeMap::new();
            for (key, value) in mapping {
                let name = scalar_name(value, path)?;
                match key_index(&key) {
                    Some(index) => {
                        indexed.insert(index, name);
                    }
                    None => {
                        keyed.insert(scalar_name(key, path)?, name);
                    }
                }
            }

            if keyed.is_empty() {
                Ok(indexed)
            } else {
                // Mixed keys: numeric keys first in numeric order, then the
                // rest lexically, indexed by position.
                Ok(indexed
                    .into_values()
                    .chain(keyed.into_values())
                    .enumerate()
                    .collect())
            }
        }
        other => Err(YoloprepError::ClassesInvalid {
            path: path.to_path_buf(),
            message: format!(
                "'names' must be a list or a mapping, found {}",
                value_kind(&other)
            ),
        }),
    }
}

/// Index of a mapping key written as an integer or as a quoted integer.
fn key_index(key: &Value) -> Option<usize> {
    match key {
        Value::Number(n) => n.as_u64().and_then(|k| usize::try_from(k).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_name(value: Value, path: &Path) -> Result<String, YoloprepError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(YoloprepError::ClassesInvalid {
            path: path.to_path_buf(),
            message: format!("class names must be scalars, found {}", value_kind(&other)),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
