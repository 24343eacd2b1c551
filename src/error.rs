use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yoloprep operations.
#[derive(Debug, Error)]
pub enum YoloprepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{role} directory does not exist: {path}")]
    DirectoryNotFound { role: &'static str, path: PathBuf },

    #[error("Classes file does not exist: {path}")]
    ClassesNotFound { path: PathBuf },

    #[error("A classes file is required")]
    ClassesRequired,

    #[error("Failed to parse classes YAML from {path}: {source}")]
    ClassesParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid classes file {path}: {message}")]
    ClassesInvalid { path: PathBuf, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Path {path} is not inside dataset base {base}")]
    PathOutsideBase { path: PathBuf, base: PathBuf },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} is too large: {width}x{height}")]
    ImageTooLarge {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error("Failed to parse YOLO label {path}:{line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write YAML to {path}: {source}")]
    YamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl YoloprepError {
    pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| YoloprepError::IoAt { path, source }
    }
}
