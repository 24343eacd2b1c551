//! Small filesystem helpers shared by both subcommands.

use std::path::{Path, PathBuf};

use crate::error::YoloprepError;

/// Fails with [`YoloprepError::DirectoryNotFound`] unless `path` is a directory.
pub fn require_dir(path: &Path, role: &'static str) -> Result<(), YoloprepError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(YoloprepError::DirectoryNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}

/// Makes `path` absolute against the current directory without touching
/// symlinks, then drops `.` components.
pub fn absolute(path: &Path) -> Result<PathBuf, YoloprepError> {
    let abs = std::path::absolute(path)?;
    Ok(abs.components().collect())
}

/// `path` relative to `root`, with `/` separators.
pub fn relative_to(path: &Path, root: &Path) -> Result<String, YoloprepError> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| YoloprepError::PathOutsideBase {
            path: path.to_path_buf(),
            base: root.to_path_buf(),
        })?;

    let rel = rel.to_string_lossy().replace('\\', "/");
    Ok(if rel.is_empty() { ".".to_string() } else { rel })
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// True if both paths name the same existing file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
