//! Static files written next to the generated pages.
//!
//! The stylesheet, client script and menu icons are embedded at compile time
//! and written on every build. A user asset directory (`assets/` by default)
//! in the source root is copied as-is into the output root, so documents can
//! reference `logo.svg` for `assets/logo.svg`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Embedded files as `(path relative to the output root, contents)`.
pub const EMBEDDED: &[(&str, &str)] = &[
    ("css/style.css", include_str!("../static/css/style.css")),
    (
        "css/images/menu-white.svg",
        include_str!("../static/css/images/menu-white.svg"),
    ),
    (
        "css/images/close-black.svg",
        include_str!("../static/css/images/close-black.svg"),
    ),
    (
        "css/images/search-black.svg",
        include_str!("../static/css/images/search-black.svg"),
    ),
    ("js/scripts.js", include_str!("../static/js/scripts.js")),
];

/// Files ignored when copying user assets.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Write the embedded files under `target`. Returns the paths written.
pub fn write_embedded(target: &Path) -> Result<Vec<PathBuf>, AssetError> {
    EMBEDDED
        .iter()
        .map(|(relative, contents)| -> Result<PathBuf, AssetError> {
            let path = target.join(relative);
            write_file(&path, contents.as_bytes())?;
            Ok(path)
        })
        .collect()
}

/// Copy every file below `source` into `target`, keeping relative paths.
///
/// A missing `source` is not an error; there is just nothing to copy.
pub fn copy_user_assets(source: &Path, target: &Path) -> Result<Vec<PathBuf>, AssetError> {
    if !source.is_dir() {
        return Ok(Vec::new());
    }
    let mut copied = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if IGNORED_FILES.iter().any(|ignored| *ignored == name) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let dest = target.join(relative);
        if let Some(parent) = dest.parent() {
            create_dir(parent)?;
        }
        fs::copy(entry.path(), &dest).map_err(|source| AssetError::Io {
            path: dest.clone(),
            source,
        })?;
        tracing::debug!(path = %dest.display(), "copied asset");
        copied.push(dest);
    }
    Ok(copied)
}

fn create_dir(dir: &Path) -> Result<(), AssetError> {
    fs::create_dir_all(dir).map_err(|source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), AssetError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
