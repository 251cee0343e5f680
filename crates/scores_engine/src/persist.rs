use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0:?} exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot create or write to {path:?}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn unwritable(path: &Path) -> impl FnOnce(io::Error) -> PersistError + '_ {
    move |source| PersistError::Unwritable {
        path: path.to_path_buf(),
        source,
    }
}

/// Creates `dir` if needed and proves a file can be created inside it.
/// Run once at startup so an unusable output location fails before any fetch.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(unwritable(dir))?;
    tempfile::Builder::new()
        .prefix(".scores-probe")
        .tempfile_in(dir)
        .map_err(unwritable(dir))?;
    Ok(())
}

/// Ensures the directory holding `file` exists. A bare file name needs nothing.
pub fn ensure_parent_dir(file: &Path) -> Result<(), PersistError> {
    match file.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) if !parent.is_dir() => fs::create_dir_all(parent).map_err(unwritable(parent)),
        _ => Ok(()),
    }
}
