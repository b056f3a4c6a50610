//! Input folder discovery.

use crate::detect::has_supported_extension;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Check that `folder` exists and is a directory.
pub fn validate_folder<P: AsRef<Path>>(folder: P) -> Result<()> {
    let folder = folder.as_ref();
    if !folder.exists() {
        return Err(Error::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(Error::NotADirectory(folder.to_path_buf()));
    }
    Ok(())
}

/// List the images directly inside `folder`, sorted by file name.
///
/// Only regular files whose extension is one of `png`, `jpg`, `jpeg`,
/// `gif`, `bmp` (any case) are returned. Subfolders are not descended
/// into. An empty list is not an error.
pub fn scan_folder<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    validate_folder(folder)?;

    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && has_supported_extension(&path) {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("Found {} images in {}", images.len(), folder.display());
    Ok(images)
}
