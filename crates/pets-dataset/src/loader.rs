//! Image listing and loading for the pets dataset.
//!
//! This module provides directory listing, the JPEG filter predicate,
//! and image loading from disk with error handling.

use image::DynamicImage;
use pets_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Checks whether a path carries a JPEG extension (`.jpg` or `.jpeg`,
/// case-insensitive).
///
/// Files rejected by this predicate are skipped by the splitter without
/// producing an output.
pub fn has_jpeg_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "jpg" | "jpeg")
        })
        .unwrap_or(false)
}

/// Image loader for the pets dataset
pub struct ImageLoader {
    /// Root directory containing images
    root_dir: PathBuf,
}

impl ImageLoader {
    /// Creates a new image loader
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Gets the full path for an image
    pub fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    /// Loads an image from a path
    pub fn load_image(&self, path: &Path) -> Result<DynamicImage> {
        let full_path = self.full_path(path);

        if !full_path.exists() {
            return Err(Error::NotFound(format!(
                "Image file not found: {}",
                full_path.display()
            )));
        }

        image::open(&full_path).map_err(|e| {
            Error::Image(format!(
                "Failed to load image {}: {}",
                full_path.display(),
                e
            ))
        })
    }

    /// Lists the regular files directly inside a directory, non-recursive.
    ///
    /// No extension filtering happens here; every regular file is listed
    /// and the splitter applies [`has_jpeg_extension`] per file. The
    /// listing is sorted so that a seeded shuffle is reproducible across
    /// platforms.
    pub fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let full_dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root_dir.join(dir)
        };

        if !full_dir.exists() {
            return Err(Error::NotFound(format!(
                "Directory not found: {}",
                full_dir.display()
            )));
        }

        if !full_dir.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "Path is not a directory: {}",
                full_dir.display()
            )));
        }

        let mut files = Vec::new();

        for entry in std::fs::read_dir(&full_dir).map_err(Error::Io)? {
            let entry = entry.map_err(Error::Io)?;
            let path = entry.path();

            if path.is_file() {
                files.push(path);
            }
        }

        files.sort();

        Ok(files)
    }
}
