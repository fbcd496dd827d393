//! Dimension probing for local images.
//!
//! | Format | Source of dimensions |
//! |---|---|
//! | AVIF | container metadata via `avif-parse` (no AV1 decode) |
//! | JPEG, PNG, GIF, WebP | header read via `image::image_dimensions` |
//!
//! [`probe_directory`] runs over one category folder in parallel and returns
//! a [`MetadataMap`] ready to be written as the `[metadata]` config section.

use crate::metadata::MetadataMap;
use crate::naming::split_extension;
use crate::types::Dimensions;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error("Failed to read dimensions of {0}: {1}")]
    Decode(PathBuf, String),
}

fn is_avif(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("avif"))
        .unwrap_or(false)
}

/// Read the dimensions of one image file.
pub fn identify(path: &Path) -> Result<Dimensions, ProbeError> {
    if is_avif(path) {
        return identify_avif(path);
    }
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| ProbeError::Decode(path.to_path_buf(), e.to_string()))?;
    Ok(Dimensions { width, height })
}

fn identify_avif(path: &Path) -> Result<Dimensions, ProbeError> {
    let data = std::fs::read(path)?;
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(&data))
        .map_err(|e| ProbeError::Decode(path.to_path_buf(), format!("{e:?}")))?;
    let meta = avif
        .primary_item_metadata()
        .map_err(|e| ProbeError::Decode(path.to_path_buf(), format!("{e:?}")))?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

/// Probe every recognized image directly inside `dir`.
///
/// Keys are bare filenames, matching what a lister returns. Subdirectories
/// are not entered. Any unreadable image fails the whole probe so a
/// half-filled table is never written.
pub fn probe_directory(
    dir: &Path,
    extensions: &BTreeSet<String>,
) -> Result<MetadataMap, ProbeError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ProbeError::Walk(dir.to_path_buf(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let recognized = split_extension(&name).is_some_and(|(_, ext)| extensions.contains(&ext));
        if recognized {
            files.push((name, entry.into_path()));
        }
    }

    let probed: Result<Vec<(String, Dimensions)>, ProbeError> = files
        .into_par_iter()
        .map(|(name, path)| identify(&path).map(|dims| (name, dims)))
        .collect();
    Ok(probed?.into_iter().collect())
}
