//! Shared types passed between the lister, resolver, gallery state and renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Identifies the active subset of images (a tab name such as `sport`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Filenames returned by a directory lister for one category, in source order.
///
/// No ordering is assumed; the resolver imposes its own.
pub type RawListing = Vec<String>;

/// Pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One displayable photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRecord {
    /// A single file, optionally pre-sized from the metadata table.
    Single {
        filename: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        dimensions: Option<Dimensions>,
    },
    /// One photo available in several encodings.
    ///
    /// At least one of `preferred` / `fallback` is always set.
    Grouped {
        base_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        preferred: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
    },
}

impl ImageRecord {
    /// Identity within a sequence: filename in single mode, base name in grouped mode.
    pub fn identity(&self) -> &str {
        match self {
            ImageRecord::Single { filename, .. } => filename,
            ImageRecord::Grouped { base_name, .. } => base_name,
        }
    }

    /// File to use where only one source can be given (plain `<img src>`).
    ///
    /// A preferred-only group serves its preferred file as its own fallback.
    pub fn fallback_src(&self) -> Option<&str> {
        match self {
            ImageRecord::Single { filename, .. } => Some(filename),
            ImageRecord::Grouped {
                preferred,
                fallback,
                ..
            } => fallback.as_deref().or(preferred.as_deref()),
        }
    }

    /// Preferred encoding, if the record carries one distinct from the fallback.
    pub fn preferred_src(&self) -> Option<&str> {
        match self {
            ImageRecord::Single { .. } => None,
            ImageRecord::Grouped { preferred, .. } => preferred.as_deref(),
        }
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            ImageRecord::Single { dimensions, .. } => *dimensions,
            ImageRecord::Grouped { .. } => None,
        }
    }

    /// Caption shown under the lightbox image.
    pub fn caption(&self) -> &str {
        match self {
            ImageRecord::Single { filename, .. } => crate::naming::split_extension(filename)
                .map(|(stem, _)| stem)
                .unwrap_or(filename),
            ImageRecord::Grouped { base_name, .. } => base_name,
        }
    }
}

/// Ordered records for the active category, one per distinct photo.
///
/// Only the resolver builds non-empty sequences, which keeps identities
/// unique and the order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageSequence(Vec<ImageRecord>);

impl ImageSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_sorted(records: Vec<ImageRecord>) -> Self {
        Self(records)
    }

    pub fn identities(&self) -> Vec<&str> {
        self.0.iter().map(ImageRecord::identity).collect()
    }
}

impl Deref for ImageSequence {
    type Target = [ImageRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ImageSequence {
    type Item = &'a ImageRecord;
    type IntoIter = std::slice::Iter<'a, ImageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
