//! Static image metadata: known dimensions per filename.
//!
//! The table lives in the `[metadata]` section of `config.toml`:
//!
//! ```toml
//! [metadata]
//! "photo-01.jpg" = { width = 2048, height = 1538 }
//! "photo-02.jpg" = { width = 2027, height = 2700 }
//! ```
//!
//! It serves two purposes. In single-file mode, renderers use the dimensions
//! to reserve layout space before the image loads, so the grid never shifts.
//! When a listing fails and the deployment's failure policy is `metadata`,
//! the table's filenames stand in for the listing. Missing entries are
//! normal: an image without metadata is simply rendered unsized.
//!
//! `tab-gal probe <dir>` builds the table from local files; see
//! [`crate::imaging::probe_directory`].

use crate::types::{Dimensions, RawListing};
use serde::Serialize;
use std::collections::BTreeMap;

/// Filename → dimensions, ordered by filename.
pub type MetadataMap = BTreeMap<String, Dimensions>;

/// Filenames known to the table, ascending. Used as the offline fallback listing.
pub fn fallback_listing(metadata: &MetadataMap) -> RawListing {
    metadata.keys().cloned().collect()
}

#[derive(Serialize)]
struct MetadataSection<'a> {
    metadata: &'a MetadataMap,
}

/// Render the table as a `[metadata]` section ready to paste into `config.toml`.
pub fn to_toml_section(metadata: &MetadataMap) -> Result<String, toml::ser::Error> {
    toml::to_string(&MetadataSection { metadata })
}
