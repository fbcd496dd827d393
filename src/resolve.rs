//! Image set resolution: raw directory listing → ordered [`ImageSequence`].
//!
//! Resolution is a pure function of the listing and the deployment's
//! [`ResolvePolicy`]. It never fails; anything it cannot make sense of is
//! dropped.
//!
//! ## Steps
//!
//! 1. **Filter**: keep names whose lowercase extension is recognized. Names
//!    without an extension or with an empty stem are dropped too.
//! 2. **Group** (grouped mode): names sharing a base name become one record.
//!    `avif` fills the preferred slot, `jpg`/`jpeg` the fallback slot, any
//!    other recognized extension fills the fallback slot only when no
//!    `jpg`/`jpeg` exists. Within a slot the smallest filename wins, so the
//!    result never depends on listing order.
//! 3. **Sort**: by [`SortPolicy`].
//! 4. **Drop empties**: a group without any file is never emitted.
//!
//! Single-file mode skips grouping, sorts filenames ascending and attaches
//! known dimensions from the metadata table.
//!
//! ## Failure
//!
//! [`Resolver::resolve_listing`] turns any [`ListingError`] into the
//! deployment's [`FailurePolicy`] fallback: nothing, or the metadata table's
//! filenames resolved as if they had been listed.

use crate::config::GalleryConfig;
use crate::listing::ListingError;
use crate::metadata::{self, MetadataMap};
use crate::naming::{cmp_digit_runs, split_extension, trailing_digits};
use crate::types::{CategoryKey, ImageRecord, ImageSequence};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How listed files become records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// One record per file.
    Single,
    /// One record per base name, merging encodings.
    Grouped,
}

/// Order of records within a sequence. Fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Lexicographic on the identity.
    Ascending,
    /// Trailing number descending; reverse lexicographic when either side
    /// has no trailing number.
    ///
    /// The pairwise rule is not transitive once numbered and unnumbered
    /// names mix. The result is then deterministic (the sort input is always
    /// in base-name order) but numbered names with unnumbered names between
    /// them are not guaranteed to be in numeric order: `z-1, x, m, a-9`.
    /// Listings that are all numbered, or all unnumbered, sort exactly.
    ReverseNumeric,
}

/// What a failed listing resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    Empty,
    Metadata,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Empty => f.write_str("empty"),
            FailurePolicy::Metadata => f.write_str("metadata"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePolicy {
    pub mode: ResolveMode,
    /// Recognized extensions, lowercase, without the dot.
    pub extensions: BTreeSet<String>,
    pub sort: SortPolicy,
    pub on_failure: FailurePolicy,
}

/// Resolves listings under one deployment policy.
#[derive(Debug, Clone)]
pub struct Resolver {
    policy: ResolvePolicy,
    metadata: MetadataMap,
}

impl Resolver {
    pub fn new(policy: ResolvePolicy, metadata: MetadataMap) -> Self {
        Self { policy, metadata }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.resolve_policy(), config.metadata.clone())
    }

    pub fn policy(&self) -> &ResolvePolicy {
        &self.policy
    }

    /// Resolve a listing into an ordered sequence.
    pub fn resolve(&self, listing: &[String]) -> ImageSequence {
        let files = recognized_files(listing, &self.policy.extensions);
        let records = match self.policy.mode {
            ResolveMode::Single => resolve_single(files, &self.metadata),
            ResolveMode::Grouped => resolve_grouped(files, self.policy.sort),
        };
        ImageSequence::from_sorted(records)
    }

    /// Resolve a lister result, substituting the fallback sequence on failure.
    pub fn resolve_listing(
        &self,
        category: &CategoryKey,
        listing: Result<Vec<String>, ListingError>,
    ) -> ImageSequence {
        match listing {
            Ok(files) => self.resolve(&files),
            Err(err) => {
                log::warn!(
                    "listing '{category}' failed: {err}; using {} fallback",
                    self.policy.on_failure
                );
                self.fallback_sequence()
            }
        }
    }

    /// The sequence a failed listing resolves to.
    pub fn fallback_sequence(&self) -> ImageSequence {
        match self.policy.on_failure {
            FailurePolicy::Empty => ImageSequence::empty(),
            FailurePolicy::Metadata => self.resolve(&metadata::fallback_listing(&self.metadata)),
        }
    }
}

/// A listed file that passed the extension filter.
struct Recognized<'a> {
    filename: &'a str,
    stem: &'a str,
    ext: String,
}

fn recognized_files<'a>(listing: &'a [String], extensions: &BTreeSet<String>) -> Vec<Recognized<'a>> {
    listing
        .iter()
        .filter_map(|name| {
            let (stem, ext) = split_extension(name)?;
            extensions.contains(&ext).then_some(Recognized {
                filename: name,
                stem,
                ext,
            })
        })
        .collect()
}

fn resolve_single(files: Vec<Recognized<'_>>, metadata: &MetadataMap) -> Vec<ImageRecord> {
    // BTreeSet: ascending and de-duplicated in one step
    let names: BTreeSet<&str> = files.iter().map(|f| f.filename).collect();
    names
        .into_iter()
        .map(|filename| ImageRecord::Single {
            filename: filename.to_string(),
            dimensions: metadata.get(filename).copied(),
        })
        .collect()
}

/// Slot candidate: lower rank wins, then the smaller filename.
type Candidate<'a> = (u8, &'a str);

#[derive(Default)]
struct Slots<'a> {
    preferred: Option<Candidate<'a>>,
    fallback: Option<Candidate<'a>>,
}

fn offer<'a>(slot: &mut Option<Candidate<'a>>, candidate: Candidate<'a>) {
    if slot.is_none_or(|current| candidate < current) {
        *slot = Some(candidate);
    }
}

fn resolve_grouped(files: Vec<Recognized<'_>>, sort: SortPolicy) -> Vec<ImageRecord> {
    let mut groups: BTreeMap<&str, Slots<'_>> = BTreeMap::new();
    for file in files {
        let slots = groups.entry(file.stem).or_default();
        match file.ext.as_str() {
            "avif" => offer(&mut slots.preferred, (0, file.filename)),
            "jpg" | "jpeg" => offer(&mut slots.fallback, (0, file.filename)),
            _ => offer(&mut slots.fallback, (1, file.filename)),
        }
    }

    let records: Vec<ImageRecord> = groups
        .into_iter()
        .filter(|(_, slots)| slots.preferred.is_some() || slots.fallback.is_some())
        .map(|(base, slots)| ImageRecord::Grouped {
            base_name: base.to_string(),
            preferred: slots.preferred.map(|(_, f)| f.to_string()),
            fallback: slots.fallback.map(|(_, f)| f.to_string()),
        })
        .collect();

    match sort {
        SortPolicy::Ascending => {
            let mut records = records;
            records.sort_by(|a, b| a.identity().cmp(b.identity()));
            records
        }
        SortPolicy::ReverseNumeric => {
            merge_sort_by(records, &|a: &ImageRecord, b: &ImageRecord| {
                reverse_numeric(a.identity(), b.identity())
            })
        }
    }
}

/// Reverse-numeric comparison of two base names.
///
/// Numbered names compare by trailing number, descending, ties broken by
/// reverse lexicographic order. If either name lacks a trailing number the
/// pair compares reverse lexicographically.
pub fn reverse_numeric(a: &str, b: &str) -> Ordering {
    match (trailing_digits(a), trailing_digits(b)) {
        (Some(x), Some(y)) => cmp_digit_runs(y, x).then_with(|| b.cmp(a)),
        _ => b.cmp(a),
    }
}

/// Stable top-down merge sort.
///
/// [`reverse_numeric`] is not transitive across numbered and unnumbered
/// names, and `slice::sort_by` may panic on such comparators.
fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            _ => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
