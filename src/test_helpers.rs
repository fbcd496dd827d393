//! Shared test utilities: a scripted lister and ready-made resolvers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let lister = ScriptedLister::new()
//!     .with("sport", &["b.jpg", "a.jpg"])
//!     .failing("travel", ListingError::Api { status: 404 });
//! let mut state = GalleryState::new(single_resolver());
//! state.activate(CategoryKey::new("sport"), &lister);
//! assert_eq!(lister.calls(), vec!["sport"]);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use crate::listing::{DirectoryLister, ListingError};
use crate::metadata::MetadataMap;
use crate::resolve::{FailurePolicy, ResolveMode, ResolvePolicy, Resolver, SortPolicy};
use crate::types::{CategoryKey, ImageSequence, RawListing};

// =========================================================================
// Scripted lister
// =========================================================================

/// Answers from a fixed script and records every category it was asked for.
///
/// Unscripted categories fail with a 404.
#[derive(Default)]
pub struct ScriptedLister {
    responses: HashMap<String, Result<RawListing, ListingError>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: &str, files: &[&str]) -> Self {
        let files = files.iter().map(|f| f.to_string()).collect();
        self.responses.insert(category.to_string(), Ok(files));
        self
    }

    pub fn failing(mut self, category: &str, error: ListingError) -> Self {
        self.responses.insert(category.to_string(), Err(error));
        self
    }

    /// Categories listed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DirectoryLister for ScriptedLister {
    fn list(&self, category: &CategoryKey) -> Result<RawListing, ListingError> {
        self.calls.borrow_mut().push(category.to_string());
        self.responses
            .get(category.as_str())
            .cloned()
            .unwrap_or(Err(ListingError::Api { status: 404 }))
    }
}

// =========================================================================
// Resolvers and sequences
// =========================================================================

fn extensions(with_avif: bool) -> BTreeSet<String> {
    let mut exts: BTreeSet<String> = ["jpg", "jpeg", "png", "gif", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if with_avif {
        exts.insert("avif".to_string());
    }
    exts
}

/// Single-file mode, ascending, empty on failure.
pub fn single_resolver() -> Resolver {
    Resolver::new(
        ResolvePolicy {
            mode: ResolveMode::Single,
            extensions: extensions(false),
            sort: SortPolicy::Ascending,
            on_failure: FailurePolicy::Empty,
        },
        MetadataMap::new(),
    )
}

/// Grouped mode with AVIF, ascending, empty on failure.
pub fn grouped_resolver() -> Resolver {
    Resolver::new(
        ResolvePolicy {
            mode: ResolveMode::Grouped,
            extensions: extensions(true),
            sort: SortPolicy::Ascending,
            on_failure: FailurePolicy::Empty,
        },
        MetadataMap::new(),
    )
}

/// A single-file sequence of the given names (sorted by the resolver).
pub fn single_sequence(files: &[&str]) -> ImageSequence {
    let listing: Vec<String> = files.iter().map(|f| f.to_string()).collect();
    single_resolver().resolve(&listing)
}
