//! Gallery state: the active category and its resolved image sequence.
//!
//! The committed state is a single [`Snapshot`] pairing a category with the
//! sequence resolved for it. It is replaced whole, so an observer never sees
//! a category next to a sequence that belongs to another one.
//!
//! ## Activation
//!
//! Activating a category is split in two so the fetch can happen anywhere:
//!
//! ```text
//! request(key)  ──► Activation::Pending(ticket)  ──► caller fetches listing
//!                                                         │
//! complete(ticket, listing) ◄─────────────────────────────┘
//! ```
//!
//! [`GalleryState::activate`] runs both halves against a lister in one call.
//!
//! Requesting the category that was requested last is a no-op: no ticket,
//! no fetch. Requesting any other category always fetches; sequences of
//! previously shown categories are never reused.
//!
//! ## Stale responses
//!
//! Every request bumps a generation counter and the ticket carries it. A
//! completion whose ticket is not from the latest request is discarded, so
//! a slow response for an old tab can never overwrite a newer one.

use crate::listing::{DirectoryLister, ListingError};
use crate::resolve::Resolver;
use crate::types::{CategoryKey, ImageSequence, RawListing};
use std::sync::Arc;

/// A category together with the sequence resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub category: CategoryKey,
    pub sequence: Arc<ImageSequence>,
}

/// Proof of an in-flight activation; hand it back to [`GalleryState::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    category: CategoryKey,
    generation: u64,
}

impl Ticket {
    pub fn category(&self) -> &CategoryKey {
        &self.category
    }
}

/// Outcome of [`GalleryState::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The category is already active or already being fetched.
    Unchanged,
    /// A fetch is needed for this ticket's category.
    Pending(Ticket),
}

pub struct GalleryState {
    resolver: Resolver,
    current: Option<Snapshot>,
    requested: Option<CategoryKey>,
    generation: u64,
}

impl GalleryState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            current: None,
            requested: None,
            generation: 0,
        }
    }

    /// The committed category and sequence, if any activation has completed.
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn current_category(&self) -> Option<&CategoryKey> {
        self.current.as_ref().map(|s| &s.category)
    }

    /// The committed sequence, or an empty one before the first activation.
    pub fn sequence(&self) -> Arc<ImageSequence> {
        self.current
            .as_ref()
            .map(|s| Arc::clone(&s.sequence))
            .unwrap_or_default()
    }

    /// The most recently requested category (committed or in flight).
    pub fn requested(&self) -> Option<&CategoryKey> {
        self.requested.as_ref()
    }

    /// Whether a request is waiting for its listing.
    pub fn is_loading(&self) -> bool {
        self.requested.is_some() && self.requested.as_ref() != self.current_category()
    }

    /// Start activating `category`.
    pub fn request(&mut self, category: CategoryKey) -> Activation {
        if self.requested.as_ref() == Some(&category) {
            log::debug!("category '{category}' already requested; no fetch");
            return Activation::Unchanged;
        }
        self.generation += 1;
        self.requested = Some(category.clone());
        Activation::Pending(Ticket {
            category,
            generation: self.generation,
        })
    }

    /// Finish an activation with the lister's result.
    ///
    /// Returns the new snapshot, or `None` when the ticket was superseded by a
    /// later request and the result was discarded.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        listing: Result<RawListing, ListingError>,
    ) -> Option<&Snapshot> {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale listing for '{}' (generation {} < {})",
                ticket.category,
                ticket.generation,
                self.generation
            );
            return None;
        }
        let sequence = self.resolver.resolve_listing(&ticket.category, listing);
        self.current = Some(Snapshot {
            category: ticket.category,
            sequence: Arc::new(sequence),
        });
        self.current.as_ref()
    }

    /// Request, fetch and complete in one step.
    ///
    /// Returns the sequence now current. Re-activating the requested category
    /// returns the stored sequence without calling the lister.
    pub fn activate(
        &mut self,
        category: CategoryKey,
        lister: &impl DirectoryLister,
    ) -> Arc<ImageSequence> {
        if let Activation::Pending(ticket) = self.request(category) {
            let listing = lister.list(ticket.category());
            self.complete(ticket, listing);
        }
        self.sequence()
    }
}
