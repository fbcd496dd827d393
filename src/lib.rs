//! # Tab Gal
//!
//! A tabbed photo gallery. Each tab is a category; a category's photos come
//! from a single directory listing, are filtered to image files, grouped by
//! base name, ordered, and shown as a grid. Clicking a photo opens a
//! lightbox that cycles through the category with wraparound.
//!
//! # Data Flow
//!
//! ```text
//! tab click ─→ GalleryState::request ─→ DirectoryLister::list
//!                                              │
//!                     Resolver::resolve_listing ←┘
//!                              │
//!              GalleryState::complete ─→ Snapshot (category + sequence)
//!                              │
//!                     RenderSink::gallery_changed
//! item click ─→ Lightbox::open(Arc<ImageSequence>, index)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `CategoryKey`, `ImageRecord`, `ImageSequence` |
//! | [`naming`] | Extension split and trailing-number helpers |
//! | [`resolve`] | Raw listing → ordered, deduplicated sequence |
//! | [`listing`] | `DirectoryLister` trait, GitHub and local listers |
//! | [`gallery`] | Active category, re-activation no-op, stale-response guard |
//! | [`lightbox`] | Closed/Open viewer state with wraparound navigation |
//! | [`session`] | Input dispatch and the `RenderSink` subscription |
//! | [`metadata`] | Filename → dimensions table |
//! | [`imaging`] | Dimension probing for local images |
//! | [`generate`] | Static HTML page per category, via Maud |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Listing Per Activation
//!
//! Switching to a tab costs exactly one lister call; switching to the tab
//! that is already active costs none. There is no cache: a later switch back
//! fetches again, so a newly uploaded photo shows up without a restart.
//!
//! ## Failures Never Reach the Renderer
//!
//! A listing error becomes a sequence according to `[gallery] on_failure`:
//! either empty, or whatever the `[metadata]` table names. The error itself
//! is logged and dropped.
//!
//! ## Shared Sequences
//!
//! The lightbox holds an `Arc` of the sequence it was opened on. When the
//! gallery commits a different sequence the lightbox closes rather than
//! pointing into a list that is no longer shown.

pub mod config;
pub mod gallery;
pub mod generate;
pub mod imaging;
pub mod lightbox;
pub mod listing;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
