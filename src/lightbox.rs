//! Lightbox state machine.
//!
//! ```text
//!            open(seq, i)                next / prev
//!  Closed ───────────────► Open{seq, i} ◄──────────┐
//!    ▲                         │   └──────────────┘
//!    └──────── close ──────────┘
//! ```
//!
//! Navigation wraps in both directions. Anything that would leave the index
//! out of range (empty sequence, bad index, navigating while closed) is a
//! no-op, never an error: input can race with tab switches.
//!
//! The selection holds its own `Arc` of the sequence it was opened over.
//! Closing drops it, so nothing keeps a replaced sequence alive.

use crate::types::{ImageRecord, ImageSequence};
use std::sync::Arc;

/// What the lightbox is showing while open.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    sequence: Arc<ImageSequence>,
    index: usize,
}

impl Selection {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence(&self) -> &Arc<ImageSequence> {
        &self.sequence
    }

    /// The record on display. Always present: the index is kept in range.
    pub fn record(&self) -> &ImageRecord {
        &self.sequence[self.index]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Lightbox {
    #[default]
    Closed,
    Open(Selection),
}

impl Lightbox {
    pub fn new() -> Self {
        Self::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open(_))
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Lightbox::Open(selection) => Some(selection),
            Lightbox::Closed => None,
        }
    }

    /// Open over `sequence` at `index`. Returns whether the lightbox opened.
    ///
    /// An empty sequence or out-of-range index leaves the state untouched.
    pub fn open(&mut self, sequence: Arc<ImageSequence>, index: usize) -> bool {
        if index >= sequence.len() {
            return false;
        }
        *self = Lightbox::Open(Selection { sequence, index });
        true
    }

    /// Close. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        matches!(std::mem::take(self), Lightbox::Open(_))
    }

    /// Advance one image, wrapping from last to first.
    pub fn next(&mut self) -> Option<usize> {
        self.step(|index, len| (index + 1) % len)
    }

    /// Go back one image, wrapping from first to last.
    pub fn prev(&mut self) -> Option<usize> {
        self.step(|index, len| (index + len - 1) % len)
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) -> Option<usize> {
        let Lightbox::Open(selection) = self else {
            return None;
        };
        selection.index = advance(selection.index, selection.sequence.len());
        Some(selection.index)
    }

    /// Close if open over anything other than `sequence`.
    ///
    /// Called when the gallery replaces its sequence so no selection outlives
    /// the sequence it indexes. Returns whether it closed.
    pub fn detach_unless(&mut self, sequence: &Arc<ImageSequence>) -> bool {
        let foreign = matches!(
            self,
            Lightbox::Open(selection) if !Arc::ptr_eq(&selection.sequence, sequence)
        );
        foreign && self.close()
    }
}
