//! Input dispatch between the user, the gallery state and the renderer.
//!
//! A [`Session`] owns the [`GalleryState`], the [`Lightbox`], a lister and a
//! [`RenderSink`]. Input arrives as [`Input`] messages (tab clicks, item
//! clicks, lightbox buttons, keys); the session applies them to the state
//! objects and tells the sink what changed. The sink never reads state on its
//! own; everything it needs comes with the notification.
//!
//! Ordering guarantees towards the sink:
//!
//! - A tab switch hides the lightbox *before* the new gallery is announced.
//! - `lightbox_shown` carries the selection that is now current, for every
//!   open and every index change.
//! - Stale tab results produce no notification at all.

use crate::gallery::{Activation, GalleryState, Snapshot, Ticket};
use crate::lightbox::{Lightbox, Selection};
use crate::listing::{DirectoryLister, ListingError};
use crate::resolve::Resolver;
use crate::types::{CategoryKey, RawListing};

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name (`"Escape"`, `"ArrowLeft"`, ...) to a key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    SelectTab(CategoryKey),
    SelectItem(usize),
    Close,
    Next,
    Prev,
    Key(Key),
}

/// Receives state changes to draw. Implemented by whatever renders.
pub trait RenderSink {
    /// A new sequence is current for `snapshot.category`.
    fn gallery_changed(&mut self, snapshot: &Snapshot);

    /// The lightbox opened or moved; draw `selection.record()`.
    fn lightbox_shown(&mut self, selection: &Selection);

    /// The lightbox closed; drop any reference to the image it showed.
    fn lightbox_hidden(&mut self);

    /// A tab switch started fetching.
    fn loading(&mut self, _category: &CategoryKey) {}
}

pub struct Session<L, S> {
    gallery: GalleryState,
    lightbox: Lightbox,
    lister: L,
    sink: S,
}

impl<L: DirectoryLister, S: RenderSink> Session<L, S> {
    pub fn new(resolver: Resolver, lister: L, sink: S) -> Self {
        Self {
            gallery: GalleryState::new(resolver),
            lightbox: Lightbox::new(),
            lister,
            sink,
        }
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Apply one input. Returns whether anything visible changed.
    pub fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::SelectTab(category) => match self.request_tab(category) {
                Activation::Unchanged => false,
                Activation::Pending(ticket) => {
                    let listing = self.lister.list(ticket.category());
                    self.finish_tab(ticket, listing)
                }
            },
            Input::SelectItem(index) => {
                let sequence = self.gallery.sequence();
                self.lightbox.open(sequence, index) && self.announce_selection()
            }
            Input::Close => self.close_lightbox(),
            Input::Next => self.lightbox.next().is_some() && self.announce_selection(),
            Input::Prev => self.lightbox.prev().is_some() && self.announce_selection(),
            Input::Key(key) => {
                if !self.lightbox.is_open() {
                    return false;
                }
                match key {
                    Key::Escape => self.handle(Input::Close),
                    Key::ArrowRight => self.handle(Input::Next),
                    Key::ArrowLeft => self.handle(Input::Prev),
                    Key::Other(_) => false,
                }
            }
        }
    }

    /// First half of a tab switch, for callers that fetch on their own.
    ///
    /// Closes the lightbox when a fetch is needed.
    pub fn request_tab(&mut self, category: CategoryKey) -> Activation {
        let activation = self.gallery.request(category);
        if let Activation::Pending(ticket) = &activation {
            self.close_lightbox();
            self.sink.loading(ticket.category());
        }
        activation
    }

    /// Second half of a tab switch. Returns `false` for superseded tickets.
    pub fn finish_tab(
        &mut self,
        ticket: Ticket,
        listing: Result<RawListing, ListingError>,
    ) -> bool {
        let Some(snapshot) = self.gallery.complete(ticket, listing).cloned() else {
            return false;
        };
        if self.lightbox.detach_unless(&snapshot.sequence) {
            self.sink.lightbox_hidden();
        }
        self.sink.gallery_changed(&snapshot);
        true
    }

    fn close_lightbox(&mut self) -> bool {
        let closed = self.lightbox.close();
        if closed {
            self.sink.lightbox_hidden();
        }
        closed
    }

    fn announce_selection(&mut self) -> bool {
        match self.lightbox.selection() {
            Some(selection) => {
                self.sink.lightbox_shown(selection);
                true
            }
            None => false,
        }
    }
}
