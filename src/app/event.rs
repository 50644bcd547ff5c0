use crate::store::{StoreKind, StoreOperation};
use crate::style::StyleDocument;
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// The store worker picked the store for this session
    StoreSelected {
        kind: StoreKind,
    },

    /// Startup load of the most recently saved style finished
    LatestStyleLoaded {
        style: StyleDocument,
    },

    /// Reset finished purging and produced the default style
    DefaultStyleLoaded {
        style: StyleDocument,
    },

    /// A save finished; `style` is the value as stored and `revision` the
    /// one carried by the request
    StyleSaved {
        style: StyleDocument,
        adopt: bool,
        revision: u64,
    },

    /// A store call failed after its retry
    StoreFailed {
        operation: StoreOperation,
        error: String,
    },

    /// Tick for UI refresh
    Tick,
}
