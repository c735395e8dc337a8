//! Typeahead search controller shared by every screen that embeds a search box.
//!
//! The pieces are kept separate so each decision stays testable on its own:
//! [`debounce`] waits for typing to pause, [`fetcher`] issues catalog queries
//! and discards stale replies, [`selection`] moves the keyboard highlight,
//! [`dismissal`] closes the list on clicks outside the search area, and
//! [`controller`] wires them together behind the `on_*` event methods.
//!
//! Everything runs on the caller's tokio runtime; the controller itself is
//! owned by one task and never shared, so no locking is involved in its state.

pub mod controller;
pub mod debounce;
pub mod dismissal;
pub mod fetcher;
pub mod highlight;
pub mod navigation;
pub mod selection;

pub use controller::{Applied, TypeaheadController};
pub use debounce::Debouncer;
pub use dismissal::{DismissalScope, DocumentEvents, ListenerGuard, PointerTarget, RegionId};
pub use fetcher::{FetchReply, Generation, SuggestionFetcher, fetch_suggestions};
pub use highlight::{Span, highlight};
pub use navigation::{Navigator, SearchTarget};
pub use selection::{Key, KeyAction, KeyResponse, Selection, SelectionPhase};

use core_types::config::{ScreenConfig, SuggestionTarget, TypeaheadConfig};
use std::time::Duration;

/// Per-mount tuning for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadSettings {
    pub debounce: Duration,
    pub max_suggestions: usize,
    pub include_adult: bool,
    /// Whether a raw commit empties the field afterwards (screen dependent).
    pub clear_query_on_raw_commit: bool,
    pub suggestion_target: SuggestionTarget,
}

impl Default for TypeaheadSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            max_suggestions: 5,
            include_adult: false,
            clear_query_on_raw_commit: false,
            suggestion_target: SuggestionTarget::Search,
        }
    }
}

impl TypeaheadSettings {
    pub fn from_config(typeahead: &TypeaheadConfig, screen: &ScreenConfig) -> Self {
        Self {
            debounce: Duration::from_millis(typeahead.debounce_ms),
            max_suggestions: typeahead.max_suggestions,
            include_adult: typeahead.include_adult,
            clear_query_on_raw_commit: screen.clear_query_on_raw_commit,
            suggestion_target: screen.suggestion_target,
        }
    }
}
