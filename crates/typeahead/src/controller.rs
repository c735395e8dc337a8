//! The orchestrator every screen mounts around its search box.
//!
//! UI events come in through the `on_*` methods and take effect immediately.
//! Timer fires, catalog replies and outside clicks arrive asynchronously on an
//! internal channel; the owner applies them one at a time with
//! [`TypeaheadController::process_next`] (or [`TypeaheadController::process_ready`]
//! from a frame loop). All state lives in this struct and is only touched by
//! whoever owns it.

use catalog::Catalog;
use core_types::Suggestion;
use core_types::config::SuggestionTarget;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

use crate::TypeaheadSettings;
use crate::debounce::Debouncer;
use crate::dismissal::{DismissalScope, DocumentEvents, RegionId};
use crate::fetcher::{FetchReply, Generation, SuggestionFetcher};
use crate::highlight::{Span, highlight};
use crate::navigation::{Navigator, SearchTarget};
use crate::selection::{Key, KeyAction, KeyResponse, Selection, SelectionPhase};

enum Internal {
    DebounceElapsed { generation: Generation, text: String },
    Fetched(FetchReply),
    Dismiss { generation: Generation },
}

/// What applying one asynchronous event did to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    FetchIssued { generation: Generation, query: String },
    SuggestionsReplaced { generation: Generation, count: usize },
    StaleReplyDropped { generation: Generation },
    StaleTimerIgnored { generation: Generation },
    Dismissed,
    /// The click predates later input: only the list it saw was closed.
    DismissedBeforeInput { generation: Generation },
}

pub struct TypeaheadController<C, N> {
    query: String,
    selection: Selection,
    fetcher: SuggestionFetcher<C>,
    debouncer: Debouncer,
    navigator: N,
    settings: TypeaheadSettings,
    tx: mpsc::UnboundedSender<Internal>,
    rx: mpsc::UnboundedReceiver<Internal>,
    scope: DismissalScope,
    /// Generation as of the last direct event, read by the pointer listener.
    live_generation: Arc<AtomicU64>,
}

impl<C, N> TypeaheadController<C, N>
where
    C: Catalog,
    N: Navigator,
{
    /// Mount a search area: registers its outside-click listener on `events`.
    ///
    /// Dropping the controller unmounts it (listener released, timer cancelled).
    pub fn mount(
        catalog: Arc<C>,
        navigator: N,
        events: &DocumentEvents,
        region: RegionId,
        settings: TypeaheadSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let dismiss_tx = tx.clone();
        let live_generation = Arc::new(AtomicU64::new(Generation::default().0));
        let seen = Arc::clone(&live_generation);
        let scope = DismissalScope::acquire(events, region, move || {
            let generation = Generation(seen.load(Ordering::Acquire));
            let _ = dismiss_tx.send(Internal::Dismiss { generation });
        });
        debug!(region = region.0, "search area mounted");

        Self {
            query: String::new(),
            selection: Selection::new(),
            fetcher: SuggestionFetcher::new(catalog, settings.max_suggestions),
            debouncer: Debouncer::new(),
            navigator,
            settings,
            tx,
            rx,
            scope,
            live_generation,
        }
    }

    pub fn on_text_changed(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.selection.reset_highlight();
        let generation = self.advance();

        if self.query.trim().is_empty() {
            self.debouncer.cancel();
            self.selection.clear();
            debug!(%generation, "query cleared; suggestions closed");
            return;
        }
        self.schedule_fetch(generation);
    }

    pub fn on_key_event(&mut self, key: Key) -> KeyResponse {
        let response = self.selection.handle_key(key);
        match &response.action {
            KeyAction::CommitSuggestion(suggestion) => {
                let suggestion = suggestion.clone();
                self.commit_suggestion(suggestion);
            }
            KeyAction::CommitRaw => self.commit_raw(),
            KeyAction::Highlighted(index) => debug!(index, "highlight moved"),
            KeyAction::Ignored => {}
        }
        response
    }

    /// A click on a list entry commits it whatever is highlighted.
    pub fn on_suggestion_clicked(&mut self, suggestion: Suggestion) {
        self.commit_suggestion(suggestion);
    }

    pub fn on_search_button_pressed(&mut self) {
        self.commit_raw();
    }

    /// Later fetches use `include_adult`; a visible query is fetched again.
    pub fn on_include_adult_changed(&mut self, include_adult: bool) {
        if self.settings.include_adult == include_adult {
            return;
        }
        self.settings.include_adult = include_adult;
        if !self.query.trim().is_empty() {
            let generation = self.advance();
            self.schedule_fetch(generation);
        }
    }

    /// Wait for the next timer fire, catalog reply or outside click and apply it.
    pub async fn process_next(&mut self) -> Option<Applied> {
        let msg = self.rx.recv().await?;
        Some(self.apply(msg))
    }

    /// Apply whatever has already arrived without waiting.
    pub fn process_ready(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            applied.push(self.apply(msg));
        }
        applied
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        self.selection.suggestions()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.index()
    }

    /// `-1` when nothing is highlighted.
    pub fn raw_index(&self) -> isize {
        self.selection.raw_index()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    pub fn include_adult(&self) -> bool {
        self.settings.include_adult
    }

    pub fn generation(&self) -> Generation {
        self.fetcher.generation()
    }

    pub fn is_fetch_scheduled(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn region(&self) -> RegionId {
        self.scope.region()
    }

    /// Display spans for each visible suggestion against the current query.
    pub fn highlighted(&self) -> Vec<Vec<Span>> {
        self.suggestions()
            .iter()
            .map(|s| highlight(&s.title, &self.query))
            .collect()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    fn schedule_fetch(&mut self, generation: Generation) {
        let tx = self.tx.clone();
        let text = self.query.clone();
        debug!(%generation, query = %text, "fetch scheduled");
        self.debouncer.schedule(self.settings.debounce, move || {
            let _ = tx.send(Internal::DebounceElapsed { generation, text });
        });
    }

    fn advance(&mut self) -> Generation {
        let generation = self.fetcher.advance();
        self.live_generation.store(generation.0, Ordering::Release);
        generation
    }

    /// Close the list and make every pending timer or reply inert.
    fn close_transient(&mut self) -> Generation {
        self.debouncer.cancel();
        self.selection.clear();
        self.advance()
    }

    fn commit_suggestion(&mut self, suggestion: Suggestion) {
        self.close_transient();
        self.query.clone_from(&suggestion.title);
        debug!(id = suggestion.id, title = %suggestion.title, "suggestion commit");

        match self.settings.suggestion_target {
            SuggestionTarget::Search => {
                let target = SearchTarget::new(suggestion.title, self.settings.include_adult);
                self.navigator.go_to_search_results(&target);
            }
            SuggestionTarget::Details => self.navigator.go_to_details(suggestion.id),
        }
    }

    fn commit_raw(&mut self) {
        self.close_transient();
        let text = self.query.trim().to_string();
        if text.is_empty() {
            debug!("raw commit with blank query ignored");
            return;
        }
        if self.settings.clear_query_on_raw_commit {
            self.query.clear();
        }
        debug!(query = %text, "raw commit");
        let target = SearchTarget::new(text, self.settings.include_adult);
        self.navigator.go_to_search_results(&target);
    }

    fn apply(&mut self, msg: Internal) -> Applied {
        match msg {
            Internal::DebounceElapsed { generation, text } => {
                if generation != self.fetcher.generation() {
                    return Applied::StaleTimerIgnored { generation };
                }
                let tx = self.tx.clone();
                self.fetcher
                    .issue(text.clone(), self.settings.include_adult, move |reply| {
                        let _ = tx.send(Internal::Fetched(reply));
                    });
                Applied::FetchIssued {
                    generation,
                    query: text,
                }
            }
            Internal::Fetched(reply) => {
                let generation = reply.generation;
                match self.fetcher.accept(reply) {
                    Some(suggestions) => {
                        let count = suggestions.len();
                        self.selection.replace(suggestions);
                        debug!(%generation, count, "suggestions replaced");
                        Applied::SuggestionsReplaced { generation, count }
                    }
                    None => Applied::StaleReplyDropped { generation },
                }
            }
            Internal::Dismiss { generation } if generation == self.fetcher.generation() => {
                let generation = self.close_transient();
                debug!(%generation, "dismissed by outside pointer-down");
                Applied::Dismissed
            }
            Internal::Dismiss { generation } => {
                // Input arrived after the click; its pending fetch stays scheduled.
                self.selection.clear();
                debug!(
                    %generation,
                    live = %self.fetcher.generation(),
                    "late dismissal closed list only"
                );
                Applied::DismissedBeforeInput { generation }
            }
        }
    }
}

impl<C, N> Drop for TypeaheadController<C, N> {
    fn drop(&mut self) {
        debug!(region = self.scope.region().0, "search area unmounted");
    }
}
