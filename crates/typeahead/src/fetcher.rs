use catalog::{Catalog, SearchQuery};
use core_types::Suggestion;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Monotonic tag identifying the newest fetch the controller still cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub const fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Outcome of one completed fetch, tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReply {
    pub generation: Generation,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

/// Query the catalog for `text` and keep the first `limit` items in service order.
///
/// Blank input returns an empty list without touching the catalog. Any
/// catalog error is logged and also yields an empty list; nothing is retried.
pub async fn fetch_suggestions<C>(
    catalog: &C,
    text: &str,
    include_adult: bool,
    limit: usize,
) -> Vec<Suggestion>
where
    C: Catalog,
{
    if text.trim().is_empty() {
        return Vec::new();
    }

    let query = SearchQuery::typeahead(text, include_adult);
    match catalog.search_movies(&query).await {
        Ok(page) => page
            .results
            .into_iter()
            .take(limit)
            .map(Suggestion::from)
            .collect(),
        Err(err) => {
            warn!(query = text, error = %err, "suggestion fetch failed; showing none");
            Vec::new()
        }
    }
}

/// Issues suggestion fetches and decides which replies are still current.
///
/// There is no network cancellation: a superseded fetch runs to completion
/// and its reply is simply rejected by [`SuggestionFetcher::accept`].
pub struct SuggestionFetcher<C> {
    catalog: Arc<C>,
    generation: Generation,
    limit: usize,
}

impl<C> fmt::Debug for SuggestionFetcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("generation", &self.generation)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<C: Catalog> SuggestionFetcher<C> {
    pub fn new(catalog: Arc<C>, limit: usize) -> Self {
        Self {
            catalog,
            generation: Generation::default(),
            limit,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new generation; every reply tagged with an older one becomes stale.
    pub fn advance(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    /// Spawn a fetch tagged with the current generation and hand its reply to `deliver`.
    pub fn issue<F>(&self, text: String, include_adult: bool, deliver: F) -> JoinHandle<()>
    where
        F: FnOnce(FetchReply) + Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        let generation = self.generation;
        let limit = self.limit;
        debug!(%generation, query = %text, include_adult, "issuing suggestion fetch");

        tokio::spawn(async move {
            let suggestions = fetch_suggestions(&*catalog, &text, include_adult, limit).await;
            deliver(FetchReply {
                generation,
                query: text,
                suggestions,
            });
        })
    }

    /// Returns the suggestions if `reply` belongs to the live generation.
    pub fn accept(&self, reply: FetchReply) -> Option<Vec<Suggestion>> {
        if reply.generation == self.generation {
            Some(reply.suggestions)
        } else {
            debug!(
                reply = %reply.generation,
                live = %self.generation,
                query = %reply.query,
                "dropping stale suggestion reply"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::FixtureCatalog;
    use tokio::sync::mpsc;

    fn many_bats() -> FixtureCatalog {
        (1..=8).fold(FixtureCatalog::new(), |c, i| {
            c.with_title(i, &format!("Bat Story {i}"))
        })
    }

    #[tokio::test]
    async fn blank_text_never_reaches_the_catalog() {
        let catalog = many_bats();
        assert!(fetch_suggestions(&catalog, "   ", false, 5).await.is_empty());
        assert!(catalog.searches().is_empty());
    }

    #[tokio::test]
    async fn keeps_first_five_in_service_order() {
        let catalog = many_bats();
        let got = fetch_suggestions(&catalog, "bat", true, 5).await;
        let ids: Vec<_> = got.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);

        let sent = catalog.searches();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].page, 1);
        assert!(sent[0].include_adult);
    }

    #[tokio::test]
    async fn catalog_failure_yields_empty_list() {
        let catalog = many_bats();
        catalog.fail_query("bat");
        assert!(fetch_suggestions(&catalog, "bat", false, 5).await.is_empty());
    }

    #[tokio::test]
    async fn replies_from_older_generations_are_rejected() {
        let mut fetcher = SuggestionFetcher::new(Arc::new(many_bats()), 5);
        let (tx, mut rx) = mpsc::unbounded_channel();

        fetcher.advance();
        let first_tx = tx.clone();
        fetcher
            .issue("bat".into(), false, move |r| {
                let _ = first_tx.send(r);
            })
            .await
            .unwrap();
        let first = rx.recv().await.unwrap();
        assert_eq!(first.generation, Generation(1));

        fetcher.advance();
        assert!(fetcher.accept(first).is_none());

        fetcher
            .issue("bat story 2".into(), false, move |r| {
                let _ = tx.send(r);
            })
            .await
            .unwrap();
        let second = rx.recv().await.unwrap();
        let accepted = fetcher.accept(second).unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].title, "Bat Story 2");
    }
}
