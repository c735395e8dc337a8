//! Remote catalog models and clients for MovieHub.
//!
//! The typeahead core only ever sees the [`Catalog`] trait. Two
//! implementations live here: [`TmdbClient`] talks HTTP/JSON to a TMDB-style
//! service, [`FixtureCatalog`] serves an in-memory list for offline runs and
//! tests.

use core_types::{CategoryKey, Genre, MovieSummary};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub mod client;
pub mod fixture;
mod wire;

pub use client::TmdbClient;
pub use fixture::FixtureCatalog;

/// Parameters of one free-text catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub page: u32,
    pub include_adult: bool,
}

impl SearchQuery {
    /// Typeahead queries always ask for the first page.
    pub fn typeahead(text: impl Into<String>, include_adult: bool) -> Self {
        Self {
            text: text.into(),
            page: 1,
            include_adult,
        }
    }
}

/// One page of list results, in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub page: u32,
    pub results: Vec<MovieSummary>,
    pub total_results: u64,
    pub total_pages: u32,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog credential missing (set MOVIEHUB_API_KEY)")]
    MissingCredential,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("catalog returned status {0}")]
    Status(u16),
    #[error("malformed catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// The external catalog collaborator.
///
/// Futures must be `Send` so callers can run them on spawned tasks.
pub trait Catalog: Send + Sync + 'static {
    fn search_movies(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchPage, CatalogError>> + Send;

    fn genres(&self) -> impl Future<Output = Result<Vec<Genre>, CatalogError>> + Send;

    fn category(
        &self,
        key: CategoryKey,
        page: u32,
    ) -> impl Future<Output = Result<SearchPage, CatalogError>> + Send;
}
