//! Landing-page preload: one catalog request per category row, fanned out
//! with a bounded number in flight.

use catalog::{Catalog, CatalogError};
use core_types::config::PreloadConfig;
use core_types::{CategoryKey, Genre, MovieSummary};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub type CategoryRows = BTreeMap<CategoryKey, Vec<MovieSummary>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadOptions {
    /// Maximum requests in flight; zero is treated as one.
    pub concurrency: usize,
    /// Extra attempts per category after the first failure.
    pub retries: u32,
}

impl From<usize> for PreloadOptions {
    fn from(concurrency: usize) -> Self {
        Self {
            concurrency,
            retries: 0,
        }
    }
}

impl From<&PreloadConfig> for PreloadOptions {
    fn from(cfg: &PreloadConfig) -> Self {
        Self {
            concurrency: cfg.concurrency,
            retries: cfg.retries,
        }
    }
}

/// Everything the landing page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Landing {
    pub genres: Vec<Genre>,
    pub rows: CategoryRows,
}

/// Fetch the first page of every category in `keys`.
///
/// Rows are keyed by category regardless of completion order. A category that
/// still fails after its retries maps to an empty row.
pub async fn preload_categories<C>(
    catalog: &C,
    keys: impl IntoIterator<Item = CategoryKey>,
    options: impl Into<PreloadOptions>,
) -> CategoryRows
where
    C: Catalog,
{
    let options = options.into();
    let keys: BTreeSet<CategoryKey> = keys.into_iter().collect();
    let started = Instant::now();
    let requested = keys.len();

    let rows: CategoryRows = stream::iter(keys)
        .map(|key| async move { (key, fetch_row(catalog, key, options.retries).await) })
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    info!(
        categories = requested,
        empty = rows.values().filter(|r| r.is_empty()).count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "category preload finished"
    );
    rows
}

/// Load the genre list, then every fixed row plus one row per genre.
pub async fn preload_landing<C>(catalog: &C, options: impl Into<PreloadOptions>) -> Landing
where
    C: Catalog,
{
    let genres = match catalog.genres().await {
        Ok(genres) => genres,
        Err(err) => {
            warn!(error = %err, "genre list unavailable; preloading fixed rows only");
            Vec::new()
        }
    };
    let keys = CategoryKey::LANDING
        .into_iter()
        .chain(genres.iter().map(|g| CategoryKey::Genre(g.id)));
    let rows = preload_categories(catalog, keys, options).await;
    Landing { genres, rows }
}

async fn fetch_row<C>(catalog: &C, key: CategoryKey, retries: u32) -> Vec<MovieSummary>
where
    C: Catalog,
{
    let mut last: Option<CatalogError> = None;
    for attempt in 0..=retries {
        match catalog.category(key, 1).await {
            Ok(page) => {
                debug!(category = %key, items = page.results.len(), attempt, "row loaded");
                return page.results;
            }
            Err(err) => {
                debug!(category = %key, attempt, error = %err, "row request failed");
                last = Some(err);
            }
        }
    }
    if let Some(err) = last {
        warn!(category = %key, error = %err, "row unavailable; showing it empty");
    }
    Vec::new()
}
