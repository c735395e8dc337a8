use crate::preload::{Landing, preload_landing};
use crate::router::RouteHistory;
use crate::screens::{Screen, ScreenProfile, SearchArea};
use catalog::{Catalog, CatalogError, FixtureCatalog, SearchPage, SearchQuery, TmdbClient};
use core_types::config::{AppConfig, CatalogConfig};
use core_types::{CategoryKey, Genre};
use std::sync::Arc;
use tracing::{info, warn};
use typeahead::DocumentEvents;

/// The catalog the shell talks to: the remote service or the built-in fixture.
#[derive(Debug)]
pub enum CatalogBackend {
    Remote(TmdbClient),
    Offline(FixtureCatalog),
}

impl CatalogBackend {
    pub fn from_config(cfg: &CatalogConfig, offline: bool) -> Self {
        if offline {
            info!("using built-in offline catalog");
            return CatalogBackend::Offline(FixtureCatalog::demo());
        }
        if cfg.api_key.as_deref().is_none_or(str::is_empty) {
            warn!("no catalog credential configured; remote requests will yield no results");
        }
        info!(base_url = %cfg.base_url, "using remote catalog");
        CatalogBackend::Remote(TmdbClient::from_config(cfg))
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, CatalogBackend::Offline(_))
    }
}

impl Catalog for CatalogBackend {
    async fn search_movies(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError> {
        match self {
            CatalogBackend::Remote(client) => client.search_movies(query).await,
            CatalogBackend::Offline(fixture) => fixture.search_movies(query).await,
        }
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        match self {
            CatalogBackend::Remote(client) => client.genres().await,
            CatalogBackend::Offline(fixture) => fixture.genres().await,
        }
    }

    async fn category(&self, key: CategoryKey, page: u32) -> Result<SearchPage, CatalogError> {
        match self {
            CatalogBackend::Remote(client) => client.category(key, page).await,
            CatalogBackend::Offline(fixture) => fixture.category(key, page).await,
        }
    }
}

/// Process-wide pieces every screen shares.
pub struct Shell {
    config: AppConfig,
    catalog: Arc<CatalogBackend>,
    events: DocumentEvents,
    history: RouteHistory,
}

impl Shell {
    pub fn new(config: AppConfig, offline: bool) -> Self {
        let catalog = Arc::new(CatalogBackend::from_config(&config.catalog, offline));
        Self {
            config,
            catalog,
            events: DocumentEvents::new(),
            history: RouteHistory::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<CatalogBackend> {
        &self.catalog
    }

    pub fn events(&self) -> &DocumentEvents {
        &self.events
    }

    pub fn history(&self) -> &RouteHistory {
        &self.history
    }

    /// Mount the search box of `screen`, wired to the shared catalog and history.
    pub fn mount(&self, screen: Screen) -> SearchArea<CatalogBackend, RouteHistory> {
        let profile = ScreenProfile::from_config(screen, &self.config);
        SearchArea::mount(
            &profile,
            Arc::clone(&self.catalog),
            self.history.clone(),
            &self.events,
        )
    }

    pub async fn preload_landing(&self) -> Landing {
        preload_landing(self.catalog.as_ref(), &self.config.preload).await
    }
}
