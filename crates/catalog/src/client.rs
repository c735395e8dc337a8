use crate::wire::{WireGenres, WirePage};
use crate::{Catalog, CatalogError, SearchPage, SearchQuery};
use core_types::config::CatalogConfig;
use core_types::{CategoryKey, Genre};
use serde::de::DeserializeOwned;
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_RETRIES: u32 = 0;
const DEFAULT_BACKOFF_MS: u64 = 100;

/// HTTP/JSON client for a TMDB-compatible catalog service.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    request_timeout: Duration,
    retries: u32,
    backoff: Duration,
}

impl Default for TmdbClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None::<String>)
    }
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<impl Into<String>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.map(Into::into),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retries: DEFAULT_RETRIES,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }

    pub fn from_config(cfg: &CatalogConfig) -> Self {
        Self::new(cfg.base_url.clone(), cfg.api_key.clone())
            .with_language(cfg.language.clone())
            .with_request_timeout(Duration::from_millis(cfg.request_timeout_ms))
            .with_retries(cfg.retries)
            .with_backoff(Duration::from_millis(cfg.backoff_ms))
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn build_request(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Request, CatalogError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CatalogError::MissingCredential)?;
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let request = self
            .http
            .get(url)
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .query(params)
            .build()?;
        Ok(request)
    }

    async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let mut last_err: Option<CatalogError> = None;

        while attempt <= self.retries {
            let request = self.build_request(path, params)?;
            let fut = async {
                let resp = self.http.execute(request).await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status.as_u16()));
                }
                let body = resp.bytes().await?;
                Ok::<T, CatalogError>(serde_json::from_slice(&body)?)
            };

            match tokio::time::timeout(self.request_timeout, fut).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    warn!(path, attempt = attempt + 1, error = %e, "catalog request failed");
                    last_err = Some(e);
                }
                Err(_) => {
                    warn!(path, attempt = attempt + 1, "catalog request timed out");
                    last_err = Some(CatalogError::Timeout(self.request_timeout));
                }
            }

            attempt += 1;
            if attempt <= self.retries {
                sleep(self.backoff * attempt).await;
            }
        }

        Err(last_err.unwrap_or_else(|| CatalogError::Unavailable("request failed".into())))
    }
}

fn category_path(key: CategoryKey) -> (&'static str, Option<(&'static str, String)>) {
    match key {
        CategoryKey::Popular => ("movie/popular", None),
        CategoryKey::NowPlaying => ("movie/now_playing", None),
        CategoryKey::Upcoming => ("movie/upcoming", None),
        CategoryKey::Genre(id) => ("discover/movie", Some(("with_genres", id.to_string()))),
    }
}

impl Catalog for TmdbClient {
    async fn search_movies(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError> {
        debug!(text = %query.text, page = query.page, "catalog search");
        let params = [
            ("query", query.text.clone()),
            ("page", query.page.to_string()),
            ("include_adult", query.include_adult.to_string()),
        ];
        let page: WirePage = self.get_json("search/movie", &params).await?;
        Ok(page.into())
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let genres: WireGenres = self.get_json("genre/movie/list", &[]).await?;
        Ok(genres.into())
    }

    async fn category(&self, key: CategoryKey, page: u32) -> Result<SearchPage, CatalogError> {
        let (path, extra) = category_path(key);
        let mut params = vec![("page", page.to_string())];
        params.extend(extra);
        let page: WirePage = self.get_json(path, &params).await?;
        Ok(page.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new("https://catalog.test/3/", Some("secret"))
    }

    #[test]
    fn request_carries_credential_and_encoded_query() {
        let req = client()
            .build_request(
                "search/movie",
                &[
                    ("query", "a+b (2024)".into()),
                    ("page", "1".into()),
                    ("include_adult", "false".into()),
                ],
            )
            .unwrap();
        let url = req.url();
        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("api_key".into(), "secret".into())));
        assert!(pairs.contains(&("language".into(), "en-US".into())));
        assert!(pairs.contains(&("query".into(), "a+b (2024)".into())));
        assert!(pairs.contains(&("include_adult".into(), "false".into())));
    }

    #[test]
    fn missing_credential_fails_before_any_io() {
        let client = TmdbClient::new("https://catalog.test/3", None::<String>);
        let err = client.build_request("genre/movie/list", &[]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingCredential));
    }

    #[test]
    fn categories_map_to_endpoints() {
        assert_eq!(category_path(CategoryKey::Popular).0, "movie/popular");
        assert_eq!(category_path(CategoryKey::NowPlaying).0, "movie/now_playing");
        let (path, extra) = category_path(CategoryKey::Genre(28));
        assert_eq!(path, "discover/movie");
        assert_eq!(extra, Some(("with_genres", "28".to_string())));
    }

    #[test]
    fn config_values_flow_into_client() {
        let cfg = CatalogConfig {
            api_key: Some("k".into()),
            request_timeout_ms: 1234,
            retries: 3,
            ..CatalogConfig::default()
        };
        let client = TmdbClient::from_config(&cfg);
        assert_eq!(client.request_timeout, Duration::from_millis(1234));
        assert_eq!(client.retries, 3);
        assert_eq!(client.api_key.as_deref(), Some("k"));
    }

    #[tokio::test]
    async fn search_without_credential_is_an_error_not_a_panic() {
        let client = TmdbClient::default();
        let err = client
            .search_movies(&SearchQuery::typeahead("bat", false))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingCredential));
    }
}
