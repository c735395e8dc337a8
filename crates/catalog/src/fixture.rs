//! In-memory catalog used by `--offline` runs and by tests.
//!
//! Besides serving data it records every search it receives and can be told to
//! delay or fail specific queries, which is how the typeahead tests provoke
//! out-of-order replies.

use crate::{Catalog, CatalogError, SearchPage, SearchQuery};
use core_types::{CategoryKey, Genre, GenreId, MovieSummary};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone)]
struct FixtureEntry {
    movie: MovieSummary,
    genres: Vec<GenreId>,
    adult: bool,
}

#[derive(Debug, Default)]
struct Behaviour {
    latency: Duration,
    per_query_latency: HashMap<String, Duration>,
    failing_queries: HashSet<String>,
    fail_everything: bool,
}

#[derive(Debug, Default)]
pub struct FixtureCatalog {
    entries: Vec<FixtureEntry>,
    genres: Vec<Genre>,
    behaviour: Mutex<Behaviour>,
    searches: Mutex<Vec<SearchQuery>>,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, movie: MovieSummary, genres: &[GenreId]) -> Self {
        self.entries.push(FixtureEntry {
            movie,
            genres: genres.to_vec(),
            adult: false,
        });
        self
    }

    pub fn with_adult_movie(mut self, movie: MovieSummary, genres: &[GenreId]) -> Self {
        self.entries.push(FixtureEntry {
            movie,
            genres: genres.to_vec(),
            adult: true,
        });
        self
    }

    /// Shorthand for a movie with only an id and a title.
    pub fn with_title(self, id: u64, title: &str) -> Self {
        self.with_movie(summary(id, title, None, None), &[])
    }

    pub fn with_genre(mut self, id: GenreId, name: &str) -> Self {
        self.genres.push(Genre {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Delay applied to every call.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.behaviour.lock().latency = latency;
        self
    }

    /// Delay applied to searches for exactly `text`, replacing the global latency.
    pub fn set_query_latency(&self, text: &str, latency: Duration) {
        self.behaviour
            .lock()
            .per_query_latency
            .insert(text.to_string(), latency);
    }

    pub fn fail_query(&self, text: &str) {
        self.behaviour.lock().failing_queries.insert(text.to_string());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.behaviour.lock().fail_everything = unavailable;
    }

    /// Every search received so far, in arrival order.
    pub fn searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().clone()
    }

    /// Small built-in catalog for offline demos.
    pub fn demo() -> Self {
        let mut catalog = Self::new()
            .with_genre(28, "Action")
            .with_genre(18, "Drama")
            .with_genre(35, "Comedy")
            .with_genre(878, "Science Fiction");
        let movies: [(u64, &str, &str, f32, &str, &[GenreId]); 10] = [
            (268, "Batman", "/batman.jpg", 7.2, "1989-06-21", &[28]),
            (272, "Batman Begins", "/begins.jpg", 7.7, "2005-06-10", &[28, 18]),
            (155, "The Dark Knight", "/tdk.jpg", 8.5, "2008-07-16", &[28, 18]),
            (49026, "The Dark Knight Rises", "/tdkr.jpg", 7.8, "2012-07-16", &[28]),
            (414906, "The Batman", "/thebatman.jpg", 7.7, "2022-03-01", &[28]),
            (603, "The Matrix", "/matrix.jpg", 8.2, "1999-03-30", &[28, 878]),
            (27205, "Inception", "/inception.jpg", 8.4, "2010-07-15", &[28, 878]),
            (13, "Forrest Gump", "/gump.jpg", 8.5, "1994-06-23", &[18, 35]),
            (9806, "The Incredibles", "/incredibles.jpg", 7.7, "2004-10-27", &[28, 35]),
            (550, "Fight Club", "/fightclub.jpg", 8.4, "1999-10-15", &[18]),
        ];
        for (id, title, poster, rating, date, genres) in movies {
            let mut movie = summary(id, title, Some(poster), Some(rating));
            movie.release_date = Some(date.to_string());
            catalog = catalog.with_movie(movie, genres);
        }
        catalog
    }

    async fn simulate(&self, text: Option<&str>) -> Result<(), CatalogError> {
        let (delay, fail) = {
            let b = self.behaviour.lock();
            let delay = text
                .and_then(|t| b.per_query_latency.get(t).copied())
                .unwrap_or(b.latency);
            let fail = b.fail_everything || text.is_some_and(|t| b.failing_queries.contains(t));
            (delay, fail)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(CatalogError::Unavailable("fixture configured to fail".into()));
        }
        Ok(())
    }

    fn page_of(movies: Vec<MovieSummary>, page: u32) -> SearchPage {
        let total = movies.len();
        let page = page.max(1);
        let start = (page as usize - 1) * PAGE_SIZE;
        SearchPage {
            page,
            total_results: total as u64,
            total_pages: total.div_ceil(PAGE_SIZE).max(1) as u32,
            results: movies.into_iter().skip(start).take(PAGE_SIZE).collect(),
        }
    }
}

fn summary(id: u64, title: &str, poster: Option<&str>, rating: Option<f32>) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: poster.map(str::to_string),
        rating,
        release_date: None,
        overview: None,
    }
}

impl Catalog for FixtureCatalog {
    async fn search_movies(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError> {
        self.searches.lock().push(query.clone());
        self.simulate(Some(&query.text)).await?;

        let needle = query.text.trim().to_lowercase();
        let hits = self
            .entries
            .iter()
            .filter(|e| query.include_adult || !e.adult)
            .filter(|e| e.movie.title.to_lowercase().contains(&needle))
            .map(|e| e.movie.clone())
            .collect();
        Ok(Self::page_of(hits, query.page))
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.simulate(None).await?;
        Ok(self.genres.clone())
    }

    async fn category(&self, key: CategoryKey, page: u32) -> Result<SearchPage, CatalogError> {
        self.simulate(None).await?;

        let mut movies: Vec<MovieSummary> = self
            .entries
            .iter()
            .filter(|e| !e.adult)
            .filter(|e| match key {
                CategoryKey::Genre(id) => e.genres.contains(&id),
                _ => true,
            })
            .map(|e| e.movie.clone())
            .collect();
        match key {
            CategoryKey::Popular | CategoryKey::Genre(_) => {
                movies.sort_by(|a, b| b.rating.unwrap_or(0.0).total_cmp(&a.rating.unwrap_or(0.0)));
            }
            CategoryKey::NowPlaying => movies.sort_by(|a, b| b.release_date.cmp(&a.release_date)),
            CategoryKey::Upcoming => movies.sort_by(|a, b| a.release_date.cmp(&b.release_date)),
        }
        Ok(Self::page_of(movies, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_is_case_insensitive_and_records_calls() {
        let catalog = FixtureCatalog::demo();
        let page = catalog
            .search_movies(&SearchQuery::typeahead("BAT", false))
            .await
            .unwrap();
        let titles: Vec<_> = page.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Batman", "Batman Begins", "The Batman"]);
        assert_eq!(catalog.searches().len(), 1);
    }

    #[tokio::test]
    async fn adult_titles_need_the_flag() {
        let catalog = FixtureCatalog::new()
            .with_title(1, "Night Shift")
            .with_adult_movie(summary(2, "Night Club", None, None), &[]);

        let safe = catalog
            .search_movies(&SearchQuery::typeahead("night", false))
            .await
            .unwrap();
        assert_eq!(safe.results.len(), 1);

        let all = catalog
            .search_movies(&SearchQuery::typeahead("night", true))
            .await
            .unwrap();
        assert_eq!(all.results.len(), 2);
    }

    #[tokio::test]
    async fn failures_are_reported_as_errors() {
        let catalog = FixtureCatalog::demo();
        catalog.fail_query("bat");
        assert!(
            catalog
                .search_movies(&SearchQuery::typeahead("bat", false))
                .await
                .is_err()
        );

        catalog.set_unavailable(true);
        assert!(catalog.genres().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn per_query_latency_overrides_default() {
        let catalog = FixtureCatalog::demo().with_latency(Duration::from_millis(50));
        catalog.set_query_latency("slow", Duration::from_secs(2));

        let started = tokio::time::Instant::now();
        catalog
            .search_movies(&SearchQuery::typeahead("slow", false))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn genre_rows_only_contain_that_genre() {
        let catalog = FixtureCatalog::demo();
        let page = catalog.category(CategoryKey::Genre(878), 1).await.unwrap();
        let titles: Vec<_> = page.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Inception", "The Matrix"]);
    }
}
