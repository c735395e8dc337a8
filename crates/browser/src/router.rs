use core_types::MovieId;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use typeahead::{Navigator, SearchTarget};
use url::Url;

/// Pages the shell can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search { query: String, include_adult: bool },
    Movie { id: MovieId },
}

impl Route {
    /// Path plus query string, e.g. `/search?query=Batman+Begins` or `/movie/272`.
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Search {
                query,
                include_adult,
            } => {
                let target = SearchTarget::new(query.as_str(), *include_adult);
                let mut path = format!("/search?query={}", target.escaped());
                if target.include_adult() {
                    path.push_str("&adult=true");
                }
                path
            }
            Route::Movie { id } => format!("/movie/{id}"),
        }
    }

    /// Inverse of [`Route::to_path`]; unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let base = Url::parse("http://moviehub.local/").ok()?;
        let url = base.join(path).ok()?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["search"] => {
                let mut query = None;
                let mut include_adult = false;
                for (key, value) in url.query_pairs() {
                    match key.as_ref() {
                        "query" => query = Some(value.into_owned()),
                        "adult" => include_adult = value == "true",
                        _ => {}
                    }
                }
                Some(Route::Search {
                    query: query?,
                    include_adult,
                })
            }
            ["movie", id] => id.parse().ok().map(|id| Route::Movie { id }),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Navigation log shared between the shell and every mounted search area.
///
/// Clones observe the same history.
#[derive(Debug, Clone, Default)]
pub struct RouteHistory {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, route: Route) {
        tracing::debug!(path = %route, "navigate");
        self.routes.lock().push(route);
    }

    pub fn current(&self) -> Route {
        self.routes.lock().last().cloned().unwrap_or(Route::Home)
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.routes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Navigator for RouteHistory {
    fn go_to_search_results(&mut self, target: &SearchTarget) {
        self.push(Route::Search {
            query: target.text().to_string(),
            include_adult: target.include_adult(),
        });
    }

    fn go_to_details(&mut self, id: MovieId) {
        self.push(Route::Movie { id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_paths_escape_the_query() {
        let route = Route::Search {
            query: "Batman Begins".into(),
            include_adult: false,
        };
        assert_eq!(route.to_path(), "/search?query=Batman+Begins");

        let adult = Route::Search {
            query: "a+b & (2024)".into(),
            include_adult: true,
        };
        assert_eq!(
            adult.to_path(),
            "/search?query=a%2Bb+%26+%282024%29&adult=true"
        );
        assert_eq!(Route::parse(&adult.to_path()), Some(adult));
    }

    #[test]
    fn search_path_matches_committed_target_escaping() {
        let target = SearchTarget::new("Tom & Jerry: 50%", false);
        let route = Route::Search {
            query: target.text().to_string(),
            include_adult: target.include_adult(),
        };
        assert_eq!(route.to_path(), format!("/search?query={}", target.escaped()));
        assert_eq!(route.to_path(), "/search?query=Tom+%26+Jerry%3A+50%25");
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/movie/272"), Some(Route::Movie { id: 272 }));
        assert_eq!(
            Route::parse("/search?query=Heat"),
            Some(Route::Search {
                query: "Heat".into(),
                include_adult: false
            })
        );
        assert_eq!(Route::parse("/movie/abc"), None);
        assert_eq!(Route::parse("/search"), None);
        assert_eq!(Route::parse("/cast"), None);
    }

    #[test]
    fn history_clones_share_entries() {
        let history = RouteHistory::new();
        let mut nav = history.clone();
        assert_eq!(history.current(), Route::Home);

        nav.go_to_search_results(&SearchTarget::new("Heat", false));
        nav.go_to_details(949);

        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), Route::Movie { id: 949 });
        assert_eq!(history.current().to_path(), "/movie/949");
    }
}
