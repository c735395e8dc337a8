//! Core identifiers and shared lightweight types for MovieHub.
//!
//! These types intentionally avoid heavy dependencies so the catalog client,
//! the typeahead core and the application shell can all share them.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type MovieId = u64;
pub type GenreId = u32;

/// One catalog entry as returned by list endpoints (search, popular, discover...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub rating: Option<f32>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

/// Immutable candidate shown in the typeahead list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub rating: Option<f32>,
}

impl Suggestion {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            rating: None,
        }
    }

    /// Full poster URL under `image_base` (e.g. `https://image.tmdb.org/t/p/w92`).
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path.as_deref().map(|path| {
            let base = image_base.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        })
    }
}

impl From<MovieSummary> for Suggestion {
    fn from(value: MovieSummary) -> Self {
        Self {
            id: value.id,
            title: value.title,
            poster_path: value.poster_path,
            rating: value.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Key for one landing-page row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryKey {
    Popular,
    NowPlaying,
    Upcoming,
    Genre(GenreId),
}

impl CategoryKey {
    /// The fixed rows shown above the per-genre rows.
    pub const LANDING: [CategoryKey; 3] = [
        CategoryKey::Popular,
        CategoryKey::NowPlaying,
        CategoryKey::Upcoming,
    ];
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Popular => f.write_str("popular"),
            CategoryKey::NowPlaying => f.write_str("now_playing"),
            CategoryKey::Upcoming => f.write_str("upcoming"),
            CategoryKey::Genre(id) => write!(f, "genre-{id}"),
        }
    }
}

pub mod config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_url_joins_without_double_slash() {
        let mut s = Suggestion::new(1, "Batman");
        assert_eq!(s.poster_url("https://image.tmdb.org/t/p/w92/"), None);

        s.poster_path = Some("/abc.jpg".into());
        assert_eq!(
            s.poster_url("https://image.tmdb.org/t/p/w92/").as_deref(),
            Some("https://image.tmdb.org/t/p/w92/abc.jpg")
        );
    }

    #[test]
    fn suggestion_keeps_summary_fields() {
        let summary = MovieSummary {
            id: 272,
            title: "Batman Begins".into(),
            poster_path: Some("/p.jpg".into()),
            rating: Some(7.7),
            release_date: Some("2005-06-10".into()),
            overview: None,
        };
        let s = Suggestion::from(summary);
        assert_eq!(s.id, 272);
        assert_eq!(s.title, "Batman Begins");
        assert_eq!(s.rating, Some(7.7));
    }

    #[test]
    fn category_keys_order_landing_rows_before_genres() {
        let mut keys = vec![
            CategoryKey::Genre(28),
            CategoryKey::Upcoming,
            CategoryKey::Popular,
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CategoryKey::Popular,
                CategoryKey::Upcoming,
                CategoryKey::Genre(28)
            ]
        );
        assert_eq!(CategoryKey::Genre(28).to_string(), "genre-28");
    }
}
