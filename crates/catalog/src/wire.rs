//! JSON shapes of the remote service. Every field is lenient; items without an
//! id or a title are dropped because nothing can be committed from them.

use core_serialization::{lenient, lenient_string, lenient_vec};
use core_types::{Genre, GenreId, MovieId, MovieSummary};
use serde::Deserialize;

use crate::SearchPage;

#[derive(Debug, Deserialize)]
pub(crate) struct WireMovie {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<MovieId>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    original_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    vote_average: Option<f32>,
    #[serde(default, deserialize_with = "lenient_string")]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    overview: Option<String>,
}

impl WireMovie {
    pub(crate) fn into_summary(self) -> Option<MovieSummary> {
        let id = self.id?;
        let title = self.title.or(self.original_title)?;
        Some(MovieSummary {
            id,
            title,
            poster_path: self.poster_path,
            rating: self.vote_average,
            release_date: self.release_date,
            overview: self.overview,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePage {
    #[serde(default, deserialize_with = "lenient")]
    page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_vec")]
    results: Vec<WireMovie>,
    #[serde(default, deserialize_with = "lenient")]
    total_results: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    total_pages: Option<u32>,
}

impl From<WirePage> for SearchPage {
    fn from(value: WirePage) -> Self {
        let results: Vec<MovieSummary> = value
            .results
            .into_iter()
            .filter_map(WireMovie::into_summary)
            .collect();
        Self {
            page: value.page.unwrap_or(1),
            total_results: value.total_results.unwrap_or(results.len() as u64),
            total_pages: value.total_pages.unwrap_or(1),
            results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireGenre {
    id: GenreId,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGenres {
    #[serde(default, deserialize_with = "lenient_vec")]
    genres: Vec<WireGenre>,
}

impl From<WireGenres> for Vec<Genre> {
    fn from(value: WireGenres) -> Self {
        value
            .genres
            .into_iter()
            .map(|g| Genre {
                id: g.id,
                name: g.name,
            })
            .collect()
    }
}
