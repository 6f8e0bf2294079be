//! Wire shapes returned by the TMDB v3 API and their mapping into [`Movie`].

use chrono::NaiveDate;
use cinedrop_core::{Genre, Movie, MovieId};
use serde::Deserialize;
use tracing::debug;

use crate::genres::genre_from_id;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub(crate) results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovieSummary {
    id: u64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovieDetails {
    id: u64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    genres: Vec<GenreEntry>,
}

#[derive(Debug, Deserialize)]
struct GenreEntry {
    id: u32,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) status_message: Option<String>,
}

impl From<MovieSummary> for Movie {
    fn from(summary: MovieSummary) -> Self {
        Self {
            id: MovieId(summary.id),
            release_date: parse_release_date(summary.release_date.as_deref()),
            title: summary.title,
            overview: summary.overview.unwrap_or_default(),
            poster_ref: non_empty(summary.poster_path),
            genres: summary.genre_ids.into_iter().map(genre_from_id).collect(),
        }
    }
}

impl From<MovieDetails> for Movie {
    fn from(details: MovieDetails) -> Self {
        Self {
            id: MovieId(details.id),
            release_date: parse_release_date(details.release_date.as_deref()),
            title: details.title,
            overview: details.overview.unwrap_or_default(),
            poster_ref: non_empty(details.poster_path),
            genres: details
                .genres
                .into_iter()
                .map(|entry| Genre {
                    id: entry.id,
                    name: entry.name,
                })
                .collect(),
        }
    }
}

fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            debug!(value = raw, error = %err, "ignoring unparseable release date");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_release_date_maps_to_none() {
        assert_eq!(parse_release_date(Some("")), None);
        assert_eq!(parse_release_date(Some("  ")), None);
        assert_eq!(parse_release_date(None), None);
        assert_eq!(parse_release_date(Some("2010-07")), None);
        assert_eq!(
            parse_release_date(Some("2010-07-15")),
            NaiveDate::from_ymd_opt(2010, 7, 15)
        );
    }

    #[test]
    fn summary_names_genre_ids() {
        let summary = MovieSummary {
            id: 27_205,
            title: "Inception".to_string(),
            release_date: Some("2010-07-15".to_string()),
            overview: None,
            poster_path: Some(String::new()),
            genre_ids: vec![28, 878, 1],
        };
        let movie = Movie::from(summary);
        assert_eq!(movie.id, MovieId(27_205));
        assert_eq!(movie.release_year(), Some(2010));
        assert!(movie.overview.is_empty());
        assert!(movie.poster_ref.is_none());
        let names: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Science Fiction", ""]);
    }
}
