//! TMDB's fixed movie-genre table.
//!
//! Search results only carry genre ids; detail responses carry names. The table keeps
//! both shapes producing the same `Genre` values.

use cinedrop_core::Genre;

const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10_751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10_402, "Music"),
    (9_648, "Mystery"),
    (10_749, "Romance"),
    (878, "Science Fiction"),
    (10_770, "TV Movie"),
    (53, "Thriller"),
    (10_752, "War"),
    (37, "Western"),
];

/// Name of a TMDB movie genre, if the id is known.
#[must_use]
pub fn genre_name(id: u32) -> Option<&'static str> {
    MOVIE_GENRES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
}

/// Resolve a genre id; unknown ids keep an empty name.
#[must_use]
pub fn genre_from_id(id: u32) -> Genre {
    Genre {
        id,
        name: genre_name(id).unwrap_or_default().to_string(),
    }
}
