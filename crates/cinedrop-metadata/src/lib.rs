//! Movie metadata adapter backed by TMDB.
//!
//! Layout: `client.rs` (HTTP client and trait impl), `models.rs` (wire shapes and
//! normalisation), `genres.rs` (fixed genre table).

pub mod client;
pub mod genres;
mod models;

pub use client::{SERVICE, TmdbClient};
pub use genres::{genre_from_id, genre_name};
