//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use cinedrop_core::{Movie, TorrentCandidate};
use cinedrop_pipeline::{CandidateListing, ResolveOutcome};
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const POSTER_SIZE: &str = "w500";

pub(crate) fn render_movies(
    movies: &[Movie],
    image_base: &str,
    format: OutputFormat,
) -> CliResult<()> {
    println!("{}", movies_text(movies, image_base, format)?);
    Ok(())
}

pub(crate) fn render_movie_detail(
    movie: &Movie,
    image_base: &str,
    format: OutputFormat,
) -> CliResult<()> {
    println!("{}", movie_detail_text(movie, image_base, format)?);
    Ok(())
}

pub(crate) fn render_candidates(
    movie: &Movie,
    listing: &CandidateListing,
    format: OutputFormat,
) -> CliResult<()> {
    if listing.degraded {
        eprintln!(
            "warning: some sources were unreachable: {}",
            listing.unreachable.join(", ")
        );
    }
    println!("{}", candidates_text(movie, listing, format)?);
    Ok(())
}

pub(crate) fn render_resolution(outcome: &ResolveOutcome, format: OutputFormat) -> CliResult<()> {
    println!("{}", resolution_text(outcome, format)?);
    Ok(())
}

pub(crate) fn render_account(account: &str, format: OutputFormat) -> CliResult<()> {
    let text = match format {
        OutputFormat::Json => pretty(&json!({ "account": account }))?,
        OutputFormat::Table => format!("debrid token accepted for account '{account}'"),
    };
    println!("{text}");
    Ok(())
}

pub(crate) fn movies_text(
    movies: &[Movie],
    image_base: &str,
    format: OutputFormat,
) -> CliResult<String> {
    if format == OutputFormat::Json {
        let entries: Vec<Value> = movies
            .iter()
            .map(|movie| movie_json(movie, image_base))
            .collect();
        return pretty(&Value::Array(entries));
    }
    let mut text = format!("{:<10} {:<6} TITLE", "ID", "YEAR");
    for movie in movies {
        let _ = write!(
            text,
            "\n{:<10} {:<6} {}",
            movie.id.to_string(),
            year_label(movie),
            movie.title
        );
    }
    Ok(text)
}

pub(crate) fn movie_detail_text(
    movie: &Movie,
    image_base: &str,
    format: OutputFormat,
) -> CliResult<String> {
    if format == OutputFormat::Json {
        return pretty(&movie_json(movie, image_base));
    }
    let mut text = format!("id: {}\ntitle: {}", movie.id, movie.title);
    if let Some(date) = movie.release_date {
        let _ = write!(text, "\nreleased: {date}");
    }
    if !movie.genres.is_empty() {
        let names: Vec<&str> = movie.genres.iter().map(|genre| genre.name.as_str()).collect();
        let _ = write!(text, "\ngenres: {}", names.join(", "));
    }
    if let Some(poster) = movie.poster_url(image_base, POSTER_SIZE) {
        let _ = write!(text, "\nposter: {poster}");
    }
    if !movie.overview.is_empty() {
        let _ = write!(text, "\noverview: {}", movie.overview);
    }
    Ok(text)
}

pub(crate) fn candidates_text(
    movie: &Movie,
    listing: &CandidateListing,
    format: OutputFormat,
) -> CliResult<String> {
    if format == OutputFormat::Json {
        return pretty(&json!({
            "movie": movie,
            "candidates": listing.candidates,
            "degraded": listing.degraded,
            "unreachable": listing.unreachable,
        }));
    }
    let mut text = format!(
        "{} ({})\n{:<12} {:<12} {:<40} TITLE",
        movie.title,
        year_label(movie),
        "QUALITY",
        "SOURCE",
        "INFO HASH"
    );
    for candidate in &listing.candidates {
        let _ = write!(text, "\n{}", candidate_row(candidate));
    }
    if listing.candidates.is_empty() {
        text.push_str("\nno sources found");
    }
    Ok(text)
}

pub(crate) fn resolution_text(outcome: &ResolveOutcome, format: OutputFormat) -> CliResult<String> {
    match (outcome, format) {
        (ResolveOutcome::Links(links), OutputFormat::Json) => {
            pretty(&json!({ "status": "ready", "links": links }))
        }
        (ResolveOutcome::Cancelled { submission_id }, OutputFormat::Json) => {
            pretty(&json!({ "status": "cancelled", "submission_id": submission_id }))
        }
        (ResolveOutcome::Links(links), OutputFormat::Table) => {
            let mut text = format!("{:<28} URL", "HOST");
            for link in links {
                let _ = write!(text, "\n{:<28} {}", link.host_label, link.url);
            }
            Ok(text)
        }
        (ResolveOutcome::Cancelled { submission_id }, OutputFormat::Table) => Ok(format!(
            "cancelled; submission {submission_id} is left on the debrid service"
        )),
    }
}

fn candidate_row(candidate: &TorrentCandidate) -> String {
    format!(
        "{:<12} {:<12} {:<40} {}",
        candidate.quality().to_string(),
        candidate.source_provider_id().unwrap_or("-"),
        candidate.info_hash().as_str(),
        candidate.title()
    )
}

fn movie_json(movie: &Movie, image_base: &str) -> Value {
    json!({
        "id": movie.id,
        "title": movie.title,
        "release_date": movie.release_date,
        "overview": movie.overview,
        "poster_url": movie.poster_url(image_base, POSTER_SIZE),
        "genres": movie.genres,
    })
}

fn year_label(movie: &Movie) -> String {
    movie
        .release_year()
        .map_or_else(|| "-".to_string(), |year| year.to_string())
}

fn pretty(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}
