use anyhow::Result;
use log::info;

use crate::core::models::{SearchContainer, SearchMovie};
use crate::core::request::MovieDb;

pub const DEFAULT_QUERY: &str = "Predator";

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: String,
    pub results: SearchContainer<SearchMovie>,
}

/// Blank input falls back to `default_query`.
pub fn effective_query<'a>(input: &'a str, default_query: &'a str) -> &'a str {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default_query
    } else {
        trimmed
    }
}

pub fn search<C: MovieDb + ?Sized>(
    client: &C,
    input: &str,
    default_query: &str,
) -> Result<SearchOutcome> {
    let query = effective_query(input, default_query);
    let results = client.search_movie(query)?;
    info!(
        "search: '{}' gave {} results over {} pages",
        query, results.total_results, results.total_pages
    );
    Ok(SearchOutcome {
        query: query.to_string(),
        results,
    })
}

pub fn format_results(outcome: &SearchOutcome, shown: usize) -> String {
    let mut text = format!(
        "Searched for movies: '{}', found {} results in {} pages\n",
        outcome.query, outcome.results.total_results, outcome.results.total_pages
    );
    for movie in outcome.results.results.iter().take(shown) {
        text.push_str(&format_movie(movie));
    }
    text
}

fn format_movie(movie: &SearchMovie) -> String {
    let release_date = movie
        .release_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let mut text = format!("{}: {}\n", movie.id, movie.title);
    text.push_str(&format!("\t Original Title: {}\n", movie.original_title));
    text.push_str(&format!("\t Release date  : {}\n", release_date));
    text.push_str(&format!("\t Popularity    : {}\n", movie.popularity));
    text.push_str(&format!("\t Vote Average  : {}\n", movie.vote_average));
    text.push_str(&format!("\t Vote Count    : {}\n", movie.vote_count));
    text.push_str(&format!(
        "\t Backdrop Path : {}\n",
        movie.backdrop_path.as_deref().unwrap_or_default()
    ));
    text.push_str(&format!(
        "\t Poster Path   : {}\n",
        movie.poster_path.as_deref().unwrap_or_default()
    ));
    text
}
