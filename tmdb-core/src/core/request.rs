use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::core::models::{Movie, SearchContainer, SearchMovie, TmdbConfig};

pub const API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// The remote movie database, as far as this crate needs it.
pub trait MovieDb {
    fn search_movie(&self, query: &str) -> Result<SearchContainer<SearchMovie>>;

    /// Fetches a movie with its image lists appended.
    fn get_movie_with_images(&self, movie_id: i64) -> Result<Movie>;

    fn get_config(&self) -> Result<TmdbConfig>;

    fn get_image_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking TMDb v3 client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(anyhow!(
                "no TMDb API key configured (use --api-key, TMDB_API_KEY or settings.json)"
            ));
        }
        Ok(Self {
            api_key,
            base_url: API_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("get_json: GET {}", url);
        let mut request = attohttpc::get(&url).param("api_key", &self.api_key);
        for (key, value) in params {
            request = request.param(*key, *value);
        }
        let response = request
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;
        if !response.is_success() {
            return Err(anyhow!("{} answered with HTTP {}", url, response.status()));
        }
        let text = response.text()?;
        serde_json::from_str(&text).with_context(|| format!("Unexpected payload from {}", url))
    }
}

impl MovieDb for TmdbClient {
    fn search_movie(&self, query: &str) -> Result<SearchContainer<SearchMovie>> {
        info!("search_movie: query '{}'", query);
        self.get_json("/search/movie", &[("query", query), ("page", "1")])
    }

    fn get_movie_with_images(&self, movie_id: i64) -> Result<Movie> {
        info!("get_movie_with_images: movie {}", movie_id);
        self.get_json(
            &format!("/movie/{}", movie_id),
            &[
                ("append_to_response", "images"),
                ("include_image_language", "en,null"),
            ],
        )
    }

    fn get_config(&self) -> Result<TmdbConfig> {
        info!("get_config: fetching remote configuration");
        self.get_json("/configuration", &[])
    }

    fn get_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        info!("get_image_bytes: GET {}", url);
        let response = attohttpc::get(url)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;
        if !response.is_success() {
            return Err(anyhow!("{} answered with HTTP {}", url, response.status()));
        }
        Ok(response.bytes()?)
    }
}
