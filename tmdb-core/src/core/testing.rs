use std::cell::{Cell, RefCell};

use anyhow::{anyhow, Result};

use crate::core::models::{
    ImageData, Images, ImagesConfig, Movie, SearchContainer, SearchMovie, TmdbConfig,
};
use crate::core::request::MovieDb;

/// In-memory stand-in for the remote service that counts what it was asked.
pub struct FakeMovieDb {
    pub config: TmdbConfig,
    pub movie: Movie,
    pub search_results: Vec<SearchMovie>,
    pub image_bytes: Vec<u8>,
    pub fail_config: bool,
    pub config_fetches: Cell<usize>,
    pub queries: RefCell<Vec<String>>,
    pub downloaded_urls: RefCell<Vec<String>>,
}

impl Default for FakeMovieDb {
    fn default() -> Self {
        Self {
            config: sample_config(),
            movie: sample_movie(),
            search_results: vec![sample_search_movie()],
            image_bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3],
            fail_config: false,
            config_fetches: Cell::new(0),
            queries: RefCell::new(Vec::new()),
            downloaded_urls: RefCell::new(Vec::new()),
        }
    }
}

impl MovieDb for FakeMovieDb {
    fn search_movie(&self, query: &str) -> Result<SearchContainer<SearchMovie>> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(SearchContainer {
            page: 1,
            results: self.search_results.clone(),
            total_pages: 1,
            total_results: self.search_results.len() as u32,
        })
    }

    fn get_movie_with_images(&self, _movie_id: i64) -> Result<Movie> {
        Ok(self.movie.clone())
    }

    fn get_config(&self) -> Result<TmdbConfig> {
        self.config_fetches.set(self.config_fetches.get() + 1);
        if self.fail_config {
            return Err(anyhow!("configuration endpoint unreachable"));
        }
        Ok(self.config.clone())
    }

    fn get_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.downloaded_urls.borrow_mut().push(url.to_string());
        Ok(self.image_bytes.clone())
    }
}

pub fn sample_config() -> TmdbConfig {
    let sizes = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    TmdbConfig {
        images: ImagesConfig {
            base_url: "http://image.tmdb.org/t/p/".to_string(),
            secure_base_url: "https://image.tmdb.org/t/p/".to_string(),
            backdrop_sizes: sizes(&["w300", "w780", "w1280", "original"]),
            logo_sizes: sizes(&["w45", "w92", "original"]),
            poster_sizes: sizes(&["w92", "w500", "original"]),
            profile_sizes: sizes(&["w45", "original"]),
            still_sizes: sizes(&["w92", "original"]),
        },
        change_keys: sizes(&["images", "title"]),
    }
}

pub fn image(file_path: &str) -> ImageData {
    ImageData {
        file_path: file_path.to_string(),
        width: 1920,
        height: 1080,
        ..Default::default()
    }
}

pub fn sample_movie() -> Movie {
    Movie {
        id: 76338,
        title: "Thor: The Dark World".to_string(),
        images: Some(Images {
            backdrops: vec![
                image("/b1.jpg"),
                image("/b2.jpg"),
                image("/b3.jpg"),
                image("/b4.jpg"),
            ],
            posters: vec![image("/p1.jpg")],
            logos: Vec::new(),
        }),
    }
}

pub fn sample_search_movie() -> SearchMovie {
    SearchMovie {
        id: 106,
        title: "Predator".to_string(),
        original_title: "Predator".to_string(),
        release_date: Some("1987-06-12".to_string()),
        popularity: 41.5,
        vote_average: 7.5,
        vote_count: 7000,
        backdrop_path: Some("/bd.jpg".to_string()),
        poster_path: Some("/pp.jpg".to_string()),
    }
}
