use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Global TMDb configuration, the part of it the image helpers need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub change_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub secure_base_url: String,
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    #[serde(default)]
    pub logo_sizes: Vec<String>,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    #[serde(default)]
    pub profile_sizes: Vec<String>,
    #[serde(default)]
    pub still_sizes: Vec<String>,
}

impl ImagesConfig {
    /// Builds the address of `file_path` at resolution `size`.
    ///
    /// The secure base URL is preferred; the plain one is only used when the
    /// service did not send a secure variant.
    pub fn image_url(&self, size: &str, file_path: &str) -> String {
        let base = if self.secure_base_url.is_empty() {
            &self.base_url
        } else {
            &self.secure_base_url
        };
        format!("{}{}{}", base, size, file_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchContainer<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    // TMDb sends "" for unknown dates, so this stays a string
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
}

impl SearchMovie {
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub images: Option<Images>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub backdrops: Vec<ImageData>,
    #[serde(default)]
    pub posters: Vec<ImageData>,
    #[serde(default)]
    pub logos: Vec<ImageData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub aspect_ratio: Option<f64>,
    pub iso_639_1: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u32>,
}
