use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config_cache::DEFAULT_MAX_AGE_SECS;
use crate::core::images::DEMO_MOVIE_ID;
use crate::core::language::DEFAULT_LANGUAGE_FILE;
use crate::core::search::DEFAULT_QUERY;

pub const SETTINGS_FILE: &str = "settings.json";
pub const TMDB_CONFIG_FILE: &str = "config.json";

/// Where things live on disk.
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    pub download_dir: PathBuf,
    pub settings_file: PathBuf,
    pub tmdb_config_file: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "tmdbsample", "tmdbsample")
            .context("Failed to get project directories")?;
        let download_dir = env::current_dir().context("Failed to get working directory")?;
        Self::build(proj_dirs.config_dir().to_path_buf(), download_dir)
    }

    /// Keeps settings, cached configuration and downloads under `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::build(dir.to_path_buf(), dir.to_path_buf())
    }

    fn build(config_dir: PathBuf, download_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {:?}", config_dir))?;
        info!("Config: using {:?}", config_dir);
        Ok(Config {
            settings_file: config_dir.join(SETTINGS_FILE),
            tmdb_config_file: config_dir.join(TMDB_CONFIG_FILE),
            config_dir,
            download_dir,
        })
    }

    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    pub fn language_file(&self, settings: &Settings) -> PathBuf {
        self.config_dir.join(&settings.language_file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub last_language: String,
    /// How many search hits are printed.
    pub results_shown: usize,
    pub max_config_age_secs: i64,
    pub demo_movie_id: i64,
    pub default_query: String,
    pub language_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            last_language: "English".to_string(),
            results_shown: 1,
            max_config_age_secs: DEFAULT_MAX_AGE_SECS,
            demo_movie_id: DEMO_MOVIE_ID,
            default_query: DEFAULT_QUERY.to_string(),
            language_file: DEFAULT_LANGUAGE_FILE.to_string(),
        }
    }
}

impl Settings {
    /// Missing or unreadable settings give the defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Settings>(&raw) {
                Ok(settings) => {
                    info!("Settings: loaded {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Settings: failed to parse {:?} ({}), using defaults", path, e);
                    Settings::default()
                }
            },
            Err(_) => {
                info!("Settings: no {:?}, using defaults", path);
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))
    }
}
