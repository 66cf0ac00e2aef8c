use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use crate::core::browse::BrowseState;
use crate::core::config_cache::{ConfigCache, ConfigSource};
use crate::core::images::{download_first, format_resolved, load_images, resolve_urls, ImageKind};
use crate::core::language::{Language, LanguageTable};
use crate::core::models::TmdbConfig;
use crate::core::request::MovieDb;
use crate::core::search::{format_results, search};
use crate::core::storage::{Config, Settings};

/// Text accumulated by one "get movie" run.
#[derive(Debug, Default)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    pub fn push(&mut self, block: &str) {
        self.text.push_str(block);
    }

    pub fn spacer(&mut self) {
        self.text.push_str("\n ----- \n\n");
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Everything the presentation layer reads and mutates, in one place.
pub struct MovieSession<C: MovieDb> {
    client: C,
    config: Config,
    settings: Settings,
    cache: ConfigCache,
    browse: BrowseState,
    languages: LanguageTable,
    language: Language,
    tmdb_config: Option<TmdbConfig>,
    notices: Vec<String>,
}

impl<C: MovieDb> MovieSession<C> {
    pub fn new(client: C, config: Config, settings: Settings) -> Result<Self> {
        let cache = ConfigCache::new(&config.tmdb_config_file, settings.max_config_age_secs)
            .context("Invalid max_config_age_secs in settings")?;
        let loaded = LanguageTable::load(&config.language_file(&settings))?;

        let mut notices = Vec::new();
        if let Some(message) = loaded.recovered {
            notices.push(message);
        }
        for name in &loaded.duplicates {
            notices.push(format!("Your XML file has duplicate like: {}", name));
        }

        let language = Language::from_name(&settings.last_language);
        info!("MovieSession: starting in {}", language);

        Ok(Self {
            client,
            config,
            settings,
            cache,
            browse: BrowseState::new(),
            languages: loaded.table,
            language,
            tmdb_config: None,
            notices,
        })
    }

    pub fn title(&self) -> String {
        format!("TMDb Sample V{}", env!("CARGO_PKG_VERSION"))
    }

    /// Configuration, search, then images of the demo movie.
    pub fn get_movie(&mut self, input: &str) -> Result<String> {
        let mut out = Transcript::default();
        self.fetch_config(&mut out)?;
        self.fetch_movie(input, &mut out)?;
        self.fetch_images(&mut out)?;
        Ok(out.into_string())
    }

    fn fetch_config(&mut self, out: &mut Transcript) -> Result<()> {
        out.line(&format!(
            "Config file: {}, Exists: {}",
            self.cache.path().display(),
            self.cache.exists()
        ));
        let cached = self.cache.get_config(&self.client)?;
        match cached.source {
            ConfigSource::Stored => out.line("Using stored config"),
            ConfigSource::Fetched => {
                out.line("Getting new config");
                out.line("Storing config");
            }
        }
        self.tmdb_config = Some(cached.config);
        out.spacer();
        Ok(())
    }

    fn fetch_movie(&self, input: &str, out: &mut Transcript) -> Result<()> {
        let outcome = search(&self.client, input, &self.settings.default_query)?;
        out.push(&format_results(&outcome, self.settings.results_shown));
        out.spacer();
        Ok(())
    }

    fn fetch_images(&mut self, out: &mut Transcript) -> Result<()> {
        let tmdb_config = self.tmdb_config.clone().unwrap_or_default();
        let images = load_images(&self.client, self.settings.demo_movie_id)?;
        out.line(&format!("Fetching images for '{}'", images.title));

        for kind in ImageKind::ALL {
            out.line(&format!("Displaying {}", kind.plural()));
            let resolved = resolve_urls(&tmdb_config.images, kind, images.of_kind(kind));
            out.push(&format_resolved(&resolved));
        }

        if images.backdrops.is_empty() || tmdb_config.images.backdrop_sizes.is_empty() {
            warn!("fetch_images: nothing to download for '{}'", images.title);
            out.line("No backdrop available to download");
        } else {
            out.line("Downloading image for the first url, as a test");
            let download = download_first(
                &self.client,
                &tmdb_config.images,
                &images,
                &self.config.download_dir,
            )?;
            out.line(&format!("Downloaded {}: {} bytes", download.url, download.bytes));
            self.browse.record_download(download.path);
        }
        out.spacer();
        Ok(())
    }

    pub fn next_picture(&mut self) -> Option<PathBuf> {
        self.browse.next().map(PathBuf::from)
    }

    pub fn previous_picture(&mut self) -> Option<PathBuf> {
        self.browse.previous().map(PathBuf::from)
    }

    pub fn browse(&self) -> &BrowseState {
        &self.browse
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, name: &str) -> Language {
        self.language = Language::from_name(name);
        self.settings.last_language = self.language.to_string();
        self.language
    }

    pub fn toggle_language(&mut self) -> Language {
        let next = self.language.other();
        self.set_language(&next.to_string())
    }

    pub fn translate(&self, term: &str) -> String {
        self.languages.translate(self.language, term)
    }

    pub fn menu_labels(&self) -> Vec<(&'static str, String)> {
        self.languages.menu_labels(self.language)
    }

    /// Diagnostics from loading the language file, handed out once.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn save(&self) -> Result<()> {
        self.settings.save(&self.config.settings_file)
    }
}
