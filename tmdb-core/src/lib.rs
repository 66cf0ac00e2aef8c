// Module declarations
pub mod core;

// Public API re-exports
pub use crate::core::app::{MovieSession, Transcript};
pub use crate::core::browse::BrowseState;
pub use crate::core::config_cache::{
    is_fresh,
    CachedConfig,
    ConfigCache,
    ConfigSource,
    DEFAULT_MAX_AGE_SECS,
};
pub use crate::core::images::{
    download_first,
    format_resolved,
    load_images,
    local_file_name,
    resolve_urls,
    Download,
    ImageKind,
    MovieImages,
    ResolvedImage,
    DEMO_MOVIE_ID,
    IMAGES_PER_KIND,
};
pub use crate::core::language::{
    default_xml,
    write_default_file,
    Language,
    LanguageLoad,
    LanguageTable,
    DEFAULT_LANGUAGE_FILE,
    DEFAULT_TERMS,
    MENU_TERMS,
};
pub use crate::core::models::{
    ImageData,
    Images,
    ImagesConfig,
    Movie,
    SearchContainer,
    SearchMovie,
    TmdbConfig,
};
pub use crate::core::request::{MovieDb, TmdbClient, API_BASE_URL};
pub use crate::core::search::{
    effective_query,
    format_results,
    search,
    SearchOutcome,
    DEFAULT_QUERY,
};
pub use crate::core::storage::{Config, Settings, SETTINGS_FILE, TMDB_CONFIG_FILE};
