// export all modules
pub mod app;
pub mod browse;
pub mod config_cache;
pub mod images;
pub mod language;
pub mod models;
pub mod request;
pub mod search;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
