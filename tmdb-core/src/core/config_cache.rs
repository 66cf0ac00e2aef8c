use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::TmdbConfig;
use crate::core::request::MovieDb;

pub const DEFAULT_MAX_AGE_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Stored,
    Fetched,
}

#[derive(Debug, Clone)]
pub struct CachedConfig {
    pub config: TmdbConfig,
    pub source: ConfigSource,
}

/// File-backed copy of the remote configuration, reused while younger than `max_age`.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    path: PathBuf,
    max_age: Duration,
}

impl ConfigCache {
    pub fn new(path: impl Into<PathBuf>, max_age_secs: i64) -> Result<Self> {
        let max_age = Duration::try_seconds(max_age_secs)
            .ok_or_else(|| anyhow!("max config age of {} seconds is out of range", max_age_secs))?;
        Ok(Self {
            path: path.into(),
            max_age,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn get_config<C: MovieDb + ?Sized>(&self, client: &C) -> Result<CachedConfig> {
        self.get_config_at(client, Utc::now())
    }

    pub fn get_config_at<C: MovieDb + ?Sized>(
        &self,
        client: &C,
        now: DateTime<Utc>,
    ) -> Result<CachedConfig> {
        if let Some(last_write) = self.last_write() {
            if is_fresh(last_write, now, self.max_age) {
                match self.read() {
                    Ok(config) => {
                        info!("get_config: using stored config {:?}", self.path);
                        return Ok(CachedConfig {
                            config,
                            source: ConfigSource::Stored,
                        });
                    }
                    Err(e) => warn!("get_config: stored config unusable, fetching again: {:#}", e),
                }
            } else {
                info!("get_config: stored config is stale (written {})", last_write);
            }
        }

        let config = client.get_config()?;
        self.write(&config)?;
        info!("get_config: stored fresh config in {:?}", self.path);
        Ok(CachedConfig {
            config,
            source: ConfigSource::Fetched,
        })
    }

    fn last_write(&self) -> Option<DateTime<Utc>> {
        let metadata = fs::metadata(&self.path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        metadata.modified().ok().map(DateTime::<Utc>::from)
    }

    fn read(&self) -> Result<TmdbConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {:?}", self.path))
    }

    fn write(&self, config: &TmdbConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(config)?;
        fs::write(&self.path, json).with_context(|| format!("Failed to write {:?}", self.path))
    }
}

pub fn is_fresh(last_write: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    now - last_write < max_age
}
