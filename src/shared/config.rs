//! Application configuration. Server port, OMDb credentials, paths.

use serde::Deserialize;
use std::path::PathBuf;

use crate::adapters::omdb::DEFAULT_OMDB_URL;
use crate::domain::catalog::DEFAULT_PAGE_SIZE;

/// Port the relay listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 3000;

/// Default request body cap (poster uploads).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP port. Read from ASIMOVIES_PORT.
    #[serde(default)]
    pub port: Option<u16>,

    // ─────────────────────────────────────────────────────────────────────────
    // OMDb
    // ─────────────────────────────────────────────────────────────────────────
    /// OMDb API key. Read from ASIMOVIES_OMDB_API_KEY or OMDB_API_KEY.
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb endpoint. Read from ASIMOVIES_OMDB_API_URL.
    #[serde(default)]
    pub omdb_api_url: Option<String>,

    /// Outbound request timeout in seconds (default 10). Read from ASIMOVIES_OMDB_TIMEOUT_SECS.
    #[serde(default)]
    pub omdb_timeout_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Storage and presentation
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory holding the database and uploaded posters. Read from ASIMOVIES_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Base URL clients reach this server at; poster URLs are built from it.
    /// Read from ASIMOVIES_PUBLIC_URL.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Movies per page (default 4). Read from ASIMOVIES_PAGE_SIZE.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Poster shown for movies without one. Read from ASIMOVIES_DEFAULT_POSTER.
    #[serde(default)]
    pub default_poster: Option<String>,

    /// Request body limit in bytes. Read from ASIMOVIES_MAX_UPLOAD_BYTES.
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("ASIMOVIES"));
        if let Ok(path) = std::env::var("ASIMOVIES_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // OMDB_API_KEY is read directly (no prefix) so an existing .env keeps working
        if cfg.omdb_api_key.is_none() {
            cfg.omdb_api_key = std::env::var("OMDB_API_KEY").ok().filter(|k| !k.is_empty());
        }
        Ok(cfg)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Returns the OMDb key, or an empty string when unset (the upstream then answers "No API key provided.").
    pub fn omdb_api_key_or_default(&self) -> String {
        self.omdb_api_key.clone().unwrap_or_default()
    }

    pub fn omdb_api_url_or_default(&self) -> String {
        self.omdb_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OMDB_URL.to_string())
    }

    pub fn omdb_timeout_secs_or_default(&self) -> u64 {
        self.omdb_timeout_secs.unwrap_or(10)
    }

    pub fn is_omdb_configured(&self) -> bool {
        self.omdb_api_key.is_some()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("./data"))
    }

    /// Uploaded posters live here, served under `/media`.
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("media")
    }

    pub fn public_url_or_default(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port_or_default()))
    }

    pub fn page_size_or_default(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_poster_or_default(&self) -> String {
        self.default_poster
            .clone()
            .unwrap_or_else(|| "/assets/imgs/default-poster.jpg".to_string())
    }

    pub fn max_upload_bytes_or_default(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.port_or_default(), 3000);
        assert_eq!(cfg.omdb_api_url_or_default(), "http://www.omdbapi.com/");
        assert_eq!(cfg.public_url_or_default(), "http://localhost:3000");
        assert_eq!(cfg.page_size_or_default(), 4);
        assert_eq!(cfg.media_dir(), PathBuf::from("./data/media"));
        assert!(!cfg.is_omdb_configured());
    }

    #[test]
    fn test_public_url_follows_port() {
        let cfg = AppConfig {
            port: Some(8080),
            ..Default::default()
        };
        assert_eq!(cfg.public_url_or_default(), "http://localhost:8080");
    }
}
