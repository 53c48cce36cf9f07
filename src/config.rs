//! Service configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before this runs. Everything has a default
//! except the credentials: `DATABASE_URL` when the Postgres row store is
//! selected, and `STORAGE_KEY` when `STORAGE_URL` points at a real storage
//! API. Without `STORAGE_URL` uploads go to an in-process store, which is
//! only useful for local development.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use editor::tile::Gallery;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BUCKET_PHOTOS: &str = "photos";
pub const DEFAULT_BUCKET_ARTWORKS: &str = "artworks";
pub const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "E_CONFIG_MISSING",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

/// Which row store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStoreConfig {
    Postgres { database_url: String, max_connections: u32 },
    Memory,
}

/// Object storage buckets, one per gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub photos: String,
    pub artworks: String,
}

impl Buckets {
    #[must_use]
    pub fn for_gallery(&self, gallery: Gallery) -> &str {
        match gallery {
            Gallery::Photos => &self.photos,
            Gallery::Artworks => &self.artworks,
        }
    }
}

impl Default for Buckets {
    fn default() -> Self {
        Self { photos: DEFAULT_BUCKET_PHOTOS.into(), artworks: DEFAULT_BUCKET_ARTWORKS.into() }
    }
}

/// Remote storage API credentials. `None` selects the in-process store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStorage {
    pub url: String,
    pub key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub rows: RowStoreConfig,
    pub storage: Option<RemoteStorage>,
    pub buckets: Buckets,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Variables:
    /// - `PORT`: default 3000
    /// - `ROW_STORE`: `postgres` (default) or `memory`
    /// - `DATABASE_URL`: required for `postgres`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `STORAGE_URL`, `STORAGE_KEY`: remote storage API; key required with URL
    /// - `STORAGE_BUCKET_PHOTOS`, `STORAGE_BUCKET_ARTWORKS`: bucket names
    /// - `STORAGE_TIMEOUT_SECS`: default 60
    ///
    /// # Errors
    ///
    /// Returns an error for missing credentials or unparsable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let rows = match lookup("ROW_STORE").as_deref().map(str::trim) {
            None | Some("" | "postgres") => RowStoreConfig::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            },
            Some("memory") => RowStoreConfig::Memory,
            Some(other) => return Err(ConfigError::Invalid { var: "ROW_STORE", value: other.to_owned() }),
        };

        let storage = match lookup("STORAGE_URL") {
            Some(url) if !url.trim().is_empty() => Some(RemoteStorage {
                url: url.trim().trim_end_matches('/').to_owned(),
                key: lookup("STORAGE_KEY").ok_or(ConfigError::Missing("STORAGE_KEY"))?,
                timeout_secs: parse_or(&lookup, "STORAGE_TIMEOUT_SECS", DEFAULT_STORAGE_TIMEOUT_SECS)?,
            }),
            _ => None,
        };

        let buckets = Buckets {
            photos: lookup("STORAGE_BUCKET_PHOTOS").unwrap_or_else(|| DEFAULT_BUCKET_PHOTOS.into()),
            artworks: lookup("STORAGE_BUCKET_ARTWORKS").unwrap_or_else(|| DEFAULT_BUCKET_ARTWORKS.into()),
        };

        Ok(Self { port, rows, storage, buckets })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
