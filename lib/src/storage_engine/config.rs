// lib/src/storage_engine/config.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{Result, ServiceError};

pub const DEFAULT_DATA_DIRECTORY: &str = "./data/doctor-consultation";
pub const DEFAULT_DATABASE_URL: &str = "sled://./data/doctor-consultation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEngineType {
    /// On-disk sled database.
    Sled,
    /// Temporary sled database removed when the last handle is dropped.
    InMemory,
}

impl FromStr for StorageEngineType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageEngineType::Sled),
            "memory" | "inmemory" => Ok(StorageEngineType::InMemory),
            _ => Err(ServiceError::Configuration(format!("Unknown storage engine type: {}", s))),
        }
    }
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngineType::Sled => f.write_str("sled"),
            StorageEngineType::InMemory => f.write_str("memory"),
        }
    }
}

/// Where and how the document store is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub engine_type: StorageEngineType,
    pub data_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn sled(path: impl Into<PathBuf>) -> Self {
        Self {
            engine_type: StorageEngineType::Sled,
            data_path: Some(path.into()),
        }
    }

    pub fn temporary() -> Self {
        Self {
            engine_type: StorageEngineType::InMemory,
            data_path: None,
        }
    }

    /// Parses a connection string of the form `<engine>://<path>`.
    ///
    /// `sled://./data/app` opens an on-disk store, `memory://` a temporary one.
    /// A bare path without a scheme is treated as a sled path.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let Some((scheme, rest)) = url.split_once("://") else {
            if url.is_empty() {
                return Err(ServiceError::Configuration("empty database url".to_string()));
            }
            return Ok(Self::sled(url));
        };

        match scheme.parse::<StorageEngineType>()? {
            StorageEngineType::InMemory => Ok(Self::temporary()),
            StorageEngineType::Sled if rest.is_empty() => Err(ServiceError::Configuration(format!(
                "database url {} is missing a path",
                url
            ))),
            StorageEngineType::Sled => Ok(Self::sled(rest)),
        }
    }

    pub(crate) fn open(&self) -> Result<sled::Db> {
        let config = match (self.engine_type, &self.data_path) {
            (StorageEngineType::InMemory, _) => sled::Config::new().temporary(true),
            (StorageEngineType::Sled, Some(path)) => sled::Config::new().path(path),
            (StorageEngineType::Sled, None) => {
                return Err(ServiceError::Configuration(
                    "Sled storage requires a data directory path.".to_string(),
                ))
            }
        };
        Ok(config.open()?)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::sled(DEFAULT_DATA_DIRECTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connection_strings() {
        assert_eq!(
            StorageConfig::from_url("sled://./data/test").unwrap(),
            StorageConfig::sled("./data/test")
        );
        assert_eq!(StorageConfig::from_url("memory://").unwrap(), StorageConfig::temporary());
        assert_eq!(
            StorageConfig::from_url("/var/lib/consult").unwrap(),
            StorageConfig::sled("/var/lib/consult")
        );
        assert_eq!(
            StorageConfig::from_url(DEFAULT_DATABASE_URL).unwrap(),
            StorageConfig::default()
        );
    }

    #[test]
    fn rejects_unknown_or_incomplete_urls() {
        assert!(matches!(
            StorageConfig::from_url("mongodb://localhost:27017/app"),
            Err(ServiceError::Configuration(_))
        ));
        assert!(StorageConfig::from_url("sled://").is_err());
        assert!(StorageConfig::from_url("  ").is_err());
    }
}
