use std::path::PathBuf;

use anyhow::{Result, bail};

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// One pretty-printed JSON file per collection under `data_dir`.
    Json { data_dir: PathBuf },
    /// Process-local; gone on exit.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StorageBackend,
}

impl StoreConfig {
    pub fn json(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::Json {
                data_dir: data_dir.into(),
            },
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
        }
    }

    /// Read `PODIUM_STORAGE` and `PODIUM_DATA_DIR`, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("PODIUM_STORAGE").unwrap_or_else(|| "json".into());

        match backend.trim().to_ascii_lowercase().as_str() {
            "json" => {
                let data_dir = lookup("PODIUM_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.into());
                Ok(Self::json(data_dir))
            }
            "memory" => Ok(Self::memory()),
            other => bail!("Unsupported PODIUM_STORAGE '{}' (expected 'json' or 'memory')", other),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::json(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_json_under_data() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::json("data"));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn honors_data_dir() {
        let config = StoreConfig::from_lookup(lookup(&[("PODIUM_DATA_DIR", "/var/lib/podium")])).unwrap();
        assert_eq!(config, StoreConfig::json("/var/lib/podium"));
    }

    #[test]
    fn memory_backend() {
        let config = StoreConfig::from_lookup(lookup(&[("PODIUM_STORAGE", "Memory")])).unwrap();
        assert_eq!(config.backend, StorageBackend::Memory);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[("PODIUM_STORAGE", "postgres")])).unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }
}
