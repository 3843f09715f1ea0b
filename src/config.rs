//! Configuration module
//!
//! TOML file with `[server]`, `[database]`, `[logging]` and `[[floor_plan]]`
//! sections. Every field has a default, so a missing file or a partial file
//! is fine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Table, Zone};
use crate::infrastructure::DatabaseConfig;

/// Env var that overrides the default config location
pub const CONFIG_ENV: &str = "TABLEBOOK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    /// Tables seeded into an empty catalog at start-up
    pub floor_plan: Vec<FloorPlanEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseSettings::default(),
            logging: LoggingConfig::default(),
            floor_plan: default_floor_plan(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    /// Seconds
    pub connect_timeout: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
            connect_timeout: db.connect_timeout,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, `RUST_LOG` wins when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlanEntry {
    pub number: i32,
    pub capacity: i32,
    /// Zone label such as "Garden Section"
    pub location: String,
}

impl FloorPlanEntry {
    fn new(number: i32, capacity: i32, location: Zone) -> Self {
        Self {
            number,
            capacity,
            location: location.label().to_string(),
        }
    }
}

fn default_floor_plan() -> Vec<FloorPlanEntry> {
    use Zone::*;

    [
        (1, 2, WindowView),
        (2, 2, WindowView),
        (3, 4, WindowView),
        (4, 4, WindowView),
        (5, 4, MainHall),
        (6, 4, MainHall),
        (7, 6, MainHall),
        (8, 6, MainHall),
        (9, 8, MainHall),
        (10, 2, GardenSection),
        (11, 4, GardenSection),
        (12, 4, GardenSection),
        (13, 6, GardenSection),
        (14, 10, PrivateDining),
    ]
    .into_iter()
    .map(|(number, capacity, zone)| FloorPlanEntry::new(number, capacity, zone))
    .collect()
}

/// `$TABLEBOOK_CONFIG`, else `<config_dir>/tablebook/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tablebook")
        .join("config.toml")
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.floor_plan {
            if !seen.insert(entry.number) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate table number {}",
                    entry.number
                )));
            }
            if entry.capacity < 1 {
                return Err(ConfigError::Invalid(format!(
                    "table {} has capacity {}",
                    entry.number, entry.capacity
                )));
            }
            if Zone::parse(&entry.location).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "table {} has unknown location '{}'",
                    entry.number, entry.location
                )));
            }
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            connect_timeout: self.database.connect_timeout,
        }
    }

    /// Floor plan as fresh catalog tables. Assumes [`validate`](Self::validate) passed.
    pub fn floor_plan_tables(&self) -> Vec<Table> {
        self.floor_plan
            .iter()
            .filter_map(|entry| {
                Zone::parse(&entry.location)
                    .map(|zone| Table::new(entry.number, entry.capacity, zone))
            })
            .collect()
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

// ── Tests ──────────────────────────────────────────────────────
