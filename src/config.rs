use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::storage::postgres::PgSettings;
use crate::storage::StoreConfig;

/// Deployment variables mapped onto config keys. These take precedence over
/// the config file and the `TODO_API_*` environment.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("POSTGRES_USER", "storage.postgres.user"),
    ("POSTGRES_PASSWORD", "storage.postgres.password"),
    ("POSTGRES_DB", "storage.postgres.database"),
    ("POSTGRES_HOST", "storage.postgres.host"),
    ("POSTGRES_PORT", "storage.postgres.port"),
];

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageSection,
    pub assets: AssetsSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var("TODO_API_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TODO_API")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, env::var(var).ok())?;
        }

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Resolve and validate the storage backend configuration.
    pub fn store_config(&self) -> Result<StoreConfig> {
        self.storage.to_runtime()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Name reported by the liveness probe
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            service_name: "api".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackendKind,
    pub postgres: PostgresSection,
}

impl StorageSection {
    pub fn to_runtime(&self) -> Result<StoreConfig> {
        match self.backend {
            StorageBackendKind::Memory => Ok(StoreConfig::Memory),
            StorageBackendKind::Postgres => {
                let pg = &self.postgres;

                if pg.user.trim().is_empty() {
                    bail!("storage.postgres.user must be specified (POSTGRES_USER)");
                }
                if pg.database.trim().is_empty() {
                    bail!("storage.postgres.database must be specified (POSTGRES_DB)");
                }
                if pg.host.trim().is_empty() {
                    bail!("storage.postgres.host must not be empty");
                }
                if pg.max_connections == 0 {
                    bail!("storage.postgres.max_connections must be at least 1");
                }

                Ok(StoreConfig::Postgres(PgSettings {
                    host: pg.host.trim().to_string(),
                    port: pg.port,
                    user: pg.user.clone(),
                    password: pg.password.clone(),
                    database: pg.database.clone(),
                    max_connections: pg.max_connections,
                    acquire_timeout_secs: pg.acquire_timeout_secs,
                }))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSection {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresSection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsSection {
    pub dir: PathBuf,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./public"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}
