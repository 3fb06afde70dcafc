// ============================================================
// DASHBOARD CONFIGURATION
// ============================================================
// Layered settings: defaults < TOML file < EPIDEMIO_* environment

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::dataset::DatasetSchema;
use crate::domain::error::{AppError, Result};

/// Environment variable naming the TOML file
pub const CONFIG_PATH_ENV: &str = "EPIDEMIO_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";
pub const ENV_PREFIX: &str = "EPIDEMIO_";

/// Where and how the results sheet is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatasetSourceConfig {
    /// `.xlsx`/`.xls`/`.ods` workbook or `.csv` file
    pub path: PathBuf,

    /// 0-based row index of the header line (default: 5)
    pub header_row: usize,

    /// Worksheet name; first sheet when absent
    pub sheet: Option<String>,

    /// CSV delimiter; auto-detected when absent
    pub delimiter: Option<char>,
}

impl Default for DatasetSourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Epidemio2024hemato.xlsx"),
            header_row: 5,
            sheet: None,
            delimiter: None,
        }
    }
}

impl DatasetSourceConfig {
    /// Configured delimiter as the single byte the CSV reader splits on
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(delimiter) if delimiter.is_ascii() => Ok(Some(delimiter as u8)),
            Some(delimiter) => Err(AppError::ConfigError(format!(
                "CSV delimiter '{}' must be a single ASCII character",
                delimiter
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// Launch the system browser on startup
    pub open_browser: bool,

    /// Live sessions kept before the least recently used is evicted
    #[validate(range(min = 1))]
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            open_browser: true,
            max_sessions: 256,
        }
    }
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    #[validate(nested)]
    pub dataset: DatasetSourceConfig,

    #[validate(nested)]
    pub schema: DatasetSchema,

    #[validate(nested)]
    pub server: ServerConfig,

    /// `tracing` filter used when `RUST_LOG` is unset
    #[validate(length(min = 1))]
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetSourceConfig::default(),
            schema: DatasetSchema::default(),
            server: ServerConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

pub struct ConfigService;

impl ConfigService {
    /// Provider stack read by `load`. Loads `.env` first when present.
    pub fn figment() -> Figment {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Figment::from(Serialized::defaults(DashboardConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<DashboardConfig> {
        Self::from_figment(Self::figment())
    }

    /// Extract and validate a config from any provider stack
    pub fn from_figment(figment: Figment) -> Result<DashboardConfig> {
        let config: DashboardConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to read configuration: {}", e)))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;
        config.dataset.delimiter_byte()?;

        Ok(config)
    }
}
