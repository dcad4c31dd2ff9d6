//! Application configuration file support.
//!
//! Configuration is read from a TOML file (`statistics.toml`). Every section is
//! optional; missing sections fall back to the defaults below, so an empty file
//! yields a working local setup.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [repository]
//! type = "local"
//! seed_file = "seed.json"
//!
//! [modules]
//! accounts = "Accounts"
//!
//! [[statistics.monthly]]
//! key = "contacts-new-by-month"
//! module = "contacts"
//! group_field = "lead_source"
//!
//! [preferences.exposed]
//! global = ["timezone", "datef", "timef", "currency"]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::factory::RepositoryType;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "STATISTICS_CONFIG";

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No statistics.toml found in standard locations")]
    NotFound,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    /// Front-end module name to legacy module name.
    #[serde(default = "default_modules")]
    pub modules: BTreeMap<String, String>,
    #[serde(default)]
    pub statistics: StatisticsSettings,
    #[serde(default)]
    pub preferences: PreferenceSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            repository: RepositorySettings::default(),
            modules: default_modules(),
            statistics: StatisticsSettings::default(),
            preferences: PreferenceSettings::default(),
        }
    }
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// JSON seed loaded into the local repository at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            seed_file: None,
        }
    }
}

/// Statistic declarations on top of the built-in providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsSettings {
    #[serde(default)]
    pub monthly: Vec<MonthlyStatisticSettings>,
}

/// A "new records per month, grouped by field" statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatisticSettings {
    pub key: String,
    /// Front-end module the statistic is scoped to.
    pub module: String,
    #[serde(default = "default_count_field")]
    pub count_field: String,
    #[serde(default = "default_date_field")]
    pub date_field: String,
    pub group_field: String,
}

/// A currency known to the preference layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub iso4217: String,
}

/// User preference exposure and mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceSettings {
    /// Category to the preference names exposed for it.
    #[serde(default = "default_exposed")]
    pub exposed: BTreeMap<String, Vec<String>>,
    /// Legacy date/time format token to front-end token.
    #[serde(default = "default_datetime_format_map")]
    pub datetime_format_map: BTreeMap<String, String>,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<CurrencySettings>,
    /// Category to the stored values of the local preference source.
    #[serde(default = "default_preference_values")]
    pub defaults: BTreeMap<String, Map<String, Value>>,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            exposed: default_exposed(),
            datetime_format_map: default_datetime_format_map(),
            currencies: default_currencies(),
            defaults: default_preference_values(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_count_field() -> String {
    "name".to_string()
}

fn default_date_field() -> String {
    "date_entered".to_string()
}

fn default_modules() -> BTreeMap<String, String> {
    [
        ("accounts", "Accounts"),
        ("contacts", "Contacts"),
        ("leads", "Leads"),
        ("opportunities", "Opportunities"),
        ("cases", "Cases"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_exposed() -> BTreeMap<String, Vec<String>> {
    let names = ["timezone", "datef", "timef", "currency"];
    BTreeMap::from([(
        "global".to_string(),
        names.iter().map(|s| s.to_string()).collect(),
    )])
}

fn default_datetime_format_map() -> BTreeMap<String, String> {
    [
        ("m", "MM"),
        ("d", "dd"),
        ("Y", "yyyy"),
        ("y", "yy"),
        ("H", "HH"),
        ("h", "hh"),
        ("i", "mm"),
        ("s", "ss"),
        ("A", "a"),
        ("a", "aaaaaa"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_currencies() -> Vec<CurrencySettings> {
    vec![CurrencySettings {
        id: -99,
        name: "US Dollars".to_string(),
        symbol: "$".to_string(),
        iso4217: "USD".to_string(),
    }]
}

fn default_preference_values() -> BTreeMap<String, Map<String, Value>> {
    let mut global = Map::new();
    global.insert("timezone".to_string(), Value::from("UTC"));
    global.insert("datef".to_string(), Value::from("m/d/Y"));
    global.insert("timef".to_string(), Value::from("H:i"));
    global.insert("currency".to_string(), Value::from(-99));
    BTreeMap::from([("global".to_string(), global)])
}

impl AppConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `statistics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("statistics.toml"),
            PathBuf::from("backend/statistics.toml"),
            PathBuf::from("../statistics.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Resolve configuration for a process: the file named by
    /// `STATISTICS_CONFIG` if set, else the default location, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(path);
        }

        match Self::from_default_location() {
            Err(ConfigError::NotFound) => {
                log::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, ConfigError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(ConfigError::Invalid)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.repository_type()?;

        for stat in &self.statistics.monthly {
            if stat.key.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "statistics.monthly entries require a non-empty key".to_string(),
                ));
            }
            if !self.modules.contains_key(&stat.module) {
                return Err(ConfigError::Invalid(format!(
                    "statistic '{}' is scoped to unmapped module '{}'",
                    stat.key, stat.module
                )));
            }
        }

        Ok(())
    }
}
