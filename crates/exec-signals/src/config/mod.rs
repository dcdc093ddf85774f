mod profiles;

pub use profiles::{
    check_lookback_days, CompanyConfig, ProfileConfig, DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS,
};

use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/profiles.toml";
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/sample_posts.json";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process-level settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub paths: PathConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let config_path = env_path("BRIEF_CONFIG_PATH", DEFAULT_CONFIG_PATH)?;
        let snapshot_path = env_path("BRIEF_SNAPSHOT_PATH", DEFAULT_SNAPSHOT_PATH)?;
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            paths: PathConfig {
                config_path,
                snapshot_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn env_path(key: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { key }),
        Ok(value) => Ok(PathBuf::from(value.trim())),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

/// Default input locations; CLI flags override them.
#[derive(Debug, Clone)]
pub struct PathConfig {
    pub config_path: PathBuf,
    pub snapshot_path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyPath {
        key: &'static str,
    },
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    NoCompanies,
    MissingCompanyName {
        position: usize,
    },
    DuplicateCompany(String),
    InvalidProfileUrl {
        company: String,
        url: String,
    },
    DuplicateProfileId(String),
    InvalidKeyword {
        keyword: String,
        reason: String,
    },
    InvalidSetting {
        key: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPath { key } => write!(f, "{key} must not be empty"),
            ConfigError::Unreadable { path, .. } => {
                write!(f, "configuration file not readable: {}", path.display())
            }
            ConfigError::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid configuration in {}: {source}", path.display()),
            ConfigError::Parse { path: None, source } => {
                write!(f, "invalid configuration: {source}")
            }
            ConfigError::NoCompanies => {
                write!(f, "configuration must list at least one [[company]]")
            }
            ConfigError::MissingCompanyName { position } => {
                write!(f, "company entry #{position} must include a 'name'")
            }
            ConfigError::DuplicateCompany(name) => {
                write!(f, "company '{name}' is configured more than once")
            }
            ConfigError::InvalidProfileUrl { company, url } => {
                write!(f, "profile URL for {company} must be absolute: '{url}'")
            }
            ConfigError::DuplicateProfileId(id) => {
                write!(f, "profile id '{id}' is used by more than one profile")
            }
            ConfigError::InvalidKeyword { keyword, reason } => {
                write!(f, "keyword '{keyword}' is invalid: {reason}")
            }
            ConfigError::InvalidSetting { key, reason } => write!(f, "{key} {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
