//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{CourseCatalog, CourseProfile};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Dataset source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Source type: "http" or "local"
    #[serde(default = "default_source")]
    pub source: String,

    /// Base URL of the hosted dataset (http source)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Dataset directory (local source)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Request timeout in seconds (http source)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_source() -> String {
    "local".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8000/data/".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_timeout() -> u64 {
    30
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            base_url: default_base_url(),
            data_dir: default_data_dir(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Extra course profiles; resolved ahead of the built-ins on equal
    /// prefixes
    #[serde(default)]
    pub courses: Vec<CourseProfile>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data: DataConfig::default(),
            server: ServerConfig::default(),
            courses: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.data.source.as_str() {
            "http" | "local" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown data source '{}', expected \"http\" or \"local\"",
                    other
                )));
            }
        }

        if self.data.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Data timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        for course in &self.courses {
            if course.event_prefix.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Course '{}' has an empty event prefix",
                    course.name
                )));
            }
        }

        Ok(())
    }

    /// The course catalog: built-ins plus configured profiles. Configured
    /// profiles are listed after the built-ins, which makes them win
    /// equal-length prefix ties in the catalog.
    pub fn course_catalog(&self) -> CourseCatalog {
        let mut profiles = CourseCatalog::default().profiles;
        profiles.extend(self.courses.iter().cloned());
        CourseCatalog::new(profiles)
    }
}
