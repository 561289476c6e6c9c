//! Configuration module

use std::env;
use std::path::PathBuf;

use floodsense_core::constants::DEFAULT_MODEL_DIR;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding model artifacts
    pub model_dir: PathBuf,

    /// Serve a placeholder model when no artifact exists
    pub allow_mock_model: bool,

    /// Allowed CORS origins, `*` allows any
    pub cors_origins: Vec<String>,

    /// Environment (development, production)
    pub environment: String,

    /// Emit JSON log lines instead of human readable ones
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            allow_mock_model: true,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            environment: "development".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),

            allow_mock_model: env::var("ALLOW_MOCK_MODEL")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.allow_mock_model),

            cors_origins: env::var("CORS_ORIGINS")
                .map(|s| parse_list(&s))
                .unwrap_or(defaults.cors_origins),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_json: env::var("LOG_FORMAT")
                .map(|s| s.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.log_json),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
