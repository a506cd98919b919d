//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for trellis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Orchestrator base URL
    pub endpoint: Option<String>,
    /// Default project to run tasks against
    pub project_id: Option<String>,
    /// Default database within the project
    pub database_id: Option<String>,
    /// Default iteration cap per task
    pub max_iterations: Option<u32>,
    /// Credentials (alternative to environment variables)
    #[serde(default)]
    pub credentials: Credentials,
}

/// Credential configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trellis")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for TRELLIS_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("TRELLIS_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        fs::create_dir_all(dir)?;

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            endpoint: Some("https://api.trellis.dev".to_string()),
            project_id: None,
            database_id: None,
            max_iterations: Some(5),
            credentials: Credentials::default(),
        };

        default_config.save()?;
        Ok(path)
    }

    /// Get the access token, checking config then env
    pub fn access_token(&self) -> Option<String> {
        self.credentials
            .access_token
            .clone()
            .or_else(|| std::env::var("TRELLIS_ACCESS_TOKEN").ok())
    }

    /// Get the platform API key, checking config then env
    pub fn api_key(&self) -> Option<String> {
        self.credentials
            .api_key
            .clone()
            .or_else(|| std::env::var("TRELLIS_API_KEY").ok())
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# trellis configuration file
# Place at ~/.config/trellis/config.toml (Linux/Mac) or %APPDATA%\trellis\config.toml (Windows)

# Orchestrator base URL
endpoint = "https://api.trellis.dev"

# Default project to run tasks against
# project_id = "..."

# Default database within the project (optional)
# database_id = "..."

# Default iteration cap per task
max_iterations = 5

# Credentials (optional - can also use TRELLIS_ACCESS_TOKEN / TRELLIS_API_KEY)
# It's recommended to use environment variables instead for security
[credentials]
# access_token = "..."
# api_key = "..."
"#
}
