use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::transcript::DEFAULT_FREE_TEXT_LIMIT;

/// Configuration for the transcript scanner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// HTTP API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Output and logging settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of courses returned by the free-text parser
    pub free_text_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Longest transcript text accepted, in characters
    pub max_input_chars: usize,

    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Log level used when no RUST_LOG filter is set
    pub log_level: String,

    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            free_text_limit: DEFAULT_FREE_TEXT_LIMIT,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            max_input_chars: 12 * 1024 * 1024,
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty_json: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            api: ApiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, else from the environment
    pub fn load() -> Result<Self> {
        Self::load_first(&["pathway.toml", "config/pathway.toml"])
    }

    /// Load the first existing file in `paths`; a file that exists but fails to parse is an error
    pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                return Self::load_from(path);
            }
        }
        Self::from_env()
    }

    /// Load configuration from a specific TOML file, then apply environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        config.with_env_overrides()
    }

    /// Default configuration with environment variable overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(port) = std::env::var("PATHWAY_PORT") {
            self.api.port = port
                .parse()
                .with_context(|| format!("PATHWAY_PORT is not a valid port: {}", port))?;
        }

        if let Ok(host) = std::env::var("PATHWAY_HOST") {
            self.api.host = host;
        }

        if let Ok(origins) = std::env::var("PATHWAY_CLIENT_ORIGIN") {
            self.api.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        if let Ok(limit) = std::env::var("PATHWAY_MAX_INPUT_CHARS") {
            self.api.max_input_chars = limit
                .parse()
                .with_context(|| format!("PATHWAY_MAX_INPUT_CHARS is not a number: {}", limit))?;
        }

        if let Ok(log_level) = std::env::var("PATHWAY_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        Ok(self)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(anyhow!("api.port must be greater than 0"));
        }

        if self.api.max_input_chars == 0 {
            return Err(anyhow!("api.max_input_chars must be greater than 0"));
        }

        if self.parser.free_text_limit == 0 {
            return Err(anyhow!("parser.free_text_limit must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Pathway Transcript Configuration:\n\
            - Listen Address: {}:{}\n\
            - Max Input Characters: {}\n\
            - Allowed Origins: {}\n\
            - Free Text Limit: {}\n\
            - Log Level: {}",
            self.api.host,
            self.api.port,
            self.api.max_input_chars,
            if self.api.allowed_origins.is_empty() {
                "any".to_string()
            } else {
                self.api.allowed_origins.join(", ")
            },
            self.parser.free_text_limit,
            self.output.log_level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.config.api.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.api.port = port;
        self
    }

    pub fn with_max_input_chars(mut self, limit: usize) -> Self {
        self.config.api.max_input_chars = limit;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config.api.allowed_origins = origins;
        self
    }

    pub fn with_free_text_limit(mut self, limit: usize) -> Self {
        self.config.parser.free_text_limit = limit;
        self
    }

    pub fn pretty_json(mut self, enable: bool) -> Self {
        self.config.output.pretty_json = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
