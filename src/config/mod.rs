//! Configuration management
//!
//! Built-in defaults, then `config/repsheet.yaml` (or the file passed on the
//! command line), then `REPSHEET__SECTION__KEY` environment variables.

pub mod models;
pub mod validation;


pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GatewayError, Result};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/repsheet.yaml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "REPSHEET";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub gateway: GatewayConfig,
    pub providers: ProvidersConfig,
    pub summarization: SummarizationConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// A missing file is fine when `path` is `None`; an explicitly named file
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is normal
        let _ = dotenvy::dotenv();
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let (file, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        info!("Loading configuration from: {:?}", file);

        let settings = config::Config::builder()
            .add_source(File::from(file).format(FileFormat::Yaml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to load configuration: {}", e)))?;

        let mut config: Self = settings
            .try_deserialize()
            .map_err(|e| GatewayError::config(format!("Failed to parse configuration: {}", e)))?;
        config.providers = config.providers.with_env_fallback();

        config.validate()?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a YAML string, without any other layer
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.cache.validate().map_err(GatewayError::Config)?;
        self.gateway.validate().map_err(GatewayError::Config)?;
        self.summarization.validate().map_err(GatewayError::Config)?;
        Ok(())
    }
}
