//! Service configuration
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file
//! (`CIVIC_CONFIG`, default `config/civic_router.toml`), then `CIVIC_`
//! environment variables with `__` between section and key, e.g.
//! `CIVIC_SERVER__PORT=9000` or `CIVIC_AI__ENABLED=true`.

use crate::ai::AiConfig;
use crate::error::{Result, RouterError};
use crate::routing::{DepartmentId, KeywordEntry};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config/civic_router.toml";
pub const ENV_PREFIX: &str = "CIVIC";

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub routing: RoutingConfig,
    pub ai: AiConfig,
    pub logging: LoggingConfig,
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request body limit in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_max_body_bytes() -> usize { 64 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Department used when no keyword matches
    #[serde(default = "default_department")]
    pub default_department: DepartmentId,

    /// Deployment-specific terms appended to the built-in dictionary
    #[serde(default)]
    pub extra_keywords: Vec<KeywordEntry>,
}

fn default_department() -> DepartmentId { DepartmentId::Municipal }

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_department: default_department(),
            extra_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,

    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: usize,
}

fn default_list_limit() -> usize { 50 }
fn default_max_list_limit() -> usize { 200 }

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
        }
    }
}

impl Config {
    /// Load `.env`, then the file named by `CIVIC_CONFIG`, then the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let path =
            std::env::var("CIVIC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file (which may be absent) plus the environment
    pub fn load_from(path: &str) -> Result<Self> {
        debug!("Loading configuration from {}", path);

        let config: Config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_body_bytes == 0 {
            return Err(RouterError::Configuration(
                "server.max_body_bytes must be positive".to_string(),
            ));
        }

        if self.intake.default_list_limit == 0
            || self.intake.default_list_limit > self.intake.max_list_limit
        {
            return Err(RouterError::Configuration(format!(
                "intake.default_list_limit must be within 1..={}, got {}",
                self.intake.max_list_limit, self.intake.default_list_limit
            )));
        }

        self.ai.validate().map_err(RouterError::Configuration)
    }
}
