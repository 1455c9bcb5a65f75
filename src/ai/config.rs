//! Configuration for the external AI analysis service

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// AI analysis client configuration
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    /// Disabled by default; the keyword router is always available
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Bearer token sent with every request, never logged
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt, for transport and 5xx failures
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,

    /// Base backoff in milliseconds, doubled per retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_breaker_failures")]
    pub circuit_breaker_failures: usize,

    #[serde(default = "default_breaker_reset")]
    pub circuit_breaker_reset_secs: u64,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_cache_size")]
    pub cache_max_size: u64,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Minimum verdict confidence for the AI to override the keyword router
    #[serde(default = "default_min_override_confidence")]
    pub min_override_confidence: f64,
}

fn default_service_url() -> String { "http://localhost:8001".to_string() }
fn default_timeout_ms() -> u64 { 3000 }
fn default_retry_attempts() -> usize { 2 }
fn default_retry_backoff_ms() -> u64 { 200 }
fn default_breaker_failures() -> usize { 5 }
fn default_breaker_reset() -> u64 { 30 }
fn default_cache_ttl() -> u64 { 600 }
fn default_cache_size() -> u64 { 1000 }
fn default_max_concurrent() -> usize { 8 }
fn default_min_override_confidence() -> f64 { 0.7 }

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_url: default_service_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            circuit_breaker_failures: default_breaker_failures(),
            circuit_breaker_reset_secs: default_breaker_reset(),
            cache_ttl_secs: default_cache_ttl(),
            cache_max_size: default_cache_size(),
            max_concurrent: default_max_concurrent(),
            min_override_confidence: default_min_override_confidence(),
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn breaker_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.service_url.trim().is_empty() {
            return Err("ai.service_url is required when ai.enabled is true".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_override_confidence) {
            return Err(format!(
                "ai.min_override_confidence must be within [0, 1], got {}",
                self.min_override_confidence
            ));
        }
        if self.max_concurrent == 0 {
            return Err("ai.max_concurrent must be at least 1".to_string());
        }
        if self.circuit_breaker_failures == 0 {
            return Err("ai.circuit_breaker_failures must be at least 1".to_string());
        }
        Ok(())
    }
}
