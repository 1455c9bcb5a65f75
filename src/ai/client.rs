//! AI analysis client with retry, caching, and circuit breaker

use super::circuit_breaker::CircuitBreaker;
use super::config::AiConfig;
use crate::error::RouterError;
use crate::grievances::models::{GrievanceCategory, GrievancePriority};
use crate::metrics::METRICS;
use crate::routing::DepartmentId;
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

const ANALYZE_OP: &str = "analyze_text";

#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    #[error("AI analysis is disabled")]
    Disabled,

    #[error("Circuit breaker is open: {0}")]
    CircuitOpen(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// `status` is `None` when no response was received
    #[error("Upstream error: {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl AiError {
    /// Transport failures, timeouts and 5xx responses are worth another try
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Timeout(_) => true,
            AiError::Upstream { status, .. } => status.map_or(true, |s| s >= 500),
            _ => false,
        }
    }
}

impl From<AiError> for RouterError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Disabled => RouterError::Disabled,
            AiError::CircuitOpen(op) => RouterError::CircuitOpen(op),
            AiError::Timeout(msg) => RouterError::Timeout(msg),
            AiError::Upstream { message, .. } => RouterError::Upstream(message),
            AiError::Decode(msg) => RouterError::Decode(msg),
        }
    }
}

/// Text sent for analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub description: String,
    pub image_labels: Vec<String>,
}

impl AnalysisRequest {
    /// Cache key: trimmed, lowercased fields
    fn cache_key(&self) -> String {
        let mut key = format!(
            "{}\n{}",
            self.title.trim().to_lowercase(),
            self.description.trim().to_lowercase()
        );
        for label in &self.image_labels {
            key.push('\n');
            key.push_str(&label.trim().to_lowercase());
        }
        key
    }
}

/// Validated verdict from the AI service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiVerdict {
    pub department: DepartmentId,
    pub confidence: f64,
    pub category: Option<GrievanceCategory>,
    pub priority: Option<GrievancePriority>,
    pub labels: Vec<String>,
}

/// Wire shape of the analyze-text response
#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse {
    suggested_department: String,
    confidence: f64,
    #[serde(default)]
    category: Option<GrievanceCategory>,
    #[serde(default)]
    auto_priority: Option<GrievancePriority>,
    #[serde(default)]
    labels: Vec<String>,
}

impl TryFrom<AnalyzeTextResponse> for AiVerdict {
    type Error = AiError;

    fn try_from(raw: AnalyzeTextResponse) -> Result<Self, Self::Error> {
        let department = raw
            .suggested_department
            .parse::<DepartmentId>()
            .map_err(|e| AiError::Decode(e.to_string()))?;

        if !(0.0..=1.0).contains(&raw.confidence) {
            return Err(AiError::Decode(format!(
                "confidence {} outside [0, 1]",
                raw.confidence
            )));
        }

        Ok(Self {
            department,
            confidence: raw.confidence,
            category: raw.category,
            priority: raw.auto_priority,
            labels: raw.labels,
        })
    }
}

/// Parse and validate a response body
pub fn decode_verdict(body: &str) -> Result<AiVerdict, AiError> {
    let raw: AnalyzeTextResponse =
        serde_json::from_str(body).map_err(|e| AiError::Decode(e.to_string()))?;
    AiVerdict::try_from(raw)
}

/// Source of AI verdicts, swappable in tests
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AiVerdict, AiError>;

    fn is_enabled(&self) -> bool;
}

/// HTTP client for the AI analysis service
pub struct AiAnalysisClient {
    http: Client,
    config: AiConfig,
    cache: Cache<String, AiVerdict>,
    semaphore: Semaphore,
    breaker: CircuitBreaker,
}

impl AiAnalysisClient {
    pub fn new(config: AiConfig) -> Result<Self, RouterError> {
        config.validate().map_err(RouterError::Configuration)?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RouterError::Configuration(format!("HTTP client: {}", e)))?;

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl())
            .build();

        let semaphore = Semaphore::new(config.max_concurrent);
        let breaker =
            CircuitBreaker::new(config.circuit_breaker_failures, config.breaker_reset_timeout());

        Ok(Self {
            http,
            config,
            cache,
            semaphore,
            breaker,
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn call_analyze_api(&self, request: &AnalysisRequest) -> Result<AiVerdict, AiError> {
        let url = format!(
            "{}/analyze-text",
            self.config.service_url.trim_end_matches('/')
        );

        let mut req = self.http.post(&url).json(request);
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout(e.to_string())
            } else {
                AiError::Upstream {
                    status: None,
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AiError::Upstream {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(AiError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Status {}: {}", status, body),
            });
        }

        decode_verdict(&body)
    }

    /// Exponential backoff: base * 2^(attempt - 1)
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        self.config.retry_backoff().saturating_mul(multiplier)
    }
}

#[async_trait]
impl AnalysisProvider for AiAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AiVerdict, AiError> {
        let start = Instant::now();

        if !self.config.enabled {
            METRICS.record_ai_request("disabled");
            return Err(AiError::Disabled);
        }

        let key = request.cache_key();
        if let Some(verdict) = self.cache.get(&key).await {
            METRICS.ai_cache_hits.inc();
            debug!("AI verdict served from cache");
            return Ok(verdict);
        }
        METRICS.ai_cache_misses.inc();

        if self.breaker.is_open(ANALYZE_OP) {
            METRICS.ai_circuit_open.inc();
            error!("Circuit breaker is open for {}", ANALYZE_OP);
            return Err(AiError::CircuitOpen(ANALYZE_OP.to_string()));
        }

        let mut attempt = 0;
        let outcome = loop {
            attempt += 1;

            // Permit covers the call only, not the backoff sleep
            let result = {
                let _permit = self.semaphore.acquire().await.map_err(|e| AiError::Upstream {
                    status: None,
                    message: e.to_string(),
                })?;
                self.call_analyze_api(request).await
            };

            match result {
                Err(e) if e.is_retryable() && attempt <= self.config.retry_attempts => {
                    METRICS.record_ai_request("retry");
                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "AI analysis attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                other => break other,
            }
        };

        match outcome {
            Ok(verdict) => {
                self.breaker.mark_success(ANALYZE_OP);
                METRICS.record_ai_request("success");
                self.cache.insert(key, verdict.clone()).await;
                METRICS
                    .ai_request_duration
                    .observe(start.elapsed().as_secs_f64());
                Ok(verdict)
            }
            // The service answered, so the breaker treats it as reachable
            Err(AiError::Decode(msg)) => {
                self.breaker.mark_success(ANALYZE_OP);
                METRICS.record_ai_request("decode_error");
                error!("AI analysis returned an unusable verdict: {}", msg);
                Err(AiError::Decode(msg))
            }
            Err(e) => {
                self.breaker.mark_failure(ANALYZE_OP);
                METRICS.record_ai_request("error");
                error!("AI analysis failed after {} attempt(s): {}", attempt, e);
                Err(e)
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
