//! Optional external AI analysis
//!
//! The keyword router always produces a suggestion; when enabled, this client
//! asks an external service for a second opinion that intake may prefer.

pub mod circuit_breaker;
pub mod client;
pub mod config;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use client::{decode_verdict, AiAnalysisClient, AiError, AiVerdict, AnalysisProvider, AnalysisRequest};
pub use config::AiConfig;
