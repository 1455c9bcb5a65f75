//! Metrics collection for observability

use crate::routing::Suggestion;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, register_histogram_with_registry, Counter, CounterVec,
    Histogram, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Routing
    pub classifications: CounterVec,
    pub suggested_departments: CounterVec,
    pub classification_confidence: Histogram,

    // AI analysis
    pub ai_requests: CounterVec,
    pub ai_circuit_open: Counter,
    pub ai_cache_hits: Counter,
    pub ai_cache_misses: Counter,
    pub ai_request_duration: Histogram,

    // Intake
    pub grievances_created: CounterVec,

    // HTTP
    pub http_request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let classifications = register_counter_vec_with_registry!(
            Opts::new("routing_classifications_total", "Total department classifications"),
            &["outcome"],
            registry
        )?;

        let suggested_departments = register_counter_vec_with_registry!(
            Opts::new(
                "routing_suggested_department_total",
                "Suggestions per department"
            ),
            &["department"],
            registry
        )?;

        let classification_confidence = register_histogram_with_registry!(
            "routing_confidence",
            "Confidence of department suggestions",
            vec![0.3, 0.5, 0.6, 0.7, 0.8, 0.9],
            registry
        )?;

        let ai_requests = register_counter_vec_with_registry!(
            Opts::new("ai_requests_total", "Total AI analysis requests"),
            &["status"],
            registry
        )?;

        let ai_circuit_open = register_counter_with_registry!(
            Opts::new("ai_circuit_open_total", "Requests rejected by the open circuit"),
            registry
        )?;

        let ai_cache_hits = register_counter_with_registry!(
            Opts::new("ai_cache_hits_total", "AI verdict cache hits"),
            registry
        )?;

        let ai_cache_misses = register_counter_with_registry!(
            Opts::new("ai_cache_misses_total", "AI verdict cache misses"),
            registry
        )?;

        let ai_request_duration = register_histogram_with_registry!(
            "ai_request_duration_seconds",
            "AI analysis duration in seconds, retries included",
            registry
        )?;

        let grievances_created = register_counter_vec_with_registry!(
            Opts::new("grievances_created_total", "Grievances created"),
            &["source"],
            registry
        )?;

        let http_request_duration = register_histogram_vec_with_registry!(
            "http_request_duration_seconds",
            "Handler duration in seconds",
            &["handler"],
            registry
        )?;

        Ok(Self {
            registry,
            classifications,
            suggested_departments,
            classification_confidence,
            ai_requests,
            ai_circuit_open,
            ai_cache_hits,
            ai_cache_misses,
            ai_request_duration,
            grievances_created,
            http_request_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a router suggestion; `fallback` when no term matched
    pub fn record_classification(&self, suggestion: &Suggestion) {
        let outcome = if suggestion.matched_terms.is_empty() {
            "fallback"
        } else {
            "matched"
        };
        self.classifications.with_label_values(&[outcome]).inc();
        self.suggested_departments
            .with_label_values(&[suggestion.department.as_str()])
            .inc();
        self.classification_confidence.observe(suggestion.confidence);
    }

    pub fn record_ai_request(&self, status: &str) {
        self.ai_requests.with_label_values(&[status]).inc();
    }

    pub fn record_grievance_created(&self, source: &str) {
        self.grievances_created.with_label_values(&[source]).inc();
    }

    /// Export this registry in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::DepartmentId;

    #[test]
    fn test_metrics_initialization() {
        assert!(Metrics::new().is_ok());
    }

    #[test]
    fn test_record_classification() {
        let metrics = Metrics::new().unwrap();
        metrics.record_classification(&Suggestion {
            department: DepartmentId::Municipal,
            confidence: 0.3,
            matched_terms: vec![],
        });
        metrics.record_classification(&Suggestion {
            department: DepartmentId::Police,
            confidence: 0.6,
            matched_terms: vec!["theft".to_string()],
        });

        assert_eq!(metrics.classifications.with_label_values(&["fallback"]).get(), 1.0);
        assert_eq!(metrics.classifications.with_label_values(&["matched"]).get(), 1.0);
        assert_eq!(
            metrics.suggested_departments.with_label_values(&["Police"]).get(),
            1.0
        );
    }

    #[test]
    fn test_export_uses_own_registry() {
        let metrics = Metrics::new().unwrap();
        metrics.record_grievance_created("heuristic");
        metrics.record_ai_request("disabled");

        let text = metrics.export_prometheus();
        assert!(text.contains("grievances_created_total"));
        assert!(text.contains("ai_requests_total"));
    }
}
