use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use thiserror::Error;

/// Latency bucket boundaries in seconds. Registered once at construction;
/// dashboards and alert rules depend on these staying stable.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
}

/// HTTP request metrics backed by an owned Prometheus registry.
///
/// Constructed once at startup and carried in the application state instead
/// of a process-global static, so tests can hold isolated instances.
pub struct HttpMetrics {
    registry: Registry,
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "status", "path"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "status", "path"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        // Process metrics (open fds, RSS, CPU) ride along on the same scrape.
        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
        })
    }

    /// Record one completed request: a counter increment plus a histogram
    /// observation for the same (method, status, path) series. Both updates
    /// are atomic and infallible, so callers treat this as fire-and-forget.
    pub fn record_request(&self, method: &str, status: &str, path: &str, seconds: f64) {
        self.requests_total
            .with_label_values(&[method, status, path])
            .inc();
        self.request_duration_seconds
            .with_label_values(&[method, status, path])
            .observe(seconds);
    }

    /// Snapshot of all registered metric families for the scrape handler.
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increases_by_exactly_n() {
        let metrics = HttpMetrics::new().unwrap();
        for _ in 0..5 {
            metrics.record_request("GET", "200", "/health", 0.002);
        }
        assert_eq!(
            metrics
                .requests_total
                .with_label_values(&["GET", "200", "/health"])
                .get(),
            5
        );
    }

    #[test]
    fn series_with_different_labels_are_isolated() {
        let metrics = HttpMetrics::new().unwrap();
        metrics.record_request("POST", "201", "/foo", 0.01);
        metrics.record_request("GET", "200", "/health", 0.001);

        assert_eq!(
            metrics
                .requests_total
                .with_label_values(&["POST", "201", "/foo"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .requests_total
                .with_label_values(&["GET", "200", "/health"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .requests_total
                .with_label_values(&["GET", "404", "/health"])
                .get(),
            0
        );
    }

    #[test]
    fn histogram_tracks_count_and_sum() {
        let metrics = HttpMetrics::new().unwrap();
        metrics.record_request("GET", "200", "/health", 0.05);
        metrics.record_request("GET", "200", "/health", 0.15);

        let histogram = metrics
            .request_duration_seconds
            .with_label_values(&["GET", "200", "/health"]);
        assert_eq!(histogram.get_sample_count(), 2);
        assert!((histogram.get_sample_sum() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn gather_exposes_registered_families() {
        let metrics = HttpMetrics::new().unwrap();
        metrics.record_request("GET", "200", "/health", 0.001);

        let names: Vec<String> = metrics
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"http_requests_total".to_string()));
        assert!(names.contains(&"http_request_duration_seconds".to_string()));
    }

    #[test]
    fn instances_do_not_share_state() {
        let a = HttpMetrics::new().unwrap();
        let b = HttpMetrics::new().unwrap();
        a.record_request("GET", "200", "/health", 0.001);

        assert_eq!(
            b.requests_total
                .with_label_values(&["GET", "200", "/health"])
                .get(),
            0
        );
    }
}
