// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    GENERATOR_CALLS,
    GENERATOR_DURATION,
    ANSWER_CACHE_OPERATIONS,
    ANSWER_CACHE_ENTRIES,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, source: &str, duration_secs: f64) {
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status_code.to_string(), source])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint, &status_code.to_string()])
        .observe(duration_secs);
}

/// Helper to record generative API call metrics
pub fn record_generator_call(model: &str, success: bool, duration_secs: f64) {
    let outcome = if success { "success" } else { "failure" };
    GENERATOR_CALLS
        .with_label_values(&[model, outcome])
        .inc();

    GENERATOR_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record answer cache lookups (`hit` or `miss`)
pub fn record_answer_cache(operation: &str) {
    ANSWER_CACHE_OPERATIONS.with_label_values(&[operation]).inc();
}

pub fn update_answer_cache_entries(count: usize) {
    ANSWER_CACHE_ENTRIES.set(count as f64);
}
