// src/metrics.rs

#[cfg(feature = "observability")]
pub use metrics::{counter, describe_counter, describe_gauge, gauge, Unit};

// NOTE: When observability feature is disabled, provide stub implementations
#[cfg(not(feature = "observability"))]
pub enum Unit {}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! counter {
    ($name:expr, $value:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
    ($name:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! gauge {
    ($name:expr, $value:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! describe_counter {
    ($name:expr, $unit:expr, $desc:expr) => {};
    ($name:expr, $desc:expr) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! describe_gauge {
    ($name:expr, $desc:expr) => {};
}

// Re-export macros for use in this module when observability is disabled
#[cfg(not(feature = "observability"))]
use crate::{counter, describe_counter, describe_gauge, gauge};

/// Initializes the descriptions for all the metrics in the application.
/// This should be called once at startup.
pub fn describe_metrics() {
    describe_counter!(
        "lookup_cache_hits_total",
        "Total lookup cache hits, labeled by cache kind."
    );
    describe_counter!(
        "lookup_cache_miss_total",
        "Total lookup cache misses, labeled by cache kind."
    );
    describe_gauge!(
        "lookup_cache_size_gauge",
        "Current number of entries held by the lookup cache."
    );
    describe_counter!(
        "directory_api_calls_total",
        "Total directory API requests, labeled by endpoint."
    );
    describe_counter!(
        "directory_api_failures_total",
        "Total failed directory API requests, labeled by endpoint."
    );
}

pub fn increment_cache_hit(cache_name: &str) {
    counter!("lookup_cache_hits_total", 1, "cache" => cache_name.to_string());
}

pub fn increment_cache_miss(cache_name: &str) {
    counter!("lookup_cache_miss_total", 1, "cache" => cache_name.to_string());
}

pub fn set_cache_size(size: f64) {
    gauge!("lookup_cache_size_gauge", size);
}

pub fn increment_api_call(endpoint: &str) {
    counter!("directory_api_calls_total", 1, "endpoint" => endpoint.to_string());
}

pub fn increment_api_failure(endpoint: &str) {
    counter!("directory_api_failures_total", 1, "endpoint" => endpoint.to_string());
}
