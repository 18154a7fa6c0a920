//! Localization metrics and observability module.
//!
//! Tracks how often UI string lookups hit their locale bundle, how often
//! field resolution had to fall back past the requested locale, and how
//! the CMS boundary is behaving. Served at `/admin/metrics`.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global localization metrics singleton.
pub struct LocalizationMetrics {
    /// String lookups satisfied by the requested locale's bundle
    string_hits: AtomicUsize,

    /// String lookups that missed the requested locale's bundle
    string_misses: AtomicUsize,

    /// Field resolutions that fell back past the requested locale override
    field_fallbacks: AtomicUsize,

    /// Number of CMS fetches issued
    cms_fetches: AtomicUsize,

    /// Number of CMS fetches that failed
    cms_failures: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<LocalizationMetrics> = OnceLock::new();

impl LocalizationMetrics {
    /// Get the global localization metrics instance.
    pub fn global() -> &'static LocalizationMetrics {
        METRICS.get_or_init(|| LocalizationMetrics {
            string_hits: AtomicUsize::new(0),
            string_misses: AtomicUsize::new(0),
            field_fallbacks: AtomicUsize::new(0),
            cms_fetches: AtomicUsize::new(0),
            cms_failures: AtomicUsize::new(0),
        })
    }

    /// Record a string lookup satisfied by the requested locale's bundle.
    pub fn record_string_hit(&self) {
        self.string_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a string lookup that missed the requested locale's bundle.
    pub fn record_string_miss(&self) {
        self.string_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a field resolution that used a fallback tier.
    pub fn record_field_fallback(&self) {
        self.field_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a CMS fetch.
    pub fn record_cms_fetch(&self) {
        self.cms_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed CMS fetch.
    pub fn record_cms_failure(&self) {
        self.cms_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn string_hits(&self) -> usize {
        self.string_hits.load(Ordering::Relaxed)
    }

    pub fn string_misses(&self) -> usize {
        self.string_misses.load(Ordering::Relaxed)
    }

    pub fn field_fallbacks(&self) -> usize {
        self.field_fallbacks.load(Ordering::Relaxed)
    }

    pub fn cms_fetches(&self) -> usize {
        self.cms_fetches.load(Ordering::Relaxed)
    }

    pub fn cms_failures(&self) -> usize {
        self.cms_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.string_hits();
        let misses = self.string_misses();
        let total_lookups = hits + misses;
        let string_hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        let fetches = self.cms_fetches();
        let failures = self.cms_failures();
        let cms_success_rate = if fetches > 0 {
            ((fetches - failures) as f64 / fetches as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            string_hits: hits,
            string_misses: misses,
            string_hit_rate,
            field_fallbacks: self.field_fallbacks(),
            cms_fetches: fetches,
            cms_failures: failures,
            cms_success_rate,
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.string_hits.store(0, Ordering::Relaxed);
        self.string_misses.store(0, Ordering::Relaxed);
        self.field_fallbacks.store(0, Ordering::Relaxed);
        self.cms_fetches.store(0, Ordering::Relaxed);
        self.cms_failures.store(0, Ordering::Relaxed);
    }
}

/// Metrics report containing current localization statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// String lookups satisfied by the requested locale's bundle
    pub string_hits: usize,

    /// String lookups that missed the requested locale's bundle
    pub string_misses: usize,

    /// Bundle hit rate as a percentage (0-100)
    pub string_hit_rate: f64,

    /// Field resolutions that fell back past the requested locale
    pub field_fallbacks: usize,

    /// CMS fetches issued
    pub cms_fetches: usize,

    /// CMS fetches that failed
    pub cms_failures: usize,

    /// CMS success rate as a percentage (0-100)
    pub cms_success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Helper to reset metrics before each test
    fn reset_metrics() {
        LocalizationMetrics::global().reset();
    }

    // ==================== Counter Tests ====================

    #[test]
    #[serial]
    fn test_record_string_hit() {
        reset_metrics();
        let metrics = LocalizationMetrics::global();

        assert_eq!(metrics.string_hits(), 0);
        metrics.record_string_hit();
        assert_eq!(metrics.string_hits(), 1);
        metrics.record_string_hit();
        assert_eq!(metrics.string_hits(), 2);
    }

    #[test]
    #[serial]
    fn test_record_string_miss() {
        reset_metrics();
        let metrics = LocalizationMetrics::global();

        assert_eq!(metrics.string_misses(), 0);
        metrics.record_string_miss();
        assert_eq!(metrics.string_misses(), 1);
    }

    #[test]
    #[serial]
    fn test_record_field_fallback() {
        reset_metrics();
        let metrics = LocalizationMetrics::global();

        metrics.record_field_fallback();
        assert_eq!(metrics.field_fallbacks(), 1);
    }

    #[test]
    #[serial]
    fn test_record_cms_fetch_and_failure() {
        reset_metrics();
        let metrics = LocalizationMetrics::global();

        metrics.record_cms_fetch();
        metrics.record_cms_failure();
        assert_eq!(metrics.cms_fetches(), 1);
        assert_eq!(metrics.cms_failures(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    #[serial]
    fn test_report_empty() {
        reset_metrics();
        let report = LocalizationMetrics::global().report();

        assert_eq!(report.string_hits, 0);
        assert_eq!(report.string_misses, 0);
        assert_eq!(report.string_hit_rate, 0.0);
        assert_eq!(report.cms_fetches, 0);
        assert_eq!(report.cms_success_rate, 0.0);
    }

    #[test]
    #[serial]
    fn test_report_string_hit_rate() {
        reset_metrics();
        let metrics = LocalizationMetrics::global();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_string_hit();
        metrics.record_string_hit();
        metrics.record_string_hit();
        metrics.record_string_miss();

        let report = metrics.report();
        assert_eq!(report.string_hits, 3);
        assert_eq!(report.string_misses, 1);
        assert_eq!(report.string_hit_rate, 75.0);
    }

    #[test]
    #[serial]
    fn test_report_cms_success_rate() {
        reset_metrics();
        let metrics = LocalizationMetrics::global();

        // 4 fetches, 1 failure = 75% success rate
        metrics.record_cms_fetch();
        metrics.record_cms_fetch();
        metrics.record_cms_fetch();
        metrics.record_cms_fetch();
        metrics.record_cms_failure();

        let report = metrics.report();
        assert_eq!(report.cms_fetches, 4);
        assert_eq!(report.cms_failures, 1);
        assert_eq!(report.cms_success_rate, 75.0);
    }

    #[test]
    #[serial]
    fn test_report_serializes() {
        reset_metrics();
        let report = LocalizationMetrics::global().report();
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json.get("string_hit_rate").is_some());
        assert!(json.get("cms_success_rate").is_some());
    }

    // ==================== Singleton Tests ====================

    #[test]
    #[serial]
    fn test_global_returns_same_instance() {
        let metrics1 = LocalizationMetrics::global();
        let metrics2 = LocalizationMetrics::global();

        // Should return the same instance (same memory address)
        assert!(std::ptr::eq(metrics1, metrics2));
    }
}
