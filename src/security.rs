//! Guards for the admin surface.

use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks.
/// Use this for comparing the admin API key and other sensitive values.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check a presented API key against the configured one.
///
/// Returns `false` when no key is configured (the admin surface is
/// disabled entirely) or when the presented key is absent or wrong.
pub fn api_key_allows(configured: Option<&str>, presented: Option<&str>) -> bool {
    match (configured, presented) {
        (Some(expected), Some(given)) => constant_time_compare(expected, given),
        _ => false,
    }
}
