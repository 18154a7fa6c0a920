//! Path localizer: conversion between locale-agnostic and locale-prefixed
//! paths.
//!
//! Every user-facing path on the site starts with a locale segment
//! (`/fr/products`). These helpers are pure, idempotent, and preserve query
//! strings verbatim: the query is never part of segment matching.

use crate::i18n::{Locale, LocaleRegistry};

/// Split a path into its segment portion and an optional query string.
///
/// The query string includes the leading `?` so it can be re-appended
/// verbatim.
fn split_query(path: &str) -> (&str, &str) {
    match path.find('?') {
        Some(idx) => path.split_at(idx),
        None => (path, ""),
    }
}

/// Return the first path segment, if any.
fn first_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Check whether a segment is a registered locale code.
///
/// Disabled codes still count as locale segments for stripping purposes,
/// so a stale `/es/...` link never ends up double-prefixed.
fn is_locale_segment(segment: &str) -> bool {
    LocaleRegistry::get().get_by_code(segment).is_some()
}

/// Remove a leading locale segment from a path, if one is present.
///
/// Paths without a locale prefix are returned unchanged. The result always
/// starts with `/`; the query string is preserved verbatim.
pub fn strip_locale(path: &str) -> String {
    let (path_part, query) = split_query(path);

    let stripped = match first_segment(path_part) {
        Some(segment) if is_locale_segment(segment) => {
            let rest = &path_part.trim_start_matches('/')[segment.len()..];
            if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            }
        }
        _ if path_part.is_empty() => "/".to_string(),
        _ if !path_part.starts_with('/') => format!("/{}", path_part),
        _ => path_part.to_string(),
    };

    format!("{}{}", stripped, query)
}

/// Prefix a path with the given locale, replacing any existing locale
/// segment.
///
/// Guarantees the result starts with exactly one locale segment followed by
/// the unprefixed path. Idempotent: re-localizing to the same locale is a
/// no-op, re-localizing to another locale replaces only the first segment.
pub fn with_locale(path: &str, locale: Locale) -> String {
    let stripped = strip_locale(path);
    let (path_part, query) = split_query(&stripped);

    if path_part == "/" {
        format!("/{}{}", locale.code(), query)
    } else {
        format!("/{}{}{}", locale.code(), path_part, query)
    }
}

/// Extract the locale from a path.
///
/// Returns the first path segment when it is a known, enabled locale code;
/// otherwise the default locale (fail-soft, per the site-wide error
/// policy).
pub fn extract_locale(path: &str) -> Locale {
    let (path_part, _) = split_query(path);

    match first_segment(path_part) {
        Some(segment) => Locale::from_code_or_default(segment),
        None => Locale::default_locale(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== strip_locale Tests ====================

    #[test]
    fn test_strip_locale_prefixed() {
        assert_eq!(strip_locale("/fr/products"), "/products");
        assert_eq!(strip_locale("/en/about"), "/about");
    }

    #[test]
    fn test_strip_locale_unprefixed() {
        assert_eq!(strip_locale("/products"), "/products");
    }

    #[test]
    fn test_strip_locale_bare_locale() {
        assert_eq!(strip_locale("/fr"), "/");
        assert_eq!(strip_locale("/en"), "/");
    }

    #[test]
    fn test_strip_locale_root() {
        assert_eq!(strip_locale("/"), "/");
    }

    #[test]
    fn test_strip_locale_empty() {
        assert_eq!(strip_locale(""), "/");
    }

    #[test]
    fn test_strip_locale_disabled_code_still_stripped() {
        // Stale links to a disabled locale must not double-prefix.
        assert_eq!(strip_locale("/es/products"), "/products");
    }

    #[test]
    fn test_strip_locale_non_locale_segment() {
        assert_eq!(strip_locale("/fresh/products"), "/fresh/products");
    }

    #[test]
    fn test_strip_locale_preserves_query() {
        assert_eq!(
            strip_locale("/fr/products?category=home&page=2"),
            "/products?category=home&page=2"
        );
    }

    #[test]
    fn test_strip_locale_query_on_bare_locale() {
        assert_eq!(strip_locale("/fr?ref=nav"), "/?ref=nav");
    }

    // ==================== with_locale Tests ====================

    #[test]
    fn test_with_locale_unprefixed() {
        assert_eq!(with_locale("/products", Locale::FRENCH), "/fr/products");
    }

    #[test]
    fn test_with_locale_replaces_existing() {
        assert_eq!(with_locale("/en/products", Locale::FRENCH), "/fr/products");
    }

    #[test]
    fn test_with_locale_idempotent() {
        let once = with_locale("/products", Locale::FRENCH);
        let twice = with_locale(&once, Locale::FRENCH);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_with_locale_root() {
        assert_eq!(with_locale("/", Locale::FRENCH), "/fr");
    }

    #[test]
    fn test_with_locale_empty() {
        assert_eq!(with_locale("", Locale::ENGLISH), "/en");
    }

    #[test]
    fn test_with_locale_preserves_query() {
        assert_eq!(
            with_locale("/products?category=home", Locale::FRENCH),
            "/fr/products?category=home"
        );
    }

    #[test]
    fn test_with_locale_query_on_root() {
        assert_eq!(with_locale("/?ref=nav", Locale::FRENCH), "/fr?ref=nav");
    }

    // ==================== extract_locale Tests ====================

    #[test]
    fn test_extract_locale_prefixed() {
        assert_eq!(extract_locale("/fr/products"), Locale::FRENCH);
        assert_eq!(extract_locale("/en/products"), Locale::ENGLISH);
    }

    #[test]
    fn test_extract_locale_unprefixed_defaults() {
        assert_eq!(extract_locale("/products"), Locale::ENGLISH);
    }

    #[test]
    fn test_extract_locale_root_defaults() {
        assert_eq!(extract_locale("/"), Locale::ENGLISH);
        assert_eq!(extract_locale(""), Locale::ENGLISH);
    }

    #[test]
    fn test_extract_locale_disabled_defaults() {
        assert_eq!(extract_locale("/es/products"), Locale::ENGLISH);
    }

    #[test]
    fn test_extract_locale_ignores_query() {
        assert_eq!(extract_locale("/fr?ref=nav"), Locale::FRENCH);
    }

    // ==================== Property Tests ====================

    /// Unprefixed path segments: lowercase alphanumeric, never a locale code.
    fn unprefixed_path() -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-z0-9-]{3,8}", 0..4)
            .prop_map(|segments| format!("/{}", segments.join("/")))
            .prop_filter("first segment must not be a locale code", |path| {
                first_segment(path).map_or(true, |s| !is_locale_segment(s))
            })
    }

    fn enabled_locale() -> impl Strategy<Value = Locale> {
        prop_oneof![Just(Locale::ENGLISH), Just(Locale::FRENCH)]
    }

    proptest! {
        #[test]
        fn prop_extract_inverts_with_locale(path in unprefixed_path(), locale in enabled_locale()) {
            let localized = with_locale(&path, locale);
            prop_assert_eq!(extract_locale(&localized), locale);
        }

        #[test]
        fn prop_with_locale_idempotent(path in unprefixed_path(), locale in enabled_locale()) {
            let once = with_locale(&path, locale);
            let twice = with_locale(&once, locale);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_strip_then_with_roundtrip(path in unprefixed_path(), locale in enabled_locale()) {
            let localized = with_locale(&path, locale);
            let expected = if path == "/" { "/".to_string() } else { path };
            prop_assert_eq!(strip_locale(&localized), expected);
        }
    }
}
