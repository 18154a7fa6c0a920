//! Locale negotiation for incoming requests.
//!
//! Decides which locale an unprefixed request should be redirected to, in
//! priority order: the locale cookie, then the `Accept-Language` header,
//! then the registry default. Every tier is fail-soft: malformed input is
//! skipped, never an error.

use crate::i18n::{Locale, LocaleRegistry};

/// Parse a `Cookie` header value and return the named cookie, if present.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() == name {
            Some(value.trim())
        } else {
            None
        }
    })
}

/// A single parsed `Accept-Language` entry.
#[derive(Debug, Clone, PartialEq)]
struct LanguageTag {
    /// Primary language subtag, lowercased (e.g., "fr" from "fr-CA")
    primary: String,
    /// Quality weight; missing or malformed `q` defaults to 1.0
    quality: f32,
}

/// Parse an `Accept-Language` header into tags ordered by descending
/// quality.
///
/// Only the primary subtag is kept, since registry codes are matched by
/// primary language. Entries with an unparseable weight keep the default
/// weight of 1.0; empty entries are dropped. The sort is stable, so equal
/// weights preserve header order.
fn parse_accept_language(header: &str) -> Vec<LanguageTag> {
    let mut tags: Vec<LanguageTag> = header
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let quality = parts
                .find_map(|param| {
                    let (key, value) = param.split_once('=')?;
                    if key.trim() == "q" {
                        value.trim().parse::<f32>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(1.0);

            let primary = tag
                .split(['-', '_'])
                .next()
                .unwrap_or(tag)
                .to_ascii_lowercase();

            Some(LanguageTag { primary, quality })
        })
        .collect();

    tags.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(std::cmp::Ordering::Equal));
    tags
}

/// Find the first enabled locale matching an `Accept-Language` header.
pub fn locale_from_accept_language(header: &str) -> Option<Locale> {
    let registry = LocaleRegistry::get();

    parse_accept_language(header)
        .into_iter()
        .find(|tag| registry.is_enabled(&tag.primary))
        .and_then(|tag| Locale::from_code(&tag.primary).ok())
}

/// Determine the locale for an unprefixed request.
///
/// # Arguments
/// * `cookie` - The raw `Cookie` header value, if any
/// * `cookie_name` - The name of the locale preference cookie
/// * `accept_language` - The raw `Accept-Language` header value, if any
///
/// # Returns
/// The negotiated locale. Never fails: every tier falls through to the
/// registry default.
pub fn negotiate_locale(
    cookie: Option<&str>,
    cookie_name: &str,
    accept_language: Option<&str>,
) -> Locale {
    // Tier 1: explicit preference stored in the cookie
    if let Some(code) = cookie.and_then(|header| cookie_value(header, cookie_name)) {
        if let Ok(locale) = Locale::from_code(code) {
            return locale;
        }
    }

    // Tier 2: browser language preference
    if let Some(locale) = accept_language.and_then(locale_from_accept_language) {
        return locale;
    }

    // Tier 3: registry default
    Locale::default_locale()
}
