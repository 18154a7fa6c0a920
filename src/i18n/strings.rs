//! Localized UI strings for the site chrome.
//!
//! Bundles are keyed by locale code and hold the strings the frontend
//! needs outside of CMS content (navigation labels, error states, the
//! compare view). Built-in bundles can be extended or patched at startup
//! with a JSON overrides file, so copy fixes do not require a rebuild.
//!
//! The cache is an explicit object owned by the router state. It is built
//! once at startup and only read afterwards; nothing here is a module
//! global, so no state can leak across requests.
//!
//! Lookups return a [`Resolved`] sentinel instead of echoing the key into
//! the value channel: callers that want the legacy render-the-key
//! behavior ask for it explicitly via [`Resolved::or_key`].

use crate::i18n::{Locale, LocalizationMetrics};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Built-in bundle entries: `(key, english, french)`.
///
/// Strings may contain `{placeholder}` tokens; the validator checks that
/// translations preserve them.
const BUILTIN_ENTRIES: &[(&str, &str, &str)] = &[
    ("nav.home", "Home", "Accueil"),
    ("nav.products", "Products", "Produits"),
    ("nav.blog", "Blog", "Blog"),
    ("nav.compare", "Compare", "Comparer"),
    ("nav.about", "About Ethix", "À propos d'Ethix"),
    ("locale.switch_label", "Language", "Langue"),
    ("product.score_label", "Sustainability score: {score}", "Indice de durabilité : {score}"),
    ("product.certifications", "Certifications", "Certifications"),
    ("product.by_brand", "By {brand}", "Par {brand}"),
    ("compare.title", "Compare products", "Comparer les produits"),
    ("compare.count", "Comparing {count} products", "Comparaison de {count} produits"),
    ("compare.empty", "Select at least two products to compare", "Sélectionnez au moins deux produits à comparer"),
    ("blog.read_more", "Read more", "Lire la suite"),
    ("blog.published_on", "Published on {date}", "Publié le {date}"),
    ("error.not_found", "We couldn't find that page", "Page introuvable"),
    ("error.cms_unavailable", "Content is temporarily unavailable", "Le contenu est temporairement indisponible"),
];

/// Result of a string lookup.
///
/// `Missing` is an explicit sentinel: the caller can distinguish a real
/// value from a key echoed back as a debugging aid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A translated (or default-locale fallback) value was found.
    Found(String),
    /// No bundle carries this key.
    Missing { key: String },
}

impl Resolved {
    /// Unwrap the value, rendering missing keys as themselves.
    ///
    /// This reproduces the historical fallback-to-key behavior for display
    /// code, without overloading the lookup return type.
    pub fn or_key(self) -> String {
        match self {
            Resolved::Found(value) => value,
            Resolved::Missing { key } => key,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Resolved::Found(value) => Some(value),
            Resolved::Missing { .. } => None,
        }
    }
}

/// JSON overrides file: `{"fr": {"nav.home": "..."}}`.
#[derive(Debug, Default, Deserialize)]
pub struct BundleOverrides(HashMap<String, HashMap<String, String>>);

/// In-memory string bundles for all locales.
///
/// Owned by the application state and shared behind an `Arc`; scoped to
/// process lifetime, read-only after startup.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// locale code -> key -> value
    bundles: HashMap<String, HashMap<String, String>>,
}

impl TranslationCache {
    /// Build the cache from the built-in bundles only.
    pub fn builtin() -> Self {
        let mut bundles: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (key, english, french) in BUILTIN_ENTRIES {
            bundles
                .entry("en".to_string())
                .or_default()
                .insert((*key).to_string(), (*english).to_string());
            bundles
                .entry("fr".to_string())
                .or_default()
                .insert((*key).to_string(), (*french).to_string());
        }
        Self { bundles }
    }

    /// Build the cache from the built-in bundles plus a JSON overrides
    /// file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file of shape `{locale: {key: value}}`
    pub fn with_overrides_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read translation overrides: {}", path.display()))?;
        let overrides: BundleOverrides = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid translation overrides JSON: {}", path.display()))?;

        let mut cache = Self::builtin();
        cache.apply_overrides(overrides);
        Ok(cache)
    }

    /// Merge an overrides set on top of the current bundles.
    pub fn apply_overrides(&mut self, overrides: BundleOverrides) {
        for (code, entries) in overrides.0 {
            let bundle = self.bundles.entry(code).or_default();
            for (key, value) in entries {
                bundle.insert(key, value);
            }
        }
    }

    /// Get the raw bundle for a locale code, if one exists.
    pub fn bundle(&self, code: &str) -> Option<&HashMap<String, String>> {
        self.bundles.get(code)
    }

    /// Look up a string for a locale.
    ///
    /// Falls back to the default-locale bundle when the requested bundle
    /// lacks the key; returns `Resolved::Missing` only when no bundle
    /// carries it. Hit/miss counts feed the localization metrics.
    pub fn lookup(&self, locale: Locale, key: &str) -> Resolved {
        let metrics = LocalizationMetrics::global();

        if let Some(value) = self.bundles.get(locale.code()).and_then(|b| b.get(key)) {
            metrics.record_string_hit();
            return Resolved::Found(value.clone());
        }

        metrics.record_string_miss();
        let default_code = Locale::default_locale().code();
        if let Some(value) = self.bundles.get(default_code).and_then(|b| b.get(key)) {
            return Resolved::Found(value.clone());
        }

        Resolved::Missing {
            key: key.to_string(),
        }
    }

    /// Produce the complete resolved bundle for a locale: every
    /// default-locale key, overlaid with the locale's own values.
    pub fn resolved_bundle(&self, locale: Locale) -> HashMap<String, String> {
        let default_code = Locale::default_locale().code();
        let mut resolved = self.bundles.get(default_code).cloned().unwrap_or_default();

        if locale.code() != default_code {
            if let Some(bundle) = self.bundles.get(locale.code()) {
                for (key, value) in bundle {
                    resolved.insert(key.clone(), value.clone());
                }
            }
        }

        resolved
    }
}
