//! Locale type: Flexible, validated locale representation.
//!
//! This module provides the `Locale` type, a small copyable handle that is
//! always backed by an entry in the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};

/// A validated locale.
///
/// This type represents a locale that has been validated against the
/// registry. It ensures that only supported, enabled locales can be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    /// ISO 639-1 locale code (e.g., "en", "fr")
    code: &'static str,
}

impl Locale {
    /// Constant for English, the default locale.
    pub const ENGLISH: Locale = Locale { code: "en" };

    /// Constant for French.
    pub const FRENCH: Locale = Locale { code: "fr" };

    /// Create a Locale from a locale code string.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 locale code (e.g., "en", "fr")
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is valid and the locale is enabled
    /// * `Err` if the code is not found or the locale is disabled
    pub fn from_code(code: &str) -> Result<Locale> {
        let registry = LocaleRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale {
                code: config.code, // Use the static str from the registry
            }),
            Some(_) => bail!("Locale '{}' is not enabled", code),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// Create a Locale from a code string, substituting the default locale
    /// for unknown, disabled, or malformed codes.
    ///
    /// This is the fail-soft constructor used throughout the HTTP layer:
    /// an unsupported locale is a routine condition, never an error.
    pub fn from_code_or_default(code: &str) -> Locale {
        Locale::from_code(code).unwrap_or_else(|_| Locale::default_locale())
    }

    /// Get the default locale from the registry.
    pub fn default_locale() -> Locale {
        let config = LocaleRegistry::get().default_locale();
        Locale { code: config.code }
    }

    /// Get the ISO 639-1 locale code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the locale code is not found in the registry. This should
    /// never happen if the Locale was constructed properly (via `from_code`
    /// or constants).
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    /// Get the display name of the locale (e.g., "English", "Français").
    pub fn display_name(&self) -> &'static str {
        self.config().display_name
    }

    /// Get the flag glyph shown next to the display name.
    pub fn flag_glyph(&self) -> &'static str {
        self.config().flag_glyph
    }

    /// Check if this is the default locale.
    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}
