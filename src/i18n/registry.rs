//! Locale registry: Single source of truth for all supported locales.
//!
//! This module provides a centralized registry of every locale the site can
//! serve. It uses a singleton pattern with `OnceLock` to ensure thread-safe
//! initialization and access.

use std::sync::OnceLock;

/// Hardcoded fallback used if no registry entry is marked as default.
const FALLBACK_DEFAULT_CODE: &str = "en";

/// Configuration for a supported locale.
///
/// Contains all metadata and settings for a specific locale, including
/// its code, display name, flag glyph, enabled status, and whether it is
/// the default locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 locale code (e.g., "en", "fr")
    pub code: &'static str,

    /// Display name shown in the language switcher (e.g., "English", "Français")
    pub display_name: &'static str,

    /// Flag glyph shown next to the display name
    pub flag_glyph: &'static str,

    /// Whether this is the default locale (only one should be true)
    pub is_default: bool,

    /// Whether this locale is enabled for serving
    pub enabled: bool,
}

/// Global locale registry singleton.
///
/// The registry contains all supported locales and provides methods to query
/// and access them. It is initialized once on first access and remains
/// immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 locale code (e.g., "en", "fr")
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists
    /// * `None` if the locale is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all enabled locales, in registry order.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales
            .iter()
            .filter(|locale| locale.enabled)
            .collect()
    }

    /// Get all locales (including disabled ones).
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the default locale configuration.
    ///
    /// The default locale is the ultimate fallback for every resolution
    /// step. If no entry is marked as default (a configuration mistake,
    /// not a request-time condition), the hardcoded fallback code is used.
    pub fn default_locale(&self) -> &LocaleConfig {
        self.locales
            .iter()
            .find(|locale| locale.is_default && locale.enabled)
            .or_else(|| self.get_by_code(FALLBACK_DEFAULT_CODE))
            .expect("registry must contain the fallback default locale")
    }

    /// Check if a locale code is supported and enabled.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 locale code to check
    ///
    /// # Returns
    /// `true` if the locale exists and is enabled, `false` otherwise.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }
}

/// Default locale configurations.
///
/// The set of valid codes is fixed at deploy time; it is not user-extensible
/// at runtime. Currently serves English (default) and French; Spanish is
/// registered but not yet enabled.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            display_name: "English",
            flag_glyph: "🇬🇧",
            is_default: true,
            enabled: true,
        },
        LocaleConfig {
            code: "fr",
            display_name: "Français",
            flag_glyph: "🇫🇷",
            is_default: false,
            enabled: true,
        },
        LocaleConfig {
            code: "es",
            display_name: "Español",
            flag_glyph: "🇪🇸",
            is_default: false,
            enabled: false,
        },
    ]
}
