//! Bundle validation module.
//!
//! Validates translated UI strings against the default-locale bundle:
//! `{placeholder}` tokens must survive translation, and each locale bundle
//! is checked for keys it is missing or that no longer exist.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical problems (e.g., dropped placeholders)
    pub errors: Vec<String>,

    /// Non-critical issues (e.g., untranslated keys)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Fold another report's findings into this one.
    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for UI string bundles.
pub struct BundleValidator;

// Placeholder pattern, cached for reuse across validations
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl BundleValidator {
    /// Validate that a translated string preserves the placeholders of the
    /// original.
    ///
    /// # Arguments
    /// * `original` - The default-locale string
    /// * `translated` - The translated string
    ///
    /// # Returns
    /// A `ValidationReport`; a placeholder set mismatch is an error because
    /// the frontend substitutes by name at render time.
    pub fn validate_string(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut orig_placeholders = Self::extract_placeholders(original);
        let mut trans_placeholders = Self::extract_placeholders(translated);
        orig_placeholders.sort();
        trans_placeholders.sort();

        if orig_placeholders != trans_placeholders {
            report.errors.push(format!(
                "Placeholder mismatch: original has {:?}, translation has {:?}",
                orig_placeholders, trans_placeholders
            ));
        }

        report
    }

    /// Validate a locale bundle against the default-locale bundle.
    ///
    /// Checks every shared key for placeholder preservation, warns about
    /// keys missing from the locale bundle (untranslated, will fall back),
    /// and warns about keys unknown to the default bundle (stale).
    pub fn validate_bundle(
        locale_code: &str,
        default_bundle: &HashMap<String, String>,
        locale_bundle: &HashMap<String, String>,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut keys: Vec<&String> = default_bundle.keys().collect();
        keys.sort();

        for key in keys {
            match locale_bundle.get(key) {
                Some(translated) => {
                    let mut string_report =
                        Self::validate_string(&default_bundle[key], translated);
                    for error in &mut string_report.errors {
                        *error = format!("[{}] {}: {}", locale_code, key, error);
                    }
                    report.merge(string_report);
                }
                None => {
                    report.warnings.push(format!(
                        "[{}] {}: missing, will fall back to the default locale",
                        locale_code, key
                    ));
                }
            }
        }

        let mut stale: Vec<&String> = locale_bundle
            .keys()
            .filter(|key| !default_bundle.contains_key(*key))
            .collect();
        stale.sort();
        for key in stale {
            report.warnings.push(format!(
                "[{}] {}: not present in the default bundle",
                locale_code, key
            ));
        }

        report
    }

    /// Extract all `{placeholder}` tokens from a string
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(0).map(|m| m.as_str().to_string()))
            .collect()
    }
}
