//! Validate the UI string bundles.
//!
//! Builds the translation cache (including the optional overrides file
//! from `TRANSLATIONS_FILE`) and validates every enabled non-default
//! locale bundle against the default bundle. Exits non-zero when a bundle
//! has errors, so it can run in CI.

use anyhow::Result;
use ethix_site::i18n::{BundleValidator, Locale, LocaleRegistry, TranslationCache};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cache = match std::env::var("TRANSLATIONS_FILE").ok() {
        Some(file) => TranslationCache::with_overrides_file(&file)?,
        None => TranslationCache::builtin(),
    };

    let registry = LocaleRegistry::get();
    let default_code = registry.default_locale().code;
    let empty = std::collections::HashMap::new();
    let default_bundle = cache.bundle(default_code).unwrap_or(&empty);

    let mut failed = false;
    for config in registry.list_enabled() {
        if config.code == default_code {
            continue;
        }

        let locale = Locale::from_code(config.code)?;
        let bundle = cache.bundle(locale.code()).unwrap_or(&empty);
        let report = BundleValidator::validate_bundle(locale.code(), default_bundle, bundle);

        println!(
            "{} {} ({}): {} errors, {} warnings",
            config.flag_glyph,
            config.display_name,
            config.code,
            report.errors.len(),
            report.warnings.len()
        );
        for error in &report.errors {
            println!("  error: {}", error);
        }
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }

        if report.has_errors() {
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }

    println!("All bundles OK");
    Ok(())
}
