//! Internationalization (i18n) module for multi-locale support.
//!
//! This module provides a centralized, extensible architecture for serving
//! the site in multiple locales. All locale-related logic, path handling,
//! content resolution, localized strings, and translation infrastructure is
//! contained here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `locale`: Type-safe Locale type validated against the registry
//! - `path`: Conversion between locale-agnostic and locale-prefixed paths
//! - `negotiate`: Cookie and Accept-Language locale negotiation
//! - `resolve`: Field resolution and document merging for CMS content
//! - `strings`: Localized UI string bundles with a missing-translation sentinel
//! - `validator`: Bundle quality validation
//! - `metrics`: Localization observability and metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{path, Locale};
//!
//! let locale = Locale::from_code_or_default("fr");
//! let href = path::with_locale("/products?category=home", locale);
//! assert_eq!(href, "/fr/products?category=home");
//! ```

mod locale;
mod metrics;
pub mod negotiate;
pub mod path;
mod registry;
pub mod resolve;
mod strings;
mod validator;

pub use locale::Locale;
pub use metrics::{LocalizationMetrics, MetricsReport};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::{BundleOverrides, Resolved, TranslationCache};
pub use validator::{BundleValidator, ValidationReport};
