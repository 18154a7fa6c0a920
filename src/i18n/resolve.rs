//! Field resolution and document merging for CMS content.
//!
//! CMS documents may carry a per-locale override map under the reserved
//! `localeOverrides` key, where each entry is a partial override of the
//! document's base fields. Resolution precedence for field `F` at locale
//! `L`, applied consistently everywhere:
//!
//! 1. `localeOverrides[L][F]` if present and non-null,
//! 2. the base field `doc[F]` if present and non-null,
//! 3. `localeOverrides[default][F]` when `L` is not the default locale,
//! 4. otherwise `None`.
//!
//! Missing localized content is a routine condition (editors have not yet
//! translated a field), so absence is modeled as `None`, never an error.
//! Localized documents are transient read-side projections: inputs are
//! never mutated and the override map is stripped from the output.

use crate::i18n::{Locale, LocalizationMetrics};
use serde_json::{Map, Value};

/// Reserved key holding the per-locale override map on a document.
pub const OVERRIDES_KEY: &str = "localeOverrides";

/// Look up `localeOverrides[code][field]`, treating null as absent.
fn override_field<'a>(doc: &'a Value, code: &str, field: &str) -> Option<&'a Value> {
    doc.get(OVERRIDES_KEY)?
        .get(code)?
        .get(field)
        .filter(|value| !value.is_null())
}

/// Resolve a single field on a document for the requested locale.
///
/// # Arguments
/// * `doc` - The document, which may be absent entirely
/// * `field` - The field name to resolve
/// * `locale` - The requested locale
///
/// # Returns
/// The resolved value of whatever type was stored (string, rich-text block
/// array, or reference), or `None` if no precedence tier yields a value.
pub fn resolve_field<'a>(doc: Option<&'a Value>, field: &str, locale: Locale) -> Option<&'a Value> {
    let doc = doc?;

    if let Some(value) = override_field(doc, locale.code(), field) {
        return Some(value);
    }

    if let Some(value) = doc.get(field).filter(|value| !value.is_null()) {
        return Some(value);
    }

    if !locale.is_default() {
        if let Some(value) = override_field(doc, Locale::default_locale().code(), field) {
            LocalizationMetrics::global().record_field_fallback();
            return Some(value);
        }
    }

    None
}

/// The set of field names that have an override entry for either the
/// requested or the default locale.
fn overridable_fields(doc: &Map<String, Value>, locale: Locale) -> Vec<String> {
    let mut fields = Vec::new();
    let overrides = match doc.get(OVERRIDES_KEY) {
        Some(Value::Object(map)) => map,
        _ => return fields,
    };

    let default_code = Locale::default_locale().code();
    for code in [locale.code(), default_code] {
        if let Some(Value::Object(entry)) = overrides.get(code) {
            for field in entry.keys() {
                if !fields.iter().any(|known| known == field) {
                    fields.push(field.clone());
                }
            }
        }
    }
    fields
}

/// Merge one object level: replace every overridable field with its
/// resolved value and strip the override map from the projection.
fn merge_level(doc: &Map<String, Value>, locale: Locale) -> Map<String, Value> {
    let wrapped = Value::Object(doc.clone());

    let mut merged: Map<String, Value> = doc
        .iter()
        .filter(|(key, _)| key.as_str() != OVERRIDES_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    for field in overridable_fields(doc, locale) {
        if let Some(resolved) = resolve_field(Some(&wrapped), &field, locale) {
            merged.insert(field, resolved.clone());
        }
    }

    merged
}

/// Produce a localized flat copy of a document.
///
/// This is a shallow, one-level merge: nested arrays of sub-documents are
/// left untouched. Use [`localize_value`] when nested collections carry
/// their own override maps. Non-object values are returned unchanged.
pub fn localize_document(doc: &Value, locale: Locale) -> Value {
    match doc {
        Value::Object(map) => Value::Object(merge_level(map, locale)),
        other => other.clone(),
    }
}

/// Recursively localize a value.
///
/// The same merge is applied at every level: objects are merged and their
/// remaining fields localized in turn, array elements are localized one at
/// a time. This is the single helper shared by top-level documents and
/// their nested collections (e.g., an array of criteria objects, each with
/// its own override map).
pub fn localize_value(value: &Value, locale: Locale) -> Value {
    match value {
        Value::Object(map) => {
            let merged = merge_level(map, locale);
            let localized = merged
                .into_iter()
                .map(|(key, value)| (key, localize_value(&value, locale)))
                .collect();
            Value::Object(localized)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| localize_value(item, locale))
                .collect(),
        ),
        other => other.clone(),
    }
}
