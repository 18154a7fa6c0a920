//! Catalog content: typed models and fetch/browse helpers.
//!
//! Documents come out of the CMS as JSON, get localized by
//! `i18n::resolve`, and are then deserialized into the typed read-side
//! models below. The models never carry an override map; localization has
//! already flattened it away by the time deserialization happens.

use crate::cms::CmsClient;
use crate::i18n::{resolve, Locale};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// Query for the full product listing, with brand and certifications
/// dereferenced inline.
const PRODUCTS_QUERY: &str =
    r#"*[_type == "product"]{..., brand->, certifications[]->}"#;

/// Query for a single product by slug.
const PRODUCT_BY_SLUG_QUERY: &str =
    r#"*[_type == "product" && slug.current == $slug][0]{..., brand->, certifications[]->}"#;

/// Query for the blog post listing.
const POSTS_QUERY: &str = r#"*[_type == "post"]{..., author->}"#;

/// Query for a single blog post by slug.
const POST_BY_SLUG_QUERY: &str =
    r#"*[_type == "post" && slug.current == $slug][0]{..., author->}"#;

/// A sustainability-rated product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Overall sustainability score, 0-100
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Browse filters for the product listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_score: Option<f64>,
}

impl ProductFilter {
    /// Check whether a product passes the filter.
    ///
    /// A product with no score fails any `min_score` filter: unrated
    /// products should not slip into a "rated at least N" view.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(min_score) = self.min_score {
            match product.score {
                Some(score) if score >= min_score => {}
                _ => return false,
            }
        }
        true
    }

    /// Apply the filter to a listing.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products
            .into_iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

/// Localize a fetched document and deserialize it into a typed model.
fn decode<T: DeserializeOwned>(value: &Value, locale: Locale, what: &str) -> Result<T> {
    let localized = resolve::localize_value(value, locale);
    serde_json::from_value(localized).with_context(|| format!("Failed to deserialize {}", what))
}

/// Fetch the full product listing, localized.
pub async fn fetch_products(cms: &CmsClient, locale: Locale) -> Result<Vec<Product>> {
    let result = cms.fetch(PRODUCTS_QUERY, &[]).await?;
    if result.is_null() {
        return Ok(Vec::new());
    }
    decode(&result, locale, "product list")
}

/// Fetch a single product by slug, localized.
///
/// A null CMS result means the product does not exist; that is `None`, not
/// an error.
pub async fn fetch_product_by_slug(
    cms: &CmsClient,
    slug: &str,
    locale: Locale,
) -> Result<Option<Product>> {
    let result = cms
        .fetch(PRODUCT_BY_SLUG_QUERY, &[("slug", json!(slug))])
        .await?;
    if result.is_null() {
        return Ok(None);
    }
    decode(&result, locale, "product").map(Some)
}

/// Fetch the blog post listing, localized and sorted newest-first.
pub async fn fetch_posts(cms: &CmsClient, locale: Locale) -> Result<Vec<Post>> {
    let result = cms.fetch(POSTS_QUERY, &[]).await?;
    if result.is_null() {
        return Ok(Vec::new());
    }
    let mut posts: Vec<Post> = decode(&result, locale, "post list")?;
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    Ok(posts)
}

/// Fetch a single blog post by slug, localized.
pub async fn fetch_post_by_slug(
    cms: &CmsClient,
    slug: &str,
    locale: Locale,
) -> Result<Option<Post>> {
    let result = cms
        .fetch(POST_BY_SLUG_QUERY, &[("slug", json!(slug))])
        .await?;
    if result.is_null() {
        return Ok(None);
    }
    decode(&result, locale, "post").map(Some)
}

/// Fetch the products selected for comparison, in parallel.
///
/// Slugs that do not resolve to a product are skipped with a warning; the
/// comparison renders whatever was found, ordered by descending score.
pub async fn fetch_comparison(
    cms: &CmsClient,
    slugs: &[String],
    locale: Locale,
) -> Result<Vec<Product>> {
    let fetches = slugs
        .iter()
        .map(|slug| fetch_product_by_slug(cms, slug, locale));

    let mut products = Vec::new();
    for (slug, result) in slugs.iter().zip(join_all(fetches).await) {
        match result? {
            Some(product) => products.push(product),
            None => warn!("Compare: no product found for slug '{}'", slug),
        }
    }

    Ok(rank_by_score(products))
}

/// Order products by descending sustainability score; unrated products
/// sort last.
pub fn rank_by_score(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    products
}
