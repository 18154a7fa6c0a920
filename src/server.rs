//! HTTP surface: router, locale-redirect middleware, and content handlers.
//!
//! Every page path is locale-prefixed. The middleware guarantees it: an
//! unprefixed request is redirected once to its localized counterpart,
//! chosen from the locale cookie, then the `Accept-Language` header, then
//! the registry default. Prefixed requests pass straight through, so no
//! redirect loop is possible.

use crate::catalog::{self, ProductFilter};
use crate::cms::CmsClient;
use crate::config::Config;
use crate::i18n::{negotiate, path, Locale, LocalizationMetrics, TranslationCache};
use crate::security;
use anyhow::Result;
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, OnceLock};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Prefixes exempt from locale redirection: machine endpoints, the locale
/// switcher itself, and static files.
const EXCLUDED_PREFIXES: &[&str] = &[
    "/api",
    "/admin",
    "/health",
    "/locale",
    "/static",
    "/assets",
    "/favicon.ico",
    "/robots.txt",
];

static ASSET_SUFFIX_REGEX: OnceLock<Regex> = OnceLock::new();

/// Check whether a request path bypasses locale redirection.
fn is_excluded(request_path: &str) -> bool {
    if EXCLUDED_PREFIXES.iter().any(|prefix| {
        request_path == *prefix
            || request_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }) {
        return true;
    }

    let regex = ASSET_SUFFIX_REGEX.get_or_init(|| {
        Regex::new(r"\.(css|js|map|png|jpe?g|svg|gif|ico|webp|woff2?|txt|xml)$").unwrap()
    });
    regex.is_match(request_path)
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cms: CmsClient,
    pub strings: Arc<TranslationCache>,
}

impl AppState {
    pub fn new(config: Config, cms: CmsClient, strings: TranslationCache) -> Self {
        Self {
            config,
            cms,
            strings: Arc::new(strings),
        }
    }
}

/// Error boundary for the HTTP surface.
///
/// All failures are request-scoped: a CMS outage turns into a 502 on the
/// page that needed the content, nothing more.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Cms(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Cms(e) => {
                error!("CMS failure: {:#}", e);
                (StatusCode::BAD_GATEWAY, "cms_unavailable")
            }
        };

        (status, Json(json!({"error": code}))).into_response()
    }
}

/// Locale-redirect middleware.
///
/// 1. Excluded prefixes and static assets pass through unmodified.
/// 2. Paths whose first segment is a registered locale code pass through.
/// 3. Otherwise the locale is negotiated (cookie, then header, then
///    default) and a single temporary redirect is issued to the prefixed
///    path, query string preserved.
async fn locale_redirect(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let request_path = req.uri().path().to_string();

    if is_excluded(&request_path) {
        return next.run(req).await;
    }

    let first_segment = request_path
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or("");
    if crate::i18n::LocaleRegistry::get()
        .get_by_code(first_segment)
        .is_some()
    {
        return next.run(req).await;
    }

    let cookie = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let locale = negotiate::negotiate_locale(cookie, &state.config.locale_cookie, accept_language);

    let path_and_query = match req.uri().query() {
        Some(query) => format!("{}?{}", request_path, query),
        None => request_path,
    };
    let target = path::with_locale(&path_and_query, locale);

    Redirect::temporary(&target).into_response()
}

// ==================== Handlers ====================

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn metrics_report(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let presented = headers.get("x-api-key").and_then(|value| value.to_str().ok());
    if !security::api_key_allows(state.config.admin_api_key.as_deref(), presented) {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(LocalizationMetrics::global().report()))
}

/// Locale landing page data: locale metadata, the language switcher
/// options, and the resolved UI string bundle.
async fn home(State(state): State<AppState>, Path(locale_code): Path<String>) -> impl IntoResponse {
    let locale = Locale::from_code_or_default(&locale_code);
    let switcher: Vec<_> = crate::i18n::LocaleRegistry::get()
        .list_enabled()
        .into_iter()
        .map(|config| {
            json!({
                "code": config.code,
                "displayName": config.display_name,
                "flagGlyph": config.flag_glyph,
                "isDefault": config.is_default,
            })
        })
        .collect();

    Json(json!({
        "locale": locale.code(),
        "switcher": switcher,
        "strings": state.strings.resolved_bundle(locale),
    }))
}

async fn strings_bundle(
    State(state): State<AppState>,
    Path(locale_code): Path<String>,
) -> impl IntoResponse {
    let locale = Locale::from_code_or_default(&locale_code);
    Json(state.strings.resolved_bundle(locale))
}

async fn list_products(
    State(state): State<AppState>,
    Path(locale_code): Path<String>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let locale = Locale::from_code_or_default(&locale_code);
    let products = catalog::fetch_products(&state.cms, locale).await?;
    Ok(Json(filter.apply(products)))
}

async fn get_product(
    State(state): State<AppState>,
    Path((locale_code, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let locale = Locale::from_code_or_default(&locale_code);
    let product = catalog::fetch_product_by_slug(&state.cms, &slug, locale)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

async fn list_posts(
    State(state): State<AppState>,
    Path(locale_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let locale = Locale::from_code_or_default(&locale_code);
    let posts = catalog::fetch_posts(&state.cms, locale).await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Path((locale_code, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let locale = Locale::from_code_or_default(&locale_code);
    let post = catalog::fetch_post_by_slug(&state.cms, &slug, locale)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(post))
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    /// Comma-separated product slugs
    #[serde(default)]
    slugs: String,
}

async fn compare_products(
    State(state): State<AppState>,
    Path(locale_code): Path<String>,
    Query(params): Query<CompareParams>,
) -> Result<impl IntoResponse, AppError> {
    let locale = Locale::from_code_or_default(&locale_code);

    let slugs: Vec<String> = params
        .slugs
        .split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .collect();

    let title = state.strings.lookup(locale, "compare.title").or_key();
    if slugs.len() < 2 {
        let summary = state.strings.lookup(locale, "compare.empty").or_key();
        return Ok(Json(json!({
            "title": title,
            "summary": summary,
            "products": [],
        })));
    }

    let products = catalog::fetch_comparison(&state.cms, &slugs, locale).await?;
    let summary = state
        .strings
        .lookup(locale, "compare.count")
        .or_key()
        .replace("{count}", &products.len().to_string());

    Ok(Json(json!({
        "title": title,
        "summary": summary,
        "products": products,
    })))
}

#[derive(Debug, Deserialize)]
struct SwitchParams {
    redirect: Option<String>,
}

/// Explicit language switch: store the preference cookie and send the
/// user to the localized version of where they were.
async fn switch_locale(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<SwitchParams>,
) -> impl IntoResponse {
    let locale = Locale::from_code_or_default(&code);
    let target = path::with_locale(params.redirect.as_deref().unwrap_or("/"), locale);

    let cookie = format!(
        "{}={}; Path=/; Max-Age=31536000; SameSite=Lax",
        state.config.locale_cookie,
        locale.code()
    );

    ([(header::SET_COOKIE, cookie)], Redirect::to(&target))
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/admin/metrics", get(metrics_report))
        .route("/locale/:code", get(switch_locale))
        .route("/:locale", get(home))
        .route("/:locale/strings", get(strings_bundle))
        .route("/:locale/products", get(list_products))
        .route("/:locale/products/:slug", get(get_product))
        .route("/:locale/posts", get(list_posts))
        .route("/:locale/posts/:slug", get(get_post))
        .route("/:locale/compare", get(compare_products))
        .layer(middleware::from_fn_with_state(state.clone(), locale_redirect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let strings = match &config.translations_file {
        Some(file) => TranslationCache::with_overrides_file(file)?,
        None => TranslationCache::builtin(),
    };
    let cms = CmsClient::new(&config);
    let port = config.port;
    let state = AppState::new(config, cms, strings);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on port {}", port);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
