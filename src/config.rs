use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // CMS
    pub cms_base_url: String,
    pub cms_token: Option<String>,

    // Locale routing
    pub locale_cookie: String,

    // Admin surface
    pub admin_api_key: Option<String>,

    // UI strings
    pub translations_file: Option<String>,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // CMS - query endpoint base URL, e.g. https://cms.example.com/v1
            cms_base_url: std::env::var("CMS_BASE_URL").context("CMS_BASE_URL not set")?,
            cms_token: std::env::var("CMS_TOKEN").ok(),

            // Cookie carrying the user's last-chosen locale
            locale_cookie: std::env::var("LOCALE_COOKIE")
                .unwrap_or_else(|_| "NEXT_LOCALE".to_string()),

            // Admin - guards /admin/metrics; unset disables the endpoint
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),

            // Optional JSON file patching the built-in string bundles
            translations_file: std::env::var("TRANSLATIONS_FILE").ok(),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
