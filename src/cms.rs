//! Headless CMS query client.
//!
//! The site is content-driven: products, certifications, brands, and blog
//! posts all live in the CMS. This client speaks the CMS query endpoint:
//! a GET against `{base}/query` with the query string and `$`-prefixed
//! parameters as URL parameters, returning the `result` field of the JSON
//! body.
//!
//! Fetches are fire-once: a failure is propagated to the page boundary
//! (which renders a not-found or error state) rather than retried. Returned
//! documents may carry a `localeOverrides` map; localization happens in
//! `i18n::resolve`, not here.

use crate::config::Config;
use crate::i18n::LocalizationMetrics;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// Client for the CMS query endpoint.
#[derive(Debug, Clone)]
pub struct CmsClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CmsClient {
    /// Create a client from the application config.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.cms_base_url.trim_end_matches('/').to_string(),
            token: config.cms_token.clone(),
        }
    }

    /// Execute a content query.
    ///
    /// # Arguments
    /// * `query` - The CMS query string
    /// * `params` - Named parameters, sent as `$name` URL parameters with
    ///   JSON-encoded values
    ///
    /// # Returns
    /// The `result` field of the response body. A missing document is
    /// `Value::Null`, not an error; transport and HTTP failures are errors.
    pub async fn fetch(&self, query: &str, params: &[(&str, Value)]) -> Result<Value> {
        let metrics = LocalizationMetrics::global();
        metrics.record_cms_fetch();

        match self.fetch_inner(query, params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                metrics.record_cms_failure();
                Err(e)
            }
        }
    }

    async fn fetch_inner(&self, query: &str, params: &[(&str, Value)]) -> Result<Value> {
        let url = format!("{}/query", self.base_url);

        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        debug!("CMS query: {} ({} params)", query, params.len());

        let mut request = self.client.get(&url).query(&pairs);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .context("Failed to send query to CMS")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("CMS query error ({}): {}", status, body);
        }

        let mut body: Value = response
            .json()
            .await
            .context("Failed to parse CMS response")?;

        Ok(body
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_client(base_url: &str, token: Option<&str>) -> CmsClient {
        let config = Config {
            cms_base_url: base_url.to_string(),
            cms_token: token.map(str::to_string),
            locale_cookie: "NEXT_LOCALE".to_string(),
            admin_api_key: None,
            translations_file: None,
            port: 8080,
        };
        CmsClient::new(&config)
    }

    // ==================== Fetch Tests ====================

    #[tokio::test]
    #[serial]
    async fn test_fetch_returns_result_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("query", "*[_type == 'product']"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": [{"name": "Bottle"}]})),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), None);
        let result = client
            .fetch("*[_type == 'product']", &[])
            .await
            .expect("fetch");

        assert_eq!(result, json!([{"name": "Bottle"}]));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_sends_dollar_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("$slug", "\"bamboo-bottle\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), None);
        let result = client
            .fetch("*[slug == $slug][0]", &[("slug", json!("bamboo-bottle"))])
            .await
            .expect("fetch");

        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(header("Authorization", "Bearer cms-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": null})))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), Some("cms-secret"));
        let result = client.fetch("*", &[]).await.expect("fetch");

        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_missing_result_is_null() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ms": 4})))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), None);
        let result = client.fetch("*", &[]).await.expect("fetch");

        assert_eq!(result, Value::Null);
    }

    // ==================== Error Handling Tests ====================

    #[tokio::test]
    #[serial]
    async fn test_fetch_http_error_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), None);
        let result = client.fetch("*", &[]).await;

        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_invalid_json_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), None);
        let result = client.fetch("*", &[]).await;

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse CMS response"));
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_unreachable_host_propagates() {
        // Fire-once contract: no retry loop to wait out, the error surfaces
        // immediately.
        let client = test_client("http://127.0.0.1:1", None);
        let result = client.fetch("*", &[]).await;
        assert!(result.is_err());
    }

    // ==================== URL Handling Tests ====================

    #[tokio::test]
    #[serial]
    async fn test_trailing_slash_trimmed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
            .mount(&mock_server)
            .await;

        let client = test_client(&format!("{}/", mock_server.uri()), None);
        let result = client.fetch("*", &[]).await.expect("fetch");
        assert_eq!(result, json!(1));
    }
}
