use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

use crate::config::ReputationConfig;

use super::schema::{ReputationQuery, ReputationResult};
use super::{LookupError, ReputationLookup};

/// Google Safe Browsing v4 `threatMatches:find` client. One attempt per
/// lookup; the request timeout bounds how long a classification can stall.
#[derive(Clone)]
pub struct SafeBrowsingClient {
  client: Client,
  endpoint: Url,
  api_key: String,
  cfg: ReputationConfig,
}

impl SafeBrowsingClient {
  pub fn new(cfg: ReputationConfig, api_key: String) -> anyhow::Result<Self> {
    let endpoint = Url::parse(&cfg.endpoint)
      .with_context(|| format!("invalid reputation endpoint: {}", cfg.endpoint))?;

    let client = Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_seconds))
      .redirect(Policy::none())
      .user_agent(format!("link-analyzer/{}", env!("CARGO_PKG_VERSION")))
      .build()
      .context("build HTTP client")?;

    Ok(Self {
      client,
      endpoint,
      api_key,
      cfg,
    })
  }
}

#[async_trait]
impl ReputationLookup for SafeBrowsingClient {
  async fn check_url(&self, url: &str) -> Result<ReputationResult, LookupError> {
    let query = ReputationQuery::for_url(&self.cfg, url);

    // The API key travels as a query parameter, never in the body.
    let mut request_url = self.endpoint.clone();
    request_url
      .query_pairs_mut()
      .append_pair("key", &self.api_key);

    let response = self.client.post(request_url).json(&query).send().await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(LookupError::Http { status, body });
    }

    let body = response.text().await?;
    let result = serde_json::from_str::<ReputationResult>(&body)?;
    Ok(result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wiremock::matchers::{body_partial_json, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn test_config(endpoint: &str) -> ReputationConfig {
    ReputationConfig {
      endpoint: format!("{endpoint}/v4/threatMatches:find"),
      ..ReputationConfig::default()
    }
  }

  fn client_for(server: &MockServer) -> SafeBrowsingClient {
    SafeBrowsingClient::new(test_config(&server.uri()), "test-key".to_string()).unwrap()
  }

  #[tokio::test]
  async fn zero_matches_on_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/v4/threatMatches:find"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
      .mount(&server)
      .await;

    let result = client_for(&server).check_url("https://example.com").await.unwrap();
    assert!(!result.is_flagged());
  }

  #[tokio::test]
  async fn matches_are_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/v4/threatMatches:find"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "matches": [
          { "threatType": "MALWARE", "platformType": "ANY_PLATFORM",
            "threatEntryType": "URL", "threat": { "url": "http://bad.example/" } }
        ]
      })))
      .mount(&server)
      .await;

    let result = client_for(&server).check_url("http://bad.example/").await.unwrap();
    assert!(result.is_flagged());
    assert_eq!(result.matches[0].threat_type, "MALWARE");
  }

  #[tokio::test]
  async fn sends_key_and_query_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/v4/threatMatches:find"))
      .and(query_param("key", "test-key"))
      .and(body_partial_json(serde_json::json!({
        "client": { "clientId": "link-analyzer" },
        "threatInfo": { "threatEntries": [{ "url": "https://example.com" }] }
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
      .expect(1)
      .mount(&server)
      .await;

    client_for(&server).check_url("https://example.com").await.unwrap();
  }

  #[tokio::test]
  async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/v4/threatMatches:find"))
      .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
      .mount(&server)
      .await;

    let err = client_for(&server)
      .check_url("https://example.com")
      .await
      .unwrap_err();
    match err {
      LookupError::Http { status, body } => {
        assert_eq!(status.as_u16(), 503);
        assert_eq!(body, "backend unavailable");
      }
      other => panic!("expected HTTP error, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn malformed_payload_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/v4/threatMatches:find"))
      .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
      .mount(&server)
      .await;

    let err = client_for(&server)
      .check_url("https://example.com")
      .await
      .unwrap_err();
    assert!(matches!(err, LookupError::Malformed(_)));
  }
}
