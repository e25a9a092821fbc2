/// Client for the Serper Google Search API (`POST {base_url}/search`).
///
/// Only the organic result list is consumed. Serper returns many more sections (knowledge
/// graph, people-also-ask, related searches); they are ignored during deserialization.
use std::time::Duration;

pub use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::CommonError;
use crate::openai::{env_parse, read_limited_text};

/// Appended to every user query to bias the provider towards research material.
pub const EVIDENCE_QUERY_SUFFIX: &str = " evidence research study";

/// Number of organic results requested per search.
pub const DEFAULT_RESULT_COUNT: u32 = 10;

#[derive(Debug)]
pub struct SerperClientConfig {
    /// Sent as `X-API-KEY`. When absent the header is sent empty and Serper answers 401/403.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub timeout: Duration,
    pub max_error_body_bytes: usize,
}

impl SerperClientConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("SERPER_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        let base_url = std::env::var("SERPER_BASE_URL")
            .unwrap_or_else(|_| "https://google.serper.dev".to_string());

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(env_parse("SERPER_TIMEOUT_SECS", 15)),
            max_error_body_bytes: 4 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SerperClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },
}

impl SerperClientError {
    /// The provider's HTTP status, when it answered at all.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Request(e) => e.status(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SerperSearchRequest {
    pub q: String,
    pub num: u32,
}

impl SerperSearchRequest {
    /// Builds the evidence-oriented search for a user query.
    pub fn evidence(query: &str) -> Self {
        Self {
            q: format!("{query}{EVIDENCE_QUERY_SUFFIX}"),
            num: DEFAULT_RESULT_COUNT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SerperSearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

/// One organic hit. Serper omits fields freely, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

pub struct SerperClient {
    config: SerperClientConfig,
    http: reqwest::Client,
}

impl SerperClient {
    pub fn new(config: SerperClientConfig) -> Result<Self, CommonError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(CommonError::Config(format!(
                "SERPER_BASE_URL must be an http(s) URL, got '{}'",
                config.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .user_agent("evidence-finder")
            .build()?;
        Ok(Self { config, http })
    }

    /// Runs one search and returns the organic results in provider order.
    ///
    /// An empty result list is a successful search, not an error.
    pub async fn search(
        &self,
        request: &SerperSearchRequest,
    ) -> Result<Vec<OrganicResult>, SerperClientError> {
        let url = format!("{}/search", self.config.base_url);
        let api_key = self
            .config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .unwrap_or_default();

        let resp = self
            .http
            .post(&url)
            .timeout(self.config.timeout)
            .header("X-API-KEY", api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(SerperClientError::Upstream { status, body });
        }

        let parsed = resp.json::<SerperSearchResponse>().await?;
        Ok(parsed.organic)
    }
}
