use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{HistoryEntry, QuizRecord};
use crate::normalize::{normalize_history_list, normalize_quiz};

const USER_AGENT_STRING: &str = concat!("wiki-quiz/", env!("CARGO_PKG_VERSION"));

const GENERATE_FAILED: &str = "Failed to generate quiz";
const HISTORY_FAILED: &str = "Failed to load history";
const QUIZ_FAILED: &str = "Failed to load quiz";

#[derive(Debug, Serialize)]
struct GenerateQuizRequest<'a> {
    url: &'a str,
}

/// Client for the quiz generation service. Every payload it returns has
/// already been through the normalizer.
pub struct QuizClient {
    client: Client,
    base_url: Url,
}

impl QuizClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Asks the service to build a quiz for `article_url`.
    pub async fn generate_quiz(&self, article_url: &str) -> Result<Option<QuizRecord>> {
        let endpoint = self.endpoint("generate_quiz")?;
        tracing::info!("Requesting quiz for {}", article_url);

        let response = self
            .client
            .post(endpoint)
            .json(&GenerateQuizRequest { url: article_url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_with_detail(response, GENERATE_FAILED).await);
        }

        let raw: Value = response.json().await?;
        Ok(normalize_quiz(&raw))
    }

    pub async fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        let response = self.client.get(self.endpoint("history")?).send().await?;

        if !response.status().is_success() {
            tracing::warn!("History request failed: HTTP {}", response.status());
            return Err(AppError::Api(HISTORY_FAILED.to_string()));
        }

        let raw: Value = response.json().await?;
        let entries = normalize_history_list(&raw);
        tracing::debug!("Loaded {} history entries", entries.len());
        Ok(entries)
    }

    pub async fn fetch_quiz_by_id(&self, id: i64) -> Result<Option<QuizRecord>> {
        let endpoint = self.endpoint(&format!("quiz/{id}"))?;
        let response = self.client.get(endpoint).send().await?;

        if !response.status().is_success() {
            tracing::warn!("Quiz {} request failed: HTTP {}", id, response.status());
            return Err(AppError::Api(QUIZ_FAILED.to_string()));
        }

        let raw: Value = response.json().await?;
        Ok(normalize_quiz(&raw))
    }
}

/// Error bodies look like `{"detail": "..."}`; fall back to `fallback` otherwise.
async fn error_with_detail(response: Response, fallback: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Quiz service returned HTTP {}: {}", status, body);

    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|d| !d.is_empty());

    AppError::Api(detail.unwrap_or_else(|| fallback.to_string()))
}
