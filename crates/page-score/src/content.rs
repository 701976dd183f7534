/// Client for the wiki content API.
///
/// Resolves a page title to its identity and current body text. A 404 is a
/// clean miss (the page does not exist); a page can also exist with no body,
/// which callers surface as a no-content failure.
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::AppError;

/// A page as returned by the wiki API. `content` is `None` when the page
/// exists but has no body.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub page_id: u64,
    pub title: String,
    pub content: Option<String>,
}

pub struct ContentSource {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl ContentSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent("page-score/content-client")
            .build()
            .map_err(|e| AppError::Content(format!("failed to build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    /// Fetch a page by title. Returns `Ok(None)` when the page does not exist.
    pub async fn fetch_page(&self, title: &str) -> Result<Option<PageRecord>, AppError> {
        let url = format!("{}/v1/pages/{}", self.base_url, normalize_title(title));
        let resp = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::Content(format!("wiki api request failed: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(AppError::Content(format!(
                "wiki api returned status {}",
                resp.status()
            )));
        }

        let page = resp
            .json::<PageRecord>()
            .await
            .map_err(|e| AppError::Content(format!("invalid wiki api response: {e}")))?;
        Ok(Some(page))
    }
}

/// Wiki title normalization: surrounding whitespace dropped, inner spaces
/// become underscores.
fn normalize_title(title: &str) -> String {
    title.trim().replace(' ', "_")
}
