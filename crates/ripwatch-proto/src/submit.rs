//! Playlist job submission client for the admin backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body for `POST /api/spotify`. Optional fields serialize as null
/// when blank, matching what the backend expects.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub url: String,
    pub source: Option<String>,
    pub fallback_source: Option<String>,
}

impl SubmitRequest {
    /// Build from raw form fields: whitespace is trimmed and blank optional
    /// fields become None.
    pub fn from_form(url: &str, source: &str, fallback_source: &str) -> Self {
        let opt = |s: &str| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        };
        Self {
            url: url.trim().to_string(),
            source: opt(source),
            fallback_source: opt(fallback_source),
        }
    }
}

/// Success response from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReceipt {
    pub task_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "detail")]
    error: Option<String>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Local validation failure — no request is sent.
    #[error("a playlist URL is required")]
    EmptyUrl,
    /// The backend answered with a non-success status.
    #[error("{0}")]
    Server(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct SubmitClient {
    client: reqwest::Client,
    submit_url: String,
}

impl SubmitClient {
    pub fn new(submit_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            submit_url: submit_url.into(),
        }
    }

    /// Submit a playlist job. Validates locally before touching the network:
    /// an empty URL never produces a request.
    pub async fn submit(&self, request: &SubmitRequest) -> Result<SubmitReceipt, SubmitError> {
        if request.url.trim().is_empty() {
            return Err(SubmitError::EmptyUrl);
        }

        let resp = self
            .client
            .post(&self.submit_url)
            .json(request)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Failed to start download".to_string());
            Err(SubmitError::Server(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_form_blank_optionals_are_none() {
        let req = SubmitRequest::from_form("  https://open.spotify.com/playlist/x  ", "", "  ");
        assert_eq!(req.url, "https://open.spotify.com/playlist/x");
        assert!(req.source.is_none());
        assert!(req.fallback_source.is_none());

        let req = SubmitRequest::from_form("u", "qobuz", "deezer");
        assert_eq!(req.source.as_deref(), Some("qobuz"));
        assert_eq!(req.fallback_source.as_deref(), Some("deezer"));
    }

    #[test]
    fn test_request_serializes_nulls() {
        let req = SubmitRequest::from_form("https://x", "", "");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["url"], "https://x");
        assert!(json["source"].is_null());
        assert!(json["fallback_source"].is_null());
    }

    #[tokio::test]
    async fn test_empty_url_fails_without_network() {
        // Deliberately unroutable: validation must reject before any request.
        let client = SubmitClient::new("http://127.0.0.1:9/api/spotify");
        let err = client
            .submit(&SubmitRequest::from_form("   ", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::EmptyUrl));
    }

    #[test]
    fn test_receipt_parse() {
        let receipt: SubmitReceipt =
            serde_json::from_str(r#"{"task_id":"abc-123","status":"started"}"#).unwrap();
        assert_eq!(receipt.task_id, "abc-123");
        assert_eq!(receipt.status, "started");
    }
}
