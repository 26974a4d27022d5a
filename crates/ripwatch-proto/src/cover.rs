//! Cover art lookup client.
//!
//! Queries the radio service's `/api/cover` endpoint. Every failure mode —
//! not found, network error, malformed body — degrades to the default
//! placeholder; callers never see an error.

use serde::Deserialize;
use tracing::{debug, warn};

/// Shown when no cover could be resolved.
pub const DEFAULT_COVER_URL: &str = "/static/default-cover.png";

#[derive(Debug, Deserialize)]
struct CoverResponse {
    #[serde(default)]
    found: bool,
    #[serde(default)]
    cover_url: Option<String>,
}

#[derive(Clone)]
pub struct CoverClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve (artist, title) to a display image URL.
    pub async fn lookup(&self, artist: &str, title: &str, album: Option<&str>) -> String {
        match self.try_lookup(artist, title, album).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!("[cover] no cover for {} - {}", artist, title);
                DEFAULT_COVER_URL.to_string()
            }
            Err(e) => {
                warn!("[cover] lookup failed for {} - {}: {}", artist, title, e);
                DEFAULT_COVER_URL.to_string()
            }
        }
    }

    async fn try_lookup(
        &self,
        artist: &str,
        title: &str,
        album: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        let url = format!("{}/api/cover", self.base_url.trim_end_matches('/'));
        let mut query: Vec<(&str, &str)> = vec![("artist", artist), ("title", title)];
        if let Some(album) = album.filter(|a| !a.is_empty()) {
            query.push(("album", album));
        }

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let body: CoverResponse = resp.json().await?;
        if body.found {
            Ok(body.cover_url.filter(|u| !u.is_empty()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shapes() {
        let found: CoverResponse =
            serde_json::from_str(r#"{"found":true,"cover_url":"http://x/c.jpg","track_id":"t1","source":"database"}"#)
                .unwrap();
        assert!(found.found);
        assert_eq!(found.cover_url.as_deref(), Some("http://x/c.jpg"));

        let missing: CoverResponse =
            serde_json::from_str(r#"{"found":false,"message":"No cover art found"}"#).unwrap();
        assert!(!missing.found);
        assert!(missing.cover_url.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades_to_default() {
        // Port 9 (discard) — connection refused, not a hang.
        let client = CoverClient::new("http://127.0.0.1:9");
        let url = client.lookup("Artist", "Title", None).await;
        assert_eq!(url, DEFAULT_COVER_URL);
    }
}
