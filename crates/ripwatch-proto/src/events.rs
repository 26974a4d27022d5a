//! Wire types for the admin backend's progress event stream, plus an
//! incremental text/event-stream frame parser.
//!
//! The backend broadcasts named SSE events (`playlist_update`,
//! `track_update`, `search_update`, `connection`); each carries a JSON
//! payload that fully replaces the previous record for its id.

use serde::{Deserialize, Serialize};

/// Snapshot of one playlist's download progress. Keyed by `playlist_id`;
/// the server always sends the whole record, never a partial patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistUpdate {
    pub playlist_id: String,
    pub playlist_name: String,
    /// Opaque server string: "resolving", "downloading", "completed", "failed", ...
    pub status: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub found_tracks: u32,
    #[serde(default)]
    pub completed_tracks: u32,
    #[serde(default)]
    pub failed_tracks: u32,
    /// Unix timestamp set by the server when the event was produced.
    #[serde(default)]
    pub timestamp: f64,
}

impl PlaylistUpdate {
    /// Completion percentage. 0 when no tracks are known yet.
    pub fn percent(&self) -> f64 {
        if self.total_tracks == 0 {
            0.0
        } else {
            f64::from(self.completed_tracks) / f64::from(self.total_tracks) * 100.0
        }
    }
}

/// Snapshot of one track's download progress. Keyed by `track_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUpdate {
    pub track_id: String,
    #[serde(default)]
    pub playlist_id: Option<String>,
    pub title: String,
    pub artist: String,
    pub status: String,
    /// 0-100.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub timestamp: f64,
}

/// Search progress while a playlist is being resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUpdate {
    pub playlist_id: String,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub found: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub current_query: String,
    #[serde(default)]
    pub timestamp: f64,
}

/// A decoded event from the monitor stream.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// The server's hello frame (`event: connection`).
    Connected,
    Playlist(PlaylistUpdate),
    Track(TrackUpdate),
    Search(SearchUpdate),
}

impl MonitorEvent {
    /// Decode a named SSE frame into a typed event. Unknown event names are
    /// not an error — the server may grow new ones — and yield `None`.
    pub fn parse(event: &str, data: &str) -> anyhow::Result<Option<Self>> {
        let ev = match event {
            "connection" => Some(MonitorEvent::Connected),
            "playlist_update" => Some(MonitorEvent::Playlist(serde_json::from_str(data)?)),
            "track_update" => Some(MonitorEvent::Track(serde_json::from_str(data)?)),
            "search_update" => Some(MonitorEvent::Search(serde_json::from_str(data)?)),
            _ => None,
        };
        Ok(ev)
    }
}

// ── SSE framing ───────────────────────────────────────────────────────────────

/// One dispatched server-sent event: event name plus joined data lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Incremental parser for a text/event-stream byte stream.
///
/// Feed it raw chunks as they arrive; it buffers partial lines and returns
/// complete frames. Comment lines (`: keepalive`) and unknown fields are
/// skipped; multiple `data:` lines are joined with newlines; a frame is
/// dispatched on the first empty line, per the SSE spec.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    event: String,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    let event = if self.event.is_empty() {
                        "message".to_string()
                    } else {
                        std::mem::take(&mut self.event)
                    };
                    frames.push(SseFrame {
                        event,
                        data: self.data.join("\n"),
                    });
                    self.data.clear();
                }
                self.event.clear();
                continue;
            }

            // Comment line (keepalives)
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
                None => (line, ""),
            };

            match field {
                "event" => self.event = value.to_string(),
                "data" => self.data.push(value.to_string()),
                // "id" and "retry" are valid SSE fields we have no use for
                _ => {}
            }
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist_event() {
        let data = r#"{"playlist_id":"p1","playlist_name":"Road Trip","status":"downloading","total_tracks":12,"found_tracks":10,"completed_tracks":4,"failed_tracks":1,"timestamp":1700000000.0}"#;
        let ev = MonitorEvent::parse("playlist_update", data).unwrap().unwrap();
        match ev {
            MonitorEvent::Playlist(p) => {
                assert_eq!(p.playlist_id, "p1");
                assert_eq!(p.total_tracks, 12);
                assert!((p.percent() - 33.333).abs() < 0.01);
            }
            _ => panic!("wrong event type"),
        }
    }

    #[test]
    fn test_percent_zero_total() {
        let p = PlaylistUpdate {
            playlist_id: "p".into(),
            playlist_name: "empty".into(),
            status: "resolving".into(),
            total_tracks: 0,
            found_tracks: 0,
            completed_tracks: 0,
            failed_tracks: 0,
            timestamp: 0.0,
        };
        assert_eq!(p.percent(), 0.0);
    }

    #[test]
    fn test_unknown_event_is_none() {
        assert!(MonitorEvent::parse("cache_update", "{}").unwrap().is_none());
    }

    #[test]
    fn test_malformed_payload_is_err() {
        assert!(MonitorEvent::parse("track_update", "{not json").is_err());
    }

    #[test]
    fn test_sse_single_frame() {
        let mut p = SseParser::new();
        let frames = p.feed(b"event: track_update\ndata: {\"x\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "track_update");
        assert_eq!(frames[0].data, "{\"x\":1}");
    }

    #[test]
    fn test_sse_partial_chunks() {
        let mut p = SseParser::new();
        assert!(p.feed(b"event: playlist_up").is_empty());
        assert!(p.feed(b"date\ndata: {}").is_empty());
        let frames = p.feed(b"\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "playlist_update");
    }

    #[test]
    fn test_sse_keepalive_comment_ignored() {
        let mut p = SseParser::new();
        assert!(p.feed(b": keepalive\n\n").is_empty());
        let frames = p.feed(b"event: connection\ndata: {\"status\":\"connected\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "connection");
    }

    #[test]
    fn test_sse_multiline_data_joined() {
        let mut p = SseParser::new();
        let frames = p.feed(b"data: line one\ndata: line two\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "message");
        assert_eq!(frames[0].data, "line one\nline two");
    }

    #[test]
    fn test_sse_crlf_lines() {
        let mut p = SseParser::new();
        let frames = p.feed(b"event: connection\r\ndata: {}\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "connection");
        assert_eq!(frames[0].data, "{}");
    }
}
