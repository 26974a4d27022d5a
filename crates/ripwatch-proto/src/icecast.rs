//! Icecast status-json.xsl parsing.
//!
//! The status document nests sources under `icestats.source` as either a
//! single object or an array. We normalize to a sequence, pick the source
//! whose `listenurl` contains the configured mount, and extract now-playing
//! metadata. A selected source without a title means "no metadata".

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct StatusDocument {
    icestats: Icestats,
}

#[derive(Debug, Deserialize)]
struct Icestats {
    #[serde(default)]
    source: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<SourceEntry>),
    Many(Vec<SourceEntry>),
}

/// Raw per-mount record as Icecast serialises it. Numeric fields arrive as
/// numbers or strings depending on the server build, so they stay `Value`
/// until extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub listeners: Option<Value>,
    #[serde(default)]
    pub bitrate: Option<Value>,
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub server_description: Option<String>,
    #[serde(default)]
    pub listenurl: Option<String>,
}

/// Now-playing metadata extracted from the selected source.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamMetadata {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub listeners: u32,
    pub bitrate: String,
    pub server_name: String,
    pub server_description: String,
}

/// Parse a status document body. Returns `None` for malformed JSON, a
/// document with no sources, or a selected source without a title.
pub fn parse_status(body: &str, mount: &str) -> Option<StreamMetadata> {
    let doc: StatusDocument = match serde_json::from_str(body) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("unparseable status document: {}", e);
            return None;
        }
    };

    let sources = match doc.icestats.source {
        Some(OneOrMany::Many(v)) => v,
        Some(OneOrMany::One(s)) => vec![*s],
        None => return None,
    };
    if sources.is_empty() {
        return None;
    }

    let selected = sources
        .iter()
        .find(|s| {
            s.listenurl
                .as_deref()
                .map(|u| u.contains(mount))
                .unwrap_or(false)
        })
        .unwrap_or(&sources[0]);

    let title = selected
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?;

    let artist = selected
        .artist
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("Unknown Artist");

    Some(StreamMetadata {
        artist: unescape_entities(artist),
        title: unescape_entities(title),
        album: selected
            .album
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        listeners: value_to_u32(selected.listeners.as_ref()),
        bitrate: value_to_string(selected.bitrate.as_ref()),
        server_name: selected.server_name.clone().unwrap_or_default(),
        server_description: selected.server_description.clone().unwrap_or_default(),
    })
}

/// Undo the one encoding quirk the stream source applies: `&apos;` and
/// `&amp;`. Not general entity decoding.
pub fn unescape_entities(s: &str) -> String {
    s.replace("&apos;", "'").replace("&amp;", "&")
}

fn value_to_u32(v: Option<&Value>) -> u32 {
    match v {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn value_to_string(v: Option<&Value>) -> String {
    match v {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_source_normalized() {
        let body = r#"{"icestats":{"source":{"artist":"Khruangbin","title":"Maria También","listenurl":"http://localhost:8000/radio.ogg","listeners":3,"bitrate":192}}}"#;
        let meta = parse_status(body, "/radio.ogg").unwrap();
        assert_eq!(meta.artist, "Khruangbin");
        assert_eq!(meta.title, "Maria También");
        assert_eq!(meta.listeners, 3);
        assert_eq!(meta.bitrate, "192");
    }

    #[test]
    fn test_mount_match_wins_regardless_of_order() {
        let body = r#"{"icestats":{"source":[
            {"title":"Wrong Stream","listenurl":"http://localhost:8000/other.mp3"},
            {"artist":"Alice Coltrane","title":"Journey","listenurl":"http://localhost:8000/radio.ogg"}
        ]}}"#;
        let meta = parse_status(body, "/radio.ogg").unwrap();
        assert_eq!(meta.title, "Journey");

        let body_reversed = r#"{"icestats":{"source":[
            {"artist":"Alice Coltrane","title":"Journey","listenurl":"http://localhost:8000/radio.ogg"},
            {"title":"Wrong Stream","listenurl":"http://localhost:8000/other.mp3"}
        ]}}"#;
        let meta = parse_status(body_reversed, "/radio.ogg").unwrap();
        assert_eq!(meta.title, "Journey");
    }

    #[test]
    fn test_no_mount_match_falls_back_to_first() {
        let body = r#"{"icestats":{"source":[
            {"title":"First","listenurl":"http://localhost:8000/a.mp3"},
            {"title":"Second","listenurl":"http://localhost:8000/b.mp3"}
        ]}}"#;
        let meta = parse_status(body, "/radio.ogg").unwrap();
        assert_eq!(meta.title, "First");
    }

    #[test]
    fn test_empty_title_means_no_metadata() {
        let body = r#"{"icestats":{"source":{"artist":"Someone","title":"  ","listenurl":"http://localhost:8000/radio.ogg"}}}"#;
        assert!(parse_status(body, "/radio.ogg").is_none());

        let body = r#"{"icestats":{"source":{"artist":"Someone","listenurl":"http://localhost:8000/radio.ogg"}}}"#;
        assert!(parse_status(body, "/radio.ogg").is_none());
    }

    #[test]
    fn test_blank_artist_defaults() {
        let body = r#"{"icestats":{"source":{"title":"Nightflight","listenurl":"http://localhost:8000/radio.ogg"}}}"#;
        let meta = parse_status(body, "/radio.ogg").unwrap();
        assert_eq!(meta.artist, "Unknown Artist");
        assert_eq!(meta.album, "");
        assert_eq!(meta.listeners, 0);
        assert_eq!(meta.bitrate, "");
    }

    #[test]
    fn test_listeners_from_string() {
        let body = r#"{"icestats":{"source":{"title":"T","listeners":"17","listenurl":"http://localhost:8000/radio.ogg"}}}"#;
        assert_eq!(parse_status(body, "/radio.ogg").unwrap().listeners, 17);
    }

    #[test]
    fn test_malformed_body_is_none() {
        assert!(parse_status("<html>teapot</html>", "/radio.ogg").is_none());
        assert!(parse_status(r#"{"icestats":{}}"#, "/radio.ogg").is_none());
    }

    #[test]
    fn test_entity_fixup() {
        assert_eq!(unescape_entities("Don&apos;t Stop"), "Don't Stop");
        assert_eq!(unescape_entities("Ike &amp; Tina"), "Ike & Tina");
        // only the two known entities are touched
        assert_eq!(unescape_entities("a &lt; b"), "a &lt; b");
    }

    #[test]
    fn test_entities_fixed_in_parsed_fields() {
        let body = r#"{"icestats":{"source":{"artist":"Ike &amp; Tina","title":"Don&apos;t","listenurl":"http://localhost:8000/radio.ogg"}}}"#;
        let meta = parse_status(body, "/radio.ogg").unwrap();
        assert_eq!(meta.artist, "Ike & Tina");
        assert_eq!(meta.title, "Don't");
    }
}
