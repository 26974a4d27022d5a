//! Track-change detection and bounded play history.
//!
//! Identity is the lowercased "artist|title" composite key. A poll result is
//! a new track iff its key differs from the tracked one; repeated identical
//! polls are no-ops. On a change the previous track is pushed onto the
//! history front (skipped when the head already carries the same key) and
//! the history is truncated to [`HISTORY_LIMIT`] entries.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::icecast::StreamMetadata;

pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentTrack {
    pub artist: String,
    pub title: String,
    pub album: String,
    /// When this track was first observed.
    pub seen_at: DateTime<Local>,
}

impl CurrentTrack {
    pub fn composite_key(&self) -> String {
        composite_key(&self.artist, &self.title)
    }

    /// Display string for panels and the terminal title.
    pub fn display(&self) -> String {
        format!("{} \u{2013} {}", self.artist, self.title)
    }
}

pub fn composite_key(artist: &str, title: &str) -> String {
    format!("{}|{}", artist.to_lowercase(), title.to_lowercase())
}

impl From<&StreamMetadata> for CurrentTrack {
    fn from(meta: &StreamMetadata) -> Self {
        Self {
            artist: meta.artist.clone(),
            title: meta.title.clone(),
            album: meta.album.clone(),
            seen_at: Local::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct NowPlaying {
    current: Option<CurrentTrack>,
    history: VecDeque<CurrentTrack>,
}

impl NowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&CurrentTrack> {
        self.current.as_ref()
    }

    /// Past tracks, most recent first.
    pub fn history(&self) -> &VecDeque<CurrentTrack> {
        &self.history
    }

    /// Feed one poll result. Returns the newly adopted track when this is a
    /// genuine change, `None` when the key matches what is already current.
    pub fn observe(&mut self, meta: &StreamMetadata) -> Option<CurrentTrack> {
        let incoming = CurrentTrack::from(meta);
        let key = incoming.composite_key();

        if self
            .current
            .as_ref()
            .map(|c| c.composite_key() == key)
            .unwrap_or(false)
        {
            return None;
        }

        if let Some(prev) = self.current.take() {
            let head_is_same = self
                .history
                .front()
                .map(|h| h.composite_key() == prev.composite_key())
                .unwrap_or(false);
            if !head_is_same {
                self.history.push_front(prev);
                self.history.truncate(HISTORY_LIMIT);
            }
        }

        self.current = Some(incoming.clone());
        Some(incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(artist: &str, title: &str) -> StreamMetadata {
        StreamMetadata {
            artist: artist.to_string(),
            title: title.to_string(),
            album: String::new(),
            listeners: 0,
            bitrate: String::new(),
            server_name: String::new(),
            server_description: String::new(),
        }
    }

    #[test]
    fn test_first_observation_is_a_change() {
        let mut np = NowPlaying::new();
        assert!(np.observe(&meta("A", "One")).is_some());
        assert_eq!(np.current().unwrap().title, "One");
        assert!(np.history().is_empty());
    }

    #[test]
    fn test_repeated_poll_is_not_a_change() {
        let mut np = NowPlaying::new();
        np.observe(&meta("A", "One"));
        assert!(np.observe(&meta("A", "One")).is_none());
        // case-insensitive identity
        assert!(np.observe(&meta("a", "ONE")).is_none());
        assert!(np.history().is_empty());
    }

    #[test]
    fn test_change_pushes_previous_onto_history() {
        let mut np = NowPlaying::new();
        np.observe(&meta("A", "One"));
        np.observe(&meta("B", "Two"));
        assert_eq!(np.current().unwrap().title, "Two");
        assert_eq!(np.history().len(), 1);
        assert_eq!(np.history()[0].title, "One");
    }

    #[test]
    fn test_duplicate_head_not_pushed_twice() {
        let mut np = NowPlaying::new();
        np.observe(&meta("A", "One"));
        np.observe(&meta("B", "Two"));
        // Back to the same track as the history head, then away again:
        np.observe(&meta("A", "One"));
        np.observe(&meta("C", "Three"));
        // "One" must not appear twice in a row.
        let keys: Vec<String> = np.history().iter().map(|t| t.composite_key()).collect();
        for pair in keys.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_history_capped_oldest_drop_first() {
        let mut np = NowPlaying::new();
        for i in 0..30 {
            np.observe(&meta("Artist", &format!("Track {i:02}")));
        }
        assert_eq!(np.history().len(), HISTORY_LIMIT);
        // newest history entry is the track before the current one
        assert_eq!(np.history()[0].title, "Track 28");
        // oldest surviving entry: 29 tracks pushed, 20 kept
        assert_eq!(np.history()[HISTORY_LIMIT - 1].title, "Track 09");
    }
}
