//! In-memory progress state: latest-by-id maps of playlists and tracks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::events::{MonitorEvent, PlaylistUpdate, SearchUpdate, TrackUpdate};

/// The full monitor state derived from the event stream. Each update event
/// replaces the stored record for its id; no per-field merging, no history.
#[derive(Debug, Clone, Default)]
pub struct ProgressSnapshot {
    pub playlists: HashMap<String, PlaylistUpdate>,
    pub tracks: HashMap<String, TrackUpdate>,
    pub searches: HashMap<String, SearchUpdate>,
}

impl ProgressSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one decoded event. Records are replaced wholesale.
    pub fn apply(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Connected => {}
            MonitorEvent::Playlist(p) => {
                self.playlists.insert(p.playlist_id.clone(), p);
            }
            MonitorEvent::Track(t) => {
                self.tracks.insert(t.track_id.clone(), t);
            }
            MonitorEvent::Search(s) => {
                self.searches.insert(s.playlist_id.clone(), s);
            }
        }
    }

    /// Playlists in a stable display order (by name, then id for ties).
    pub fn playlists_sorted(&self) -> Vec<&PlaylistUpdate> {
        let mut out: Vec<&PlaylistUpdate> = self.playlists.values().collect();
        out.sort_by(|a, b| {
            a.playlist_name
                .cmp(&b.playlist_name)
                .then_with(|| a.playlist_id.cmp(&b.playlist_id))
        });
        out
    }

    /// Tracks belonging to one playlist, sorted by title (case-sensitive).
    pub fn tracks_for(&self, playlist_id: &str) -> Vec<&TrackUpdate> {
        let mut out: Vec<&TrackUpdate> = self
            .tracks
            .values()
            .filter(|t| t.playlist_id.as_deref() == Some(playlist_id))
            .collect();
        out.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.track_id.cmp(&b.track_id)));
        out
    }

    pub fn search_for(&self, playlist_id: &str) -> Option<&SearchUpdate> {
        self.searches.get(playlist_id)
    }
}

/// Shared handle to the snapshot: the app loop applies events, the embedded
/// HTTP server reads clones. Single writer, many readers.
#[derive(Clone)]
pub struct ProgressStore {
    inner: Arc<RwLock<ProgressSnapshot>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ProgressSnapshot::new())),
        }
    }

    /// Apply an event and return the updated snapshot.
    pub async fn apply(&self, event: MonitorEvent) -> ProgressSnapshot {
        let mut snap = self.inner.write().await;
        snap.apply(event);
        snap.clone()
    }

    pub async fn get(&self) -> ProgressSnapshot {
        self.inner.read().await.clone()
    }
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(id: &str, name: &str, completed: u32, total: u32) -> PlaylistUpdate {
        PlaylistUpdate {
            playlist_id: id.to_string(),
            playlist_name: name.to_string(),
            status: "downloading".to_string(),
            total_tracks: total,
            found_tracks: total,
            completed_tracks: completed,
            failed_tracks: 0,
            timestamp: 0.0,
        }
    }

    fn track(id: &str, playlist: &str, title: &str) -> TrackUpdate {
        TrackUpdate {
            track_id: id.to_string(),
            playlist_id: Some(playlist.to_string()),
            title: title.to_string(),
            artist: "Artist".to_string(),
            status: "downloading".to_string(),
            progress: 0.0,
            error_message: None,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_latest_by_id_replacement() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Playlist(playlist("p1", "Mix", 1, 10)));
        snap.apply(MonitorEvent::Playlist(playlist("p1", "Mix", 7, 10)));
        assert_eq!(snap.playlists.len(), 1);
        assert_eq!(snap.playlists["p1"].completed_tracks, 7);

        snap.apply(MonitorEvent::Track(track("t1", "p1", "Song")));
        let mut updated = track("t1", "p1", "Song");
        updated.status = "completed".to_string();
        updated.progress = 100.0;
        snap.apply(MonitorEvent::Track(updated));
        assert_eq!(snap.tracks.len(), 1);
        assert_eq!(snap.tracks["t1"].status, "completed");
    }

    #[test]
    fn test_tracks_sorted_by_title() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Track(track("t1", "p1", "B side")));
        snap.apply(MonitorEvent::Track(track("t2", "p1", "A side")));
        snap.apply(MonitorEvent::Track(track("t3", "p2", "0 other playlist")));
        let titles: Vec<&str> = snap.tracks_for("p1").iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A side", "B side"]);
    }

    #[test]
    fn test_playlists_sorted_stable() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Playlist(playlist("p2", "Zebra", 0, 0)));
        snap.apply(MonitorEvent::Playlist(playlist("p1", "Alpha", 0, 0)));
        let names: Vec<&str> = snap
            .playlists_sorted()
            .iter()
            .map(|p| p.playlist_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zebra"]);
    }

    #[tokio::test]
    async fn test_store_apply_returns_updated_clone() {
        let store = ProgressStore::new();
        let snap = store
            .apply(MonitorEvent::Playlist(playlist("p1", "Mix", 2, 4)))
            .await;
        assert_eq!(snap.playlists.len(), 1);
        assert_eq!(store.get().await.playlists.len(), 1);
    }
}
