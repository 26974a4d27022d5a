//! AppState — shared read-only data passed to all components during
//! render/event handling. Only the App event-loop writes to it.

use std::time::{Duration, Instant};

use ripwatch_proto::nowplaying::NowPlaying;
use ripwatch_proto::progress::ProgressSnapshot;

/// How long the entrance highlight lingers after a track change.
pub const TRACK_FLASH: Duration = Duration::from_millis(1200);

pub struct AppState {
    // ── Monitor ─────────────────────────────────────────────────────────────
    /// True while the event-stream subscription is open.
    pub connected: bool,
    /// Delay before the next reconnect attempt, when disconnected.
    pub reconnect_in: Option<Duration>,
    pub snapshot: ProgressSnapshot,
    /// Playlist the tracks pane follows.
    pub selected_playlist: Option<String>,

    // ── Radio ───────────────────────────────────────────────────────────────
    pub now_playing: NowPlaying,
    pub listeners: u32,
    pub bitrate: String,
    pub server_name: String,
    pub server_description: String,
    /// Resolved cover URL for the current track; None while a lookup is
    /// in flight (or nothing has played yet).
    pub cover_url: Option<String>,
    /// True while the mpv child is running.
    pub playing: bool,
    /// Set on every track change; drives the entrance highlight.
    pub track_changed_at: Option<Instant>,

    // ── Session ─────────────────────────────────────────────────────────────
    /// Last log line for the status bar.
    pub last_log: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            connected: false,
            reconnect_in: None,
            snapshot: ProgressSnapshot::new(),
            selected_playlist: None,
            now_playing: NowPlaying::new(),
            listeners: 0,
            bitrate: String::new(),
            server_name: String::new(),
            server_description: String::new(),
            cover_url: None,
            playing: false,
            track_changed_at: None,
            last_log: None,
        }
    }

    /// True while the entrance highlight should still render.
    pub fn track_flash_active(&self) -> bool {
        self.track_changed_at
            .map(|at| at.elapsed() < TRACK_FLASH)
            .unwrap_or(false)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
