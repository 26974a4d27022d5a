//! Action enum — intents produced by components, dispatched by the App.

use ripwatch_proto::submit::SubmitRequest;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    SubmitForm,
    Playlists,
    Tracks,
    NowPlaying,
    History,
}

/// All actions that can flow through the system.
#[derive(Debug, Clone)]
pub enum Action {
    /// The playlist cursor moved; the tracks pane follows this selection.
    PlaylistSelected(Option<String>),
    Submit(SubmitRequest),
    TogglePlayback,
    CopyToClipboard(String),
}
