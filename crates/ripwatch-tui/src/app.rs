//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for
//!   components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks (SSE subscription, metadata poller, submit/cover jobs).
//! - The event loop draws a frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action. Only the
//!   event loop mutates `AppState`.

use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ripwatch_proto::config::Config;
use ripwatch_proto::cover::CoverClient;
use ripwatch_proto::events::MonitorEvent;
use ripwatch_proto::icecast::StreamMetadata;
use ripwatch_proto::progress::ProgressStore;
use ripwatch_proto::submit::{SubmitClient, SubmitError, SubmitReceipt, SubmitRequest};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        history::HistoryPanel, now_playing::NowPlayingPanel, playlists::PlaylistsPanel,
        submit_form::SubmitForm, tracks::TracksPanel,
    },
    focus::FocusRing,
    player::Player,
    widgets::{notice::NoticeBar, status_bar},
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    /// The event-stream subscription opened.
    SseConnected,
    /// The subscription dropped; next attempt after `retry_in`.
    SseDisconnected { retry_in: Duration },
    Monitor(MonitorEvent),
    Metadata(StreamMetadata),
    /// Resolved cover for the track identified by `key`. Stale responses
    /// (key no longer current) are discarded on receipt.
    Cover { key: String, url: String },
    SubmitFinished(Result<SubmitReceipt, SubmitError>),
}

const MAX_DRAIN: usize = 256;

#[derive(Default)]
struct PaneAreas {
    submit_form: Rect,
    playlists: Rect,
    tracks: Rect,
    now_playing: Rect,
    history: Rect,
}

pub struct App {
    state: AppState,
    config: Config,

    submit_form: SubmitForm,
    playlists: PlaylistsPanel,
    tracks: TracksPanel,
    now_playing: NowPlayingPanel,
    history: HistoryPanel,

    focus: FocusRing,
    notice: NoticeBar,
    pane_areas: PaneAreas,

    player: Player,
    store: ProgressStore,
    submit_client: SubmitClient,
    cover_client: CoverClient,
    tx: mpsc::Sender<AppMessage>,

    should_quit: bool,
}

impl App {
    pub fn new(config: Config, store: ProgressStore, tx: mpsc::Sender<AppMessage>) -> Self {
        let submit_client = SubmitClient::new(config.monitor.submit_url());
        let cover_client = CoverClient::new(config.radio.cover_api_url.clone());
        let player = Player::new(config.radio.stream_url());

        Self {
            state: AppState::new(),
            config,
            submit_form: SubmitForm::new(),
            playlists: PlaylistsPanel::new(),
            tracks: TracksPanel::new(),
            now_playing: NowPlayingPanel::new(),
            history: HistoryPanel::new(),
            focus: FocusRing::new(vec![
                ComponentId::SubmitForm,
                ComponentId::Playlists,
                ComponentId::Tracks,
                ComponentId::NowPlaying,
                ComponentId::History,
            ]),
            notice: NoticeBar::new(),
            pane_areas: PaneAreas::default(),
            player,
            store,
            submit_client,
            cover_client,
            tx,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut rx: mpsc::Receiver<AppMessage>) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.push_log("ripwatch started".to_string());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // Notice expiry, component maintenance, flash timeout, mpv liveness.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg).await;
                    // Drain bursts (e.g. the initial state replay on connect)
                    // before redrawing.
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        match rx.try_recv() {
                            Ok(next) => {
                                drained += 1;
                                redraw |= self.handle_message(next).await;
                            }
                            Err(_) => break,
                        }
                    }
                    needs_redraw = redraw;
                }

                _ = ui_tick.tick() => {
                    self.notice.tick();
                    self.state.playing = self.player.is_playing();

                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.playlists.tick(s));
                        all.extend(self.tracks.tick(s));
                        all.extend(self.history.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action).await;
                    }
                    needs_redraw = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.player.stop();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn push_log(&mut self, message: String) {
        info!("{}", message);
        self.state.last_log = Some(message);
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => self.handle_terminal_event(ev).await,

            AppMessage::SseConnected => {
                self.state.connected = true;
                self.state.reconnect_in = None;
                self.push_log("event stream connected".to_string());
                true
            }

            AppMessage::SseDisconnected { retry_in } => {
                self.state.connected = false;
                self.state.reconnect_in = Some(retry_in);
                self.push_log(format!(
                    "event stream lost — retrying in {}s",
                    retry_in.as_secs().max(1)
                ));
                true
            }

            AppMessage::Monitor(event) => {
                self.state.snapshot = self.store.apply(event).await;
                if self.state.selected_playlist.is_none() {
                    let first = self
                        .state
                        .snapshot
                        .playlists_sorted()
                        .first()
                        .map(|p| p.playlist_id.clone());
                    self.state.selected_playlist = first;
                }
                true
            }

            AppMessage::Metadata(meta) => self.handle_metadata(meta),

            AppMessage::Cover { key, url } => {
                let current_key = self
                    .state
                    .now_playing
                    .current()
                    .map(|c| c.composite_key());
                if current_key.as_deref() == Some(key.as_str()) {
                    self.state.cover_url = Some(url);
                    true
                } else {
                    // A newer track superseded this lookup.
                    debug!("[cover] discarding stale response for {}", key);
                    false
                }
            }

            AppMessage::SubmitFinished(Ok(receipt)) => {
                self.notice
                    .success(format!("Download started — task {}", receipt.task_id));
                self.submit_form.clear();
                true
            }

            AppMessage::SubmitFinished(Err(e)) => {
                self.notice.error(e.to_string());
                true
            }
        }
    }

    fn handle_metadata(&mut self, meta: StreamMetadata) -> bool {
        self.state.listeners = meta.listeners;
        self.state.bitrate = meta.bitrate.clone();
        self.state.server_name = meta.server_name.clone();
        self.state.server_description = meta.server_description.clone();

        let Some(track) = self.state.now_playing.observe(&meta) else {
            // Same track as before — stream details may still have moved.
            return true;
        };

        self.push_log(format!("now playing: {}", track.display()));
        self.state.track_changed_at = Some(Instant::now());
        self.state.cover_url = None;

        // Terminal title is our media-surface analog of the page title.
        let _ = execute!(
            io::stdout(),
            SetTitle(format!("{} · ripwatch", track.display()))
        );

        // Fire-and-forget cover lookup, stamped with the track key so a
        // stale response can be recognised and dropped.
        let key = track.composite_key();
        let artist = track.artist.clone();
        let title = track.title.clone();
        let album = track.album.clone();
        let cover_client = self.cover_client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let album = if album.is_empty() { None } else { Some(album.as_str()) };
            let url = cover_client.lookup(&artist, &title, album).await;
            let _ = tx.send(AppMessage::Cover { key, url }).await;
        });

        true
    }

    // ── Terminal events ───────────────────────────────────────────────────────

    async fn handle_terminal_event(&mut self, ev: Event) -> bool {
        match ev {
            Event::Key(key) => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse).await,
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        // Ctrl+C always quits, whatever has focus.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }

        let focused = self.focus.current();
        let typing = focused == Some(ComponentId::SubmitForm);

        // Global keys — suppressed while the submit form is capturing text.
        match key.code {
            KeyCode::Tab => {
                self.focus.next();
                return true;
            }
            KeyCode::BackTab => {
                self.focus.prev();
                return true;
            }
            KeyCode::Char('q') if !typing => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('p') if !typing => {
                self.dispatch(Action::TogglePlayback).await;
                return true;
            }
            KeyCode::Char(c @ '1'..='5') if !typing => {
                let id = match c {
                    '1' => ComponentId::SubmitForm,
                    '2' => ComponentId::Playlists,
                    '3' => ComponentId::Tracks,
                    '4' => ComponentId::NowPlaying,
                    _ => ComponentId::History,
                };
                self.focus.set(id);
                return true;
            }
            _ => {}
        }

        let actions = match focused {
            Some(ComponentId::SubmitForm) => self.submit_form.handle_key(key, &self.state),
            Some(ComponentId::Playlists) => self.playlists.handle_key(key, &self.state),
            Some(ComponentId::Tracks) => self.tracks.handle_key(key, &self.state),
            Some(ComponentId::NowPlaying) => self.now_playing.handle_key(key, &self.state),
            Some(ComponentId::History) => self.history.handle_key(key, &self.state),
            None => Vec::new(),
        };
        for action in actions {
            self.dispatch(action).await;
        }
        true
    }

    async fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let pos = Position::new(mouse.column, mouse.row);
        let target = [
            (ComponentId::SubmitForm, self.pane_areas.submit_form),
            (ComponentId::Playlists, self.pane_areas.playlists),
            (ComponentId::Tracks, self.pane_areas.tracks),
            (ComponentId::NowPlaying, self.pane_areas.now_playing),
            (ComponentId::History, self.pane_areas.history),
        ]
        .into_iter()
        .find(|(_, area)| area.contains(pos));

        let Some((id, area)) = target else {
            return false;
        };

        if matches!(mouse.kind, MouseEventKind::Down(_)) {
            self.focus.set(id);
        }

        let actions = match id {
            ComponentId::SubmitForm => self.submit_form.handle_mouse(mouse, area, &self.state),
            ComponentId::Playlists => self.playlists.handle_mouse(mouse, area, &self.state),
            ComponentId::Tracks => self.tracks.handle_mouse(mouse, area, &self.state),
            ComponentId::NowPlaying => self.now_playing.handle_mouse(mouse, area, &self.state),
            ComponentId::History => self.history.handle_mouse(mouse, area, &self.state),
        };
        for action in actions {
            self.dispatch(action).await;
        }
        true
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        match action {
            Action::PlaylistSelected(id) => {
                if self.state.selected_playlist != id {
                    self.state.selected_playlist = id;
                }
            }

            Action::Submit(request) => self.spawn_submit(request),

            Action::TogglePlayback => match self.player.toggle() {
                Ok(true) => {
                    self.state.playing = true;
                    self.push_log(format!("playing {}", self.config.radio.stream_url()));
                }
                Ok(false) => {
                    self.state.playing = false;
                    self.push_log("playback stopped".to_string());
                }
                Err(e) => {
                    warn!("playback failed: {}", e);
                    self.notice.error(e.to_string());
                }
            },

            Action::CopyToClipboard(text) => match arboard::Clipboard::new()
                .and_then(|mut clip| clip.set_text(text))
            {
                Ok(()) => self.notice.success("copied to clipboard"),
                Err(e) => {
                    warn!("clipboard copy failed: {}", e);
                    self.notice.error("clipboard unavailable");
                }
            },
        }
    }

    /// The submit client validates locally (an empty URL errors without any
    /// request) and reports back through the message bus either way.
    fn spawn_submit(&mut self, request: SubmitRequest) {
        let client = self.submit_client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.submit(&request).await;
            let _ = tx.send(AppMessage::SubmitFinished(result)).await;
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use ratatui::widgets::Block;

        use crate::theme::C_BG;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // submit form
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
                Constraint::Length(1), // keys bar
            ])
            .split(area);

        let form_area = outer[0];
        let body_area = outer[1];
        let status_area = outer[2];
        let keys_area = outer[3];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body_area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(columns[1]);

        self.pane_areas = PaneAreas {
            submit_form: form_area,
            playlists: left[0],
            tracks: left[1],
            now_playing: right[0],
            history: right[1],
        };

        let focused = self.focus.current();
        self.submit_form.draw(
            frame,
            form_area,
            focused == Some(ComponentId::SubmitForm),
            &self.state,
        );
        self.playlists.draw(
            frame,
            left[0],
            focused == Some(ComponentId::Playlists),
            &self.state,
        );
        self.tracks.draw(
            frame,
            left[1],
            focused == Some(ComponentId::Tracks),
            &self.state,
        );
        self.now_playing.draw(
            frame,
            right[0],
            focused == Some(ComponentId::NowPlaying),
            &self.state,
        );
        self.history.draw(
            frame,
            right[1],
            focused == Some(ComponentId::History),
            &self.state,
        );

        status_bar::draw_status_bar(frame, status_area, &self.state);
        status_bar::draw_keys_bar(frame, keys_area);

        self.notice.draw(frame, area);
    }
}
