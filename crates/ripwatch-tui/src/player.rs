//! Stream playback via an mpv child process.
//!
//! No IPC: the stream either plays or it doesn't. Spawn mpv pointed at the
//! stream URL to start, kill the child to stop.

use anyhow::Context;
use tracing::{info, warn};

use ripwatch_proto::platform;

pub struct Player {
    stream_url: String,
    child: Option<tokio::process::Child>,
}

impl Player {
    pub fn new(stream_url: String) -> Self {
        Self {
            stream_url,
            child: None,
        }
    }

    /// True while the mpv process is alive. Reaps a dead child as a side
    /// effect so a crashed mpv shows up as stopped.
    pub fn is_playing(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                if let Some(code) = status.code() {
                    warn!("[player] mpv exited with code {}", code);
                } else {
                    warn!("[player] mpv terminated by signal");
                }
                self.child = None;
                false
            }
            Err(e) => {
                warn!("[player] mpv liveness check failed: {}", e);
                self.child = None;
                false
            }
        }
    }

    pub fn play(&mut self) -> anyhow::Result<()> {
        if self.is_playing() {
            return Ok(());
        }

        let mpv = platform::find_mpv_binary()
            .context("mpv not found — install mpv or place it beside the executable")?;

        info!("[player] starting mpv for {}", self.stream_url);
        let child = tokio::process::Command::new(&mpv)
            .args(["--no-video", "--really-quiet", &self.stream_url])
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", mpv.display()))?;

        self.child = Some(child);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            info!("[player] stopping mpv");
            if let Err(e) = child.start_kill() {
                warn!("[player] failed to kill mpv: {}", e);
            }
        }
    }

    /// Toggle playback. Returns true when playing afterwards.
    pub fn toggle(&mut self) -> anyhow::Result<bool> {
        if self.is_playing() {
            self.stop();
            Ok(false)
        } else {
            self.play()?;
            Ok(true)
        }
    }
}
