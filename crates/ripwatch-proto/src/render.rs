//! HTML rendering of the progress snapshot, served by the embedded server.
//!
//! Pure functions from snapshot to markup. Every user-supplied string
//! (playlist names, titles, artists, statuses) passes through
//! `escape_html` before insertion — the monitor displays whatever the
//! backend relays from external catalogues.

use crate::events::TrackUpdate;
use crate::progress::ProgressSnapshot;

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full snapshot page.
pub fn render_page(snap: &ProgressSnapshot) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>ripwatch</title>\n<style>{}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<h1>Download Progress</h1>\n{}</div>\n</body>\n</html>\n",
        PAGE_STYLE,
        render_body(snap)
    )
}

/// Render the snapshot body: one section per playlist, or a placeholder
/// when nothing has been submitted yet.
pub fn render_body(snap: &ProgressSnapshot) -> String {
    let playlists = snap.playlists_sorted();
    if playlists.is_empty() {
        return "<p class=\"empty\">No playlists yet — submit a playlist URL to get started.</p>\n"
            .to_string();
    }

    let mut out = String::new();
    for p in playlists {
        let percent = p.percent();
        out.push_str(&format!(
            "<section class=\"playlist\">\n<h2>{}</h2>\n\
             <p class=\"meta\"><span class=\"status\">{}</span> · \
             {} / {} tracks · {} found · {} failed</p>\n\
             <div class=\"bar\"><div class=\"fill\" style=\"width:{:.0}%\"></div></div>\n",
            escape_html(&p.playlist_name),
            escape_html(&p.status),
            p.completed_tracks,
            p.total_tracks,
            p.found_tracks,
            p.failed_tracks,
            percent,
        ));

        if let Some(search) = snap.search_for(&p.playlist_id) {
            if p.status == "resolving" {
                out.push_str(&format!(
                    "<p class=\"search\">searching: {} ({} / {})</p>\n",
                    escape_html(&search.current_query),
                    search.found,
                    search.total,
                ));
            }
        }

        let tracks = snap.tracks_for(&p.playlist_id);
        if !tracks.is_empty() {
            out.push_str(
                "<table>\n<tr><th>Title</th><th>Artist</th><th>Status</th><th>Progress</th></tr>\n",
            );
            for t in &tracks {
                out.push_str(&render_track_row(t));
            }
            out.push_str("</table>\n");
        }
        out.push_str("</section>\n");
    }
    out
}

fn render_track_row(t: &TrackUpdate) -> String {
    // The progress cell carries a bar only while downloading; any stored
    // progress value for other statuses is not shown.
    let progress_cell = if t.status == "downloading" {
        format!(
            "<div class=\"bar small\"><div class=\"fill\" style=\"width:{:.0}%\"></div></div>",
            t.progress.clamp(0.0, 100.0)
        )
    } else {
        String::new()
    };

    let status_cell = match t.error_message.as_deref() {
        Some(err) if t.status == "failed" => format!(
            "{} <span class=\"err\">{}</span>",
            escape_html(&t.status),
            escape_html(err)
        ),
        _ => escape_html(&t.status),
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td class=\"status\">{}</td><td>{}</td></tr>\n",
        escape_html(&t.title),
        escape_html(&t.artist),
        status_cell,
        progress_cell,
    )
}

const PAGE_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 40px; background: #1e1e2e; color: #cdd6f4; }\n\
.container { background: #313244; padding: 30px; border-radius: 10px; max-width: 800px; margin: 0 auto; }\n\
.empty { color: #a6adc8; }\n\
.meta { color: #a6adc8; }\n\
.search { color: #89b4fa; }\n\
.err { color: #f38ba8; }\n\
.bar { background: #45475a; border-radius: 4px; height: 10px; overflow: hidden; }\n\
.bar.small { width: 120px; height: 6px; }\n\
.fill { background: #a6e3a1; height: 100%; }\n\
table { width: 100%; border-collapse: collapse; margin-top: 10px; }\n\
th, td { text-align: left; padding: 4px 8px; border-bottom: 1px solid #45475a; }\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MonitorEvent, PlaylistUpdate};

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

    fn track(id: &str, playlist: &str, title: &str, status: &str, progress: f64) -> TrackUpdate {
        TrackUpdate {
            track_id: id.to_string(),
            playlist_id: Some(playlist.to_string()),
            title: title.to_string(),
            artist: "Artist".to_string(),
            status: status.to_string(),
            progress,
            error_message: None,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_empty_snapshot_renders_placeholder() {
        let body = render_body(&ProgressSnapshot::new());
        assert!(body.contains("No playlists yet"));
        assert!(!body.contains("<table>"));
    }

    #[test]
    fn test_playlist_name_is_escaped() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Playlist(playlist(
            "p1",
            "<script>alert(1)</script>",
            0,
            0,
        )));
        let body = render_body(&snap);
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_progress_bar_only_while_downloading() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Playlist(playlist("p1", "Mix", 1, 4)));
        snap.apply(MonitorEvent::Track(track("t1", "p1", "Halted", "paused", 80.0)));
        let body = render_body(&snap);
        assert!(!body.contains("width:80%"));

        snap.apply(MonitorEvent::Track(track("t1", "p1", "Halted", "downloading", 80.0)));
        let body = render_body(&snap);
        assert!(body.contains("width:80%"));
    }

    #[test]
    fn test_zero_total_renders_zero_percent() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Playlist(playlist("p1", "Empty", 0, 0)));
        let body = render_body(&snap);
        assert!(body.contains("width:0%"));
    }

    #[test]
    fn test_tracks_render_in_title_order() {
        let mut snap = ProgressSnapshot::new();
        snap.apply(MonitorEvent::Playlist(playlist("p1", "Mix", 0, 2)));
        snap.apply(MonitorEvent::Track(track("t1", "p1", "B", "queued", 0.0)));
        snap.apply(MonitorEvent::Track(track("t2", "p1", "A", "queued", 0.0)));
        let body = render_body(&snap);
        let a = body.find("<td>A</td>").unwrap();
        let b = body.find("<td>B</td>").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_escape_html_all_specials() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }
}
