//! Plain-text rendering of app snapshots

use colored::Colorize;

use crate::app::Snapshot;
use crate::core::timer::format_clock;
use crate::types::{PlaylistState, Task, TimerMode};

/// One-line summary of timer, playlist and player
pub fn status_line(snapshot: &Snapshot) -> String {
    let timer = &snapshot.timer;
    let clock = format_clock(timer.remaining_seconds);
    let clock = match timer.mode {
        TimerMode::Focus => clock.green().bold(),
        TimerMode::Break => clock.cyan().bold(),
    };
    let state = if timer.running { "▶" } else { "⏸" };

    let mut line = format!(
        "# {}_time {} {}  {}",
        timer.mode.label(),
        clock,
        state,
        format!(
            "(focus {} min | break {} min)",
            timer.focus_duration_seconds / 60,
            timer.break_duration_seconds / 60
        )
        .dimmed()
    );

    let playlist = &snapshot.playlist;
    if playlist.loading {
        line.push_str(&format!("  {}", "loading playlist...".yellow()));
    } else if let Some(entry) = playlist.current() {
        line.push_str(&format!(
            "  [{}/{}] {}",
            entry.index + 1,
            playlist.entries.len(),
            entry.title
        ));
    }

    let player = &snapshot.player;
    if player.current_video_id.is_some() || player.ready {
        let readiness = if player.ready {
            "ready".green()
        } else {
            "starting".yellow()
        };
        line.push_str(&format!(
            "  {} {} {}",
            player.playback_rate,
            player.quality,
            readiness
        ));
    }

    let open = snapshot.tasks.iter().filter(|t| !t.completed).count();
    if !snapshot.tasks.is_empty() {
        line.push_str(&format!("  {}", format!("{} open tasks", open).dimmed()));
    }

    line
}

/// Numbered playlist, current entry marked
pub fn playlist_lines(playlist: &PlaylistState) -> Vec<String> {
    if playlist.entries.is_empty() {
        let hint = if playlist.loading {
            "loading_playlist..."
        } else {
            "load_a_playlist_to_see_videos"
        };
        return vec![hint.dimmed().to_string()];
    }

    playlist
        .entries
        .iter()
        .map(|entry| {
            let text = format!("{:>3}. {}", entry.index + 1, entry.title);
            if entry.index == playlist.current_index {
                format!("{} {}", "»".blue(), text.bold())
            } else {
                format!("  {}", text)
            }
        })
        .collect()
}

/// Task list with ids for `done`/`rm`
pub fn task_lines(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["no tasks yet".dimmed().to_string()];
    }

    tasks
        .iter()
        .map(|task| {
            if task.completed {
                format!("[x] {:>3} {}", task.id, task.text.strikethrough().dimmed())
            } else {
                format!("[ ] {:>3} {}", task.id, task.text)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerState, PlaylistEntry, TimerState};
    use chrono::Utc;

    fn snapshot() -> Snapshot {
        Snapshot {
            timer: TimerState::default(),
            playlist: PlaylistState {
                entries: vec![
                    PlaylistEntry {
                        id: "a".into(),
                        title: "Rain sounds".into(),
                        index: 0,
                    },
                    PlaylistEntry {
                        id: "b".into(),
                        title: "Jazz".into(),
                        index: 1,
                    },
                ],
                current_index: 1,
                ..PlaylistState::default()
            },
            player: PlayerState::default(),
            tasks: vec![Task {
                id: 1,
                text: "essay".into(),
                completed: false,
                created_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn test_status_line() {
        colored::control::set_override(false);
        let line = status_line(&snapshot());
        assert!(line.contains("focus_time 25:00"));
        assert!(line.contains("[2/2] Jazz"));
        assert!(line.contains("1 open tasks"));
    }

    #[test]
    fn test_playlist_marks_current() {
        colored::control::set_override(false);
        let lines = playlist_lines(&snapshot().playlist);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with('»'));
        assert!(lines[0].contains("1. Rain sounds"));
    }

    #[test]
    fn test_empty_views() {
        colored::control::set_override(false);
        assert_eq!(
            playlist_lines(&PlaylistState::default()),
            vec!["load_a_playlist_to_see_videos"]
        );
        assert_eq!(task_lines(&[]), vec!["no tasks yet"]);
    }
}
