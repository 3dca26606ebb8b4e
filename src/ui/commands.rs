//! Parsing of typed commands

use crate::error::{Result, YtFocusError};
use crate::types::{Intent, PlaybackRate, Quality};

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    /// Start when paused, pause when running
    Toggle,
    Next,
    Prev,
    List,
    Tasks,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
start | pause | toggle | reset        control the timer
durations <focus> <break>             set phase lengths in minutes
load <playlist url>                   fetch a YouTube playlist
select <n> | next | prev              play a playlist entry
rate <0.25..2>                        playback speed
quality <auto|hd1080|hd720|large|medium|small>
add <text> | done <id> | rm <id>      manage tasks
list | tasks | status | help | quit";

/// Parse one line. Blank lines yield `Status`.
pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    let command = match word.to_lowercase().as_str() {
        "" | "status" | "s" => Command::Status,
        "start" => Command::Intent(Intent::StartTimer),
        "pause" => Command::Intent(Intent::PauseTimer),
        "toggle" | "t" => Command::Toggle,
        "reset" => Command::Intent(Intent::ResetTimer),
        "durations" | "d" => {
            let mut parts = rest.split_whitespace();
            let focus_minutes = parse_number(parts.next(), "durations <focus> <break>")?;
            let break_minutes = parse_number(parts.next(), "durations <focus> <break>")?;
            Command::Intent(Intent::UpdateDurations {
                focus_minutes,
                break_minutes,
            })
        }
        "load" => {
            if rest.is_empty() {
                return Err(usage("load <playlist url>"));
            }
            Command::Intent(Intent::IngestPlaylist(rest.to_string()))
        }
        "select" | "play" => {
            // Shown 1-based in the playlist view
            let n: usize = parse_number(Some(rest), "select <n>")?;
            if n == 0 {
                return Err(usage("select <n> (counting from 1)"));
            }
            Command::Intent(Intent::SelectVideo(n - 1))
        }
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "rate" => Command::Intent(Intent::SetPlaybackRate(rest.parse::<PlaybackRate>()?)),
        "quality" => Command::Intent(Intent::SetQuality(rest.parse::<Quality>()?)),
        "add" => {
            if rest.is_empty() {
                return Err(usage("add <text>"));
            }
            Command::Intent(Intent::AddTask(rest.to_string()))
        }
        "done" => Command::Intent(Intent::ToggleTask(parse_number(Some(rest), "done <id>")?)),
        "rm" | "delete" => Command::Intent(Intent::DeleteTask(parse_number(Some(rest), "rm <id>")?)),
        "list" | "ls" => Command::List,
        "tasks" => Command::Tasks,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => {
            return Err(YtFocusError::InvalidCommand(format!(
                "unknown command '{}', try 'help'",
                other
            )));
        }
    };

    Ok(command)
}

fn parse_number<T: std::str::FromStr>(word: Option<&str>, usage_text: &str) -> Result<T> {
    word.and_then(|w| w.trim().parse().ok())
        .ok_or_else(|| usage(usage_text))
}

fn usage(text: &str) -> YtFocusError {
    YtFocusError::InvalidCommand(format!("usage: {}", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timer_commands() {
        assert_eq!(parse("start").unwrap(), Command::Intent(Intent::StartTimer));
        assert_eq!(parse("  t ").unwrap(), Command::Toggle);
        assert_eq!(
            parse("durations 50 10").unwrap(),
            Command::Intent(Intent::UpdateDurations {
                focus_minutes: 50,
                break_minutes: 10
            })
        );
        assert!(parse("durations 50").is_err());
    }

    #[test]
    fn test_parse_playlist_commands() {
        assert_eq!(
            parse("load https://www.youtube.com/playlist?list=PL1").unwrap(),
            Command::Intent(Intent::IngestPlaylist(
                "https://www.youtube.com/playlist?list=PL1".into()
            ))
        );
        assert_eq!(parse("select 3").unwrap(), Command::Intent(Intent::SelectVideo(2)));
        assert!(parse("select 0").is_err());
        assert!(parse("load").is_err());
    }

    #[test]
    fn test_parse_player_commands() {
        let Command::Intent(Intent::SetPlaybackRate(rate)) = parse("rate 1.25x").unwrap() else {
            panic!("expected a rate intent");
        };
        assert_eq!(rate.value(), 1.25);
        assert_eq!(
            parse("quality hd720").unwrap(),
            Command::Intent(Intent::SetQuality(Quality::Hd720))
        );
        assert!(parse("rate 3").is_err());
        assert!(parse("quality 4k").is_err());
    }

    #[test]
    fn test_parse_task_commands() {
        assert_eq!(
            parse("add review   lecture 4").unwrap(),
            Command::Intent(Intent::AddTask("review   lecture 4".into()))
        );
        assert_eq!(parse("done 2").unwrap(), Command::Intent(Intent::ToggleTask(2)));
        assert_eq!(parse("rm 2").unwrap(), Command::Intent(Intent::DeleteTask(2)));
    }

    #[test]
    fn test_blank_and_unknown() {
        assert_eq!(parse("").unwrap(), Command::Status);
        assert!(matches!(
            parse("dance"),
            Err(YtFocusError::InvalidCommand(_))
        ));
    }
}
