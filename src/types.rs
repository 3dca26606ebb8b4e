//! Type definitions for yt-focus
//!
//! Source of truth for all data structures.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::YtFocusError;

// ============================================
// Timer Types
// ============================================

/// Which phase the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    #[default]
    Focus,
    Break,
}

impl TimerMode {
    pub fn flipped(self) -> Self {
        match self {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
        }
    }
}

/// Interval timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u32,
    /// Always >= 60
    pub focus_duration_seconds: u32,
    /// Always >= 60
    pub break_duration_seconds: u32,
    pub running: bool,
}

impl TimerState {
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_duration_seconds,
            TimerMode::Break => self.break_duration_seconds,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_seconds: 1500,
            focus_duration_seconds: 1500,
            break_duration_seconds: 300,
            running: false,
        }
    }
}

// ============================================
// Playlist Types
// ============================================

/// One video of an ingested playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// YouTube video id
    pub id: String,
    pub title: String,
    /// Position in the final ordered playlist, 0-based
    pub index: usize,
}

/// Loaded playlist and selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistState {
    /// URL of the last committed ingest, as submitted
    pub source_url: String,
    pub entries: Vec<PlaylistEntry>,
    /// Only meaningful when `entries` is non-empty
    pub current_index: usize,
    /// Bumped on every ingest attempt
    pub ingest_generation: u64,
    /// Latest ingest still in flight
    pub loading: bool,
}

impl PlaylistState {
    pub fn current(&self) -> Option<&PlaylistEntry> {
        self.entries.get(self.current_index)
    }
}

// ============================================
// Player Types
// ============================================

/// Playback rate restricted to the values the player supports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    pub const SUPPORTED: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f64> for PlaybackRate {
    type Error = YtFocusError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::SUPPORTED
            .iter()
            .find(|supported| (**supported - rate).abs() < f64::EPSILON)
            .map(|supported| Self(*supported))
            .ok_or_else(|| YtFocusError::UnsupportedPlaybackRate(rate.to_string()))
    }
}

impl FromStr for PlaybackRate {
    type Err = YtFocusError;

    /// Accepts "1.5" as well as "1.5x"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('x');
        let rate: f64 = trimmed
            .parse()
            .map_err(|_| YtFocusError::UnsupportedPlaybackRate(s.to_string()))?;
        Self::try_from(rate)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Requested video quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Auto,
    Hd1080,
    Hd720,
    Large,
    Medium,
    Small,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Quality::Auto,
        Quality::Hd1080,
        Quality::Hd720,
        Quality::Large,
        Quality::Medium,
        Quality::Small,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Auto => "auto",
            Quality::Hd1080 => "hd1080",
            Quality::Hd720 => "hd720",
            Quality::Large => "large",
            Quality::Medium => "medium",
            Quality::Small => "small",
        }
    }

    /// Token understood by the player; `auto` is the player's "default"
    pub fn provider_token(self) -> &'static str {
        match self {
            Quality::Auto => "default",
            other => other.as_str(),
        }
    }
}

impl FromStr for Quality {
    type Err = YtFocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == wanted)
            .ok_or_else(|| YtFocusError::UnsupportedQuality(s.to_string()))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the rest of the app knows about the player
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerState {
    /// Flips to true once per player creation
    pub ready: bool,
    pub current_video_id: Option<String>,
    pub playback_rate: PlaybackRate,
    pub quality: Quality,
}

// ============================================
// Task Types
// ============================================

/// A to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================
// Config Types
// ============================================

/// Value shipped in the example config; never a usable key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API key
    pub api_key: String,
    /// Focus phase length in minutes (default: 25)
    pub focus_minutes: u32,
    /// Break phase length in minutes (default: 5)
    pub break_minutes: u32,
    /// YouTube Data API base URL
    pub api_base_url: String,
    /// How long the console player takes to report ready
    pub player_ready_delay_ms: u64,
    /// Ring the terminal bell when a phase ends
    pub bell: bool,
    /// Editor command (default: "nvim")
    pub editor: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.into(),
            focus_minutes: 25,
            break_minutes: 5,
            api_base_url: "https://www.googleapis.com/youtube/v3".into(),
            player_ready_delay_ms: 1500,
            bell: true,
            editor: "nvim".into(),
        }
    }
}

// ============================================
// Intent Types
// ============================================

/// Everything the front end can ask the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    StartTimer,
    PauseTimer,
    ResetTimer,
    UpdateDurations { focus_minutes: u32, break_minutes: u32 },
    IngestPlaylist(String),
    SelectVideo(usize),
    SetPlaybackRate(PlaybackRate),
    SetQuality(Quality),
    AddTask(String),
    ToggleTask(u64),
    DeleteTask(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_rate_parsing() {
        assert_eq!("1.5".parse::<PlaybackRate>().unwrap().value(), 1.5);
        assert_eq!("0.25x".parse::<PlaybackRate>().unwrap().value(), 0.25);
        assert!("3".parse::<PlaybackRate>().is_err());
        assert!("fast".parse::<PlaybackRate>().is_err());
        assert!(PlaybackRate::try_from(1.1).is_err());
    }

    #[test]
    fn test_quality_tokens() {
        assert_eq!(Quality::Auto.provider_token(), "default");
        assert_eq!(Quality::Hd720.provider_token(), "hd720");
        assert_eq!("HD1080".parse::<Quality>().unwrap(), Quality::Hd1080);
        assert!("4k".parse::<Quality>().is_err());
    }

    #[test]
    fn test_timer_defaults() {
        let state = TimerState::default();
        assert_eq!(state.mode, TimerMode::Focus);
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!(state.duration_for(TimerMode::Break), 300);
        assert!(!state.running);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"focus_minutes": 50}"#).unwrap();
        assert_eq!(config.focus_minutes, 50);
        assert_eq!(config.break_minutes, 5);
        assert_eq!(config.api_key, PLACEHOLDER_API_KEY);
    }
}
