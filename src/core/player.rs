//! Player control
//!
//! The controller owns the single player handle. The handle is created on
//! the first video load and reports readiness once, through a oneshot
//! channel. Rate and quality changes issued before that are dropped.

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{Result, YtFocusError};
use crate::types::{PlaybackRate, PlayerState, PlaylistState, Quality};

/// Build YouTube URL from video ID
pub fn build_video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Flags the player is constructed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerVars {
    pub autoplay: bool,
    pub controls: bool,
    pub modest_branding: bool,
    pub related_videos: bool,
}

impl Default for PlayerVars {
    fn default() -> Self {
        Self {
            autoplay: false,
            controls: false,
            modest_branding: true,
            related_videos: false,
        }
    }
}

/// A live player instance
pub trait PlayerHandle {
    fn load(&mut self, video_id: &str);
    fn set_playback_rate(&mut self, rate: f64);
    /// `quality` is a provider token such as "hd720" or "default"
    fn set_playback_quality(&mut self, quality: &str);
    fn available_quality_levels(&self) -> Vec<String>;
}

/// Creates player instances
pub trait PlayerFactory {
    type Handle: PlayerHandle;

    /// Build a player showing `video_id`. `ready` must be sent at most once,
    /// when the player can take commands.
    fn create(&mut self, video_id: &str, vars: PlayerVars, ready: oneshot::Sender<()>)
    -> Self::Handle;
}

pub struct PlayerController<F: PlayerFactory> {
    factory: F,
    handle: Option<F::Handle>,
    ready_rx: Option<oneshot::Receiver<()>>,
    /// Latest id asked for while waiting on readiness
    pending_video_id: Option<String>,
}

impl<F: PlayerFactory> PlayerController<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            handle: None,
            ready_rx: None,
            pending_video_id: None,
        }
    }

    pub fn has_player(&self) -> bool {
        self.handle.is_some()
    }

    /// Show a video, creating the player on first use
    pub fn load_video(&mut self, state: &mut PlayerState, video_id: &str) {
        match self.handle.as_mut() {
            None => {
                let (tx, rx) = oneshot::channel();
                info!(video_id, "creating player");
                self.handle = Some(self.factory.create(video_id, PlayerVars::default(), tx));
                self.ready_rx = Some(rx);
                self.pending_video_id = Some(video_id.to_string());
            }
            Some(handle) => {
                debug!(video_id, "loading video into existing player");
                handle.load(video_id);
                state.current_video_id = Some(video_id.to_string());
                if !state.ready {
                    self.pending_video_id = Some(video_id.to_string());
                }
            }
        }
    }

    /// Check for the readiness signal. Returns true on the call that
    /// observes it.
    pub fn poll_ready(&mut self, state: &mut PlayerState) -> bool {
        let Some(mut rx) = self.ready_rx.take() else {
            return false;
        };

        match rx.try_recv() {
            Ok(()) => {
                state.ready = true;
                state.current_video_id = self.pending_video_id.take();
                info!(video_id = ?state.current_video_id, "player ready");
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                self.ready_rx = Some(rx);
                false
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                // Next load_video starts over with a fresh player
                warn!("player went away before it was ready");
                self.handle = None;
                self.pending_video_id = None;
                false
            }
        }
    }

    /// Returns false when the command was dropped because the player is not
    /// ready yet
    pub fn set_playback_rate(&mut self, state: &mut PlayerState, rate: PlaybackRate) -> bool {
        let Some(handle) = self.ready_handle(state) else {
            debug!(%rate, "player not ready, dropping playback rate");
            return false;
        };
        handle.set_playback_rate(rate.value());
        state.playback_rate = rate;
        true
    }

    /// Same readiness rule as [`Self::set_playback_rate`]
    pub fn set_quality(&mut self, state: &mut PlayerState, quality: Quality) -> bool {
        let Some(handle) = self.ready_handle(state) else {
            debug!(%quality, "player not ready, dropping quality");
            return false;
        };

        let token = quality.provider_token();
        if quality != Quality::Auto {
            let levels = handle.available_quality_levels();
            if !levels.iter().any(|level| level == token) {
                debug!(token, ?levels, "quality not offered for this video");
            }
        }
        handle.set_playback_quality(token);
        state.quality = quality;
        true
    }

    /// Move the playlist cursor and load that video
    pub fn select_video(
        &mut self,
        playlist: &mut PlaylistState,
        state: &mut PlayerState,
        index: usize,
    ) -> Result<()> {
        let Some(entry) = playlist.entries.get(index) else {
            return Err(YtFocusError::IndexOutOfRange {
                index,
                len: playlist.entries.len(),
            });
        };

        let video_id = entry.id.clone();
        playlist.current_index = index;
        self.load_video(state, &video_id);
        Ok(())
    }

    fn ready_handle(&mut self, state: &PlayerState) -> Option<&mut F::Handle> {
        if !state.ready {
            return None;
        }
        self.handle.as_mut()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::PlaylistEntry;
    use std::sync::{Arc, Mutex};

    /// Records every call made against the player
    #[derive(Clone, Default)]
    pub(crate) struct FakeFactory {
        pub(crate) created: Arc<Mutex<Vec<(String, PlayerVars)>>>,
        pub(crate) calls: Arc<Mutex<Vec<String>>>,
        ready: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
    }

    impl FakeFactory {
        /// Fire the oldest pending readiness signal
        pub(crate) fn fire_ready(&self) {
            let sender = self.ready.lock().unwrap().remove(0);
            sender.send(()).unwrap();
        }

        /// Drop the oldest pending readiness signal without firing it
        pub(crate) fn abandon_ready(&self) {
            drop(self.ready.lock().unwrap().remove(0));
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    pub(crate) struct FakeHandle {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl PlayerHandle for FakeHandle {
        fn load(&mut self, video_id: &str) {
            self.calls.lock().unwrap().push(format!("load {}", video_id));
        }

        fn set_playback_rate(&mut self, rate: f64) {
            self.calls.lock().unwrap().push(format!("rate {}", rate));
        }

        fn set_playback_quality(&mut self, quality: &str) {
            self.calls.lock().unwrap().push(format!("quality {}", quality));
        }

        fn available_quality_levels(&self) -> Vec<String> {
            vec!["hd720".into(), "medium".into()]
        }
    }

    impl PlayerFactory for FakeFactory {
        type Handle = FakeHandle;

        fn create(
            &mut self,
            video_id: &str,
            vars: PlayerVars,
            ready: oneshot::Sender<()>,
        ) -> FakeHandle {
            self.created.lock().unwrap().push((video_id.to_string(), vars));
            self.ready.lock().unwrap().push(ready);
            FakeHandle {
                calls: Arc::clone(&self.calls),
            }
        }
    }

    fn playlist(count: usize) -> PlaylistState {
        PlaylistState {
            entries: (0..count)
                .map(|index| PlaylistEntry {
                    id: format!("vid{}", index),
                    title: format!("Video {}", index),
                    index,
                })
                .collect(),
            ..PlaylistState::default()
        }
    }

    #[test]
    fn test_first_load_creates_player_once() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();

        controller.load_video(&mut state, "abc");
        assert!(controller.has_player());
        assert!(!state.ready);
        assert_eq!(state.current_video_id, None);
        assert!(!controller.poll_ready(&mut state));

        factory.fire_ready();
        assert!(controller.poll_ready(&mut state));
        assert!(state.ready);
        assert_eq!(state.current_video_id.as_deref(), Some("abc"));

        // One-shot: later polls report nothing new
        assert!(!controller.poll_ready(&mut state));

        controller.load_video(&mut state, "def");
        assert_eq!(state.current_video_id.as_deref(), Some("def"));

        let created = factory.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].1, PlayerVars::default());
        assert_eq!(factory.calls(), vec!["load def"]);
    }

    #[test]
    fn test_commands_before_ready_are_dropped() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();

        let rate = PlaybackRate::try_from(1.5).unwrap();
        assert!(!controller.set_playback_rate(&mut state, rate));
        assert!(!controller.set_quality(&mut state, Quality::Hd720));

        controller.load_video(&mut state, "abc");
        assert!(!controller.set_playback_rate(&mut state, rate));
        assert_eq!(state.playback_rate, PlaybackRate::default());
        assert_eq!(state.quality, Quality::Auto);
        assert!(factory.calls().is_empty());

        // Nothing replays once ready
        factory.fire_ready();
        controller.poll_ready(&mut state);
        assert!(factory.calls().is_empty());
        assert_eq!(state.playback_rate, PlaybackRate::default());
    }

    #[test]
    fn test_commands_after_ready_apply() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();
        controller.load_video(&mut state, "abc");
        factory.fire_ready();
        controller.poll_ready(&mut state);

        assert!(controller.set_playback_rate(&mut state, PlaybackRate::try_from(0.75).unwrap()));
        assert!(controller.set_quality(&mut state, Quality::Auto));
        assert!(controller.set_quality(&mut state, Quality::Hd1080));

        assert_eq!(state.playback_rate.value(), 0.75);
        assert_eq!(state.quality, Quality::Hd1080);
        assert_eq!(
            factory.calls(),
            vec!["rate 0.75", "quality default", "quality hd1080"]
        );
    }

    #[test]
    fn test_load_during_handshake_reports_latest_id() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();

        controller.load_video(&mut state, "first");
        assert_eq!(state.current_video_id, None);

        // The player exists, so the id is visible straight away
        controller.load_video(&mut state, "second");
        assert!(controller.has_player());
        assert_eq!(state.current_video_id.as_deref(), Some("second"));
        assert_eq!(factory.calls(), vec!["load second"]);

        factory.fire_ready();
        controller.poll_ready(&mut state);
        assert_eq!(state.current_video_id.as_deref(), Some("second"));
        assert_eq!(factory.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_select_video_out_of_range() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();
        let mut list = playlist(3);
        list.current_index = 1;

        let err = controller.select_video(&mut list, &mut state, 5).unwrap_err();
        assert!(matches!(err, YtFocusError::IndexOutOfRange { index: 5, len: 3 }));
        assert_eq!(list.current_index, 1);
        assert_eq!(state.current_video_id, None);
        assert!(!controller.has_player());
    }

    #[test]
    fn test_select_video_loads_entry() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();
        let mut list = playlist(3);

        controller.select_video(&mut list, &mut state, 2).unwrap();
        assert_eq!(list.current_index, 2);
        assert_eq!(factory.created.lock().unwrap()[0].0, "vid2");
    }

    #[test]
    fn test_dropped_sender_allows_new_player() {
        let factory = FakeFactory::default();
        let mut controller = PlayerController::new(factory.clone());
        let mut state = PlayerState::default();

        controller.load_video(&mut state, "abc");
        factory.abandon_ready();
        assert!(!controller.poll_ready(&mut state));
        assert!(!state.ready);
        assert!(!controller.has_player());

        controller.load_video(&mut state, "def");
        assert_eq!(factory.created.lock().unwrap().len(), 2);
        factory.fire_ready();
        assert!(controller.poll_ready(&mut state));
        assert_eq!(state.current_video_id.as_deref(), Some("def"));

        let rate = PlaybackRate::try_from(2.0).unwrap();
        assert!(controller.set_playback_rate(&mut state, rate));
        assert_eq!(state.playback_rate, rate);
    }

    #[test]
    fn test_build_video_url() {
        assert_eq!(build_video_url("abc"), "https://www.youtube.com/watch?v=abc");
    }
}
