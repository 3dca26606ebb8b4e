//! Application controller
//!
//! Owns the timer, playlist, player and task state. Front ends talk to it
//! through [`AppController::dispatch`] and read it back through snapshots.

use tracing::{debug, info};

use crate::core::ingest::{IngestCompletion, IngestJob, IngestOutcome, PlaylistIngester};
use crate::core::player::{PlayerController, PlayerFactory};
use crate::core::tasks::TaskList;
use crate::core::timer;
use crate::core::youtube::ListingSource;
use crate::error::Result;
use crate::types::{Intent, PlayerState, PlaylistState, Task, TimerMode, TimerState};

/// Work a dispatch hands back to the event loop
#[derive(Debug)]
pub enum Effect<S> {
    None,
    /// Run this off the loop and feed the completion to
    /// [`AppController::complete_ingest`]
    Ingest(IngestJob<S>),
}

/// Read-only copy of everything a front end renders
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timer: TimerState,
    pub playlist: PlaylistState,
    pub player: PlayerState,
    pub tasks: Vec<Task>,
}

pub struct AppController<S: ListingSource, F: PlayerFactory> {
    timer: TimerState,
    playlist: PlaylistState,
    player: PlayerState,
    tasks: TaskList,
    ingester: PlaylistIngester<S>,
    player_controller: PlayerController<F>,
}

impl<S: ListingSource, F: PlayerFactory> AppController<S, F> {
    pub fn new(ingester: PlaylistIngester<S>, factory: F, timer: TimerState) -> Self {
        Self {
            timer,
            playlist: PlaylistState::default(),
            player: PlayerState::default(),
            tasks: TaskList::new(),
            ingester,
            player_controller: PlayerController::new(factory),
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<Effect<S>> {
        debug!(?intent, "dispatch");

        match intent {
            Intent::StartTimer => self.timer = timer::start(self.timer),
            Intent::PauseTimer => self.timer = timer::pause(self.timer),
            Intent::ResetTimer => self.timer = timer::reset(self.timer),
            Intent::UpdateDurations {
                focus_minutes,
                break_minutes,
            } => {
                self.timer = timer::update_durations(self.timer, focus_minutes, break_minutes);
            }
            Intent::IngestPlaylist(url) => {
                let job = self.ingester.begin(&mut self.playlist, &url)?;
                return Ok(Effect::Ingest(job));
            }
            Intent::SelectVideo(index) => {
                self.player_controller
                    .select_video(&mut self.playlist, &mut self.player, index)?;
            }
            Intent::SetPlaybackRate(rate) => {
                self.player_controller
                    .set_playback_rate(&mut self.player, rate);
            }
            Intent::SetQuality(quality) => {
                self.player_controller.set_quality(&mut self.player, quality);
            }
            Intent::AddTask(text) => {
                self.tasks.add(&text);
            }
            Intent::ToggleTask(id) => {
                self.tasks.toggle(id)?;
            }
            Intent::DeleteTask(id) => self.tasks.delete(id)?,
        }

        Ok(Effect::None)
    }

    /// One second elapsed. Returns the new mode when a phase just ended.
    pub fn tick(&mut self) -> Option<TimerMode> {
        let before = self.timer;
        self.timer = timer::tick(self.timer);

        if before.running && !self.timer.running && before.mode != self.timer.mode {
            info!(mode = self.timer.mode.label(), "phase boundary");
            return Some(self.timer.mode);
        }
        None
    }

    /// Apply a finished ingest and load the first video of a new playlist
    pub fn complete_ingest(&mut self, completion: IngestCompletion) -> Result<IngestOutcome> {
        let outcome = self.ingester.commit(&mut self.playlist, completion)?;

        if matches!(outcome, IngestOutcome::Committed { count } if count > 0) {
            let first = self.playlist.entries[0].id.clone();
            self.player_controller.load_video(&mut self.player, &first);
        }
        Ok(outcome)
    }

    /// True when a newer ingest was started after this one
    pub fn is_superseded(&self, completion: &IngestCompletion) -> bool {
        completion.generation != self.playlist.ingest_generation
    }

    /// Ingest inline, for callers without their own event loop
    pub async fn ingest_playlist(&mut self, url: &str) -> Result<IngestOutcome> {
        match self.dispatch(Intent::IngestPlaylist(url.to_string()))? {
            Effect::Ingest(job) => {
                let completion = job.run().await;
                self.complete_ingest(completion)
            }
            Effect::None => Ok(IngestOutcome::Superseded),
        }
    }

    /// Returns true once, when the player becomes ready
    pub fn poll_player(&mut self) -> bool {
        self.player_controller.poll_ready(&mut self.player)
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn playlist(&self) -> &PlaylistState {
        &self.playlist
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.get_all()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timer: self.timer,
            playlist: self.playlist.clone(),
            player: self.player.clone(),
            tasks: self.tasks.get_all().to_vec(),
        }
    }
}
