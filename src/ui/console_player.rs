//! Console player
//!
//! Stands in for an embedded player: it announces what it is playing and
//! reports ready after a short buffering delay.

use std::time::Duration;

use colored::Colorize;
use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::core::player::{PlayerFactory, PlayerHandle, PlayerVars, build_video_url};
use crate::types::Quality;

pub struct ConsoleFactory {
    ready_delay: Duration,
}

impl ConsoleFactory {
    pub fn new(ready_delay: Duration) -> Self {
        Self { ready_delay }
    }
}

impl PlayerFactory for ConsoleFactory {
    type Handle = ConsolePlayer;

    /// Must be called from within the tokio runtime
    fn create(
        &mut self,
        video_id: &str,
        vars: PlayerVars,
        ready: oneshot::Sender<()>,
    ) -> ConsolePlayer {
        println!("{} {}", "⏳ Buffering".dimmed(), build_video_url(video_id));

        let delay = self.ready_delay;
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = ready.send(());
        });

        ConsolePlayer { vars }
    }
}

pub struct ConsolePlayer {
    vars: PlayerVars,
}

impl PlayerHandle for ConsolePlayer {
    fn load(&mut self, video_id: &str) {
        let verb = if self.vars.autoplay { "Playing" } else { "Cued" };
        println!("{} {}", format!("▶ {}:", verb).green(), build_video_url(video_id));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        println!("{} {}x", "Speed:".dimmed(), rate);
    }

    fn set_playback_quality(&mut self, quality: &str) {
        println!("{} {}", "Quality:".dimmed(), quality);
    }

    fn available_quality_levels(&self) -> Vec<String> {
        Quality::ALL
            .iter()
            .filter(|q| **q != Quality::Auto)
            .map(|q| q.provider_token().to_string())
            .collect()
    }
}
