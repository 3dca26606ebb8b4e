//! Focus/break countdown
//!
//! Pure functions over [`TimerState`]: each takes the current state and
//! returns the next one. Scheduling ticks is the caller's job.

use tracing::debug;

use crate::types::{TimerMode, TimerState};

const SECONDS_PER_MINUTE: u32 = 60;

/// Start counting down. A zero-length phase is never started.
pub fn start(state: TimerState) -> TimerState {
    if state.remaining_seconds == 0 {
        return state;
    }
    TimerState {
        running: true,
        ..state
    }
}

pub fn pause(state: TimerState) -> TimerState {
    TimerState {
        running: false,
        ..state
    }
}

/// Back to a paused, full-length focus phase
pub fn reset(state: TimerState) -> TimerState {
    TimerState {
        mode: TimerMode::Focus,
        remaining_seconds: state.focus_duration_seconds,
        running: false,
        ..state
    }
}

/// Advance one second.
///
/// Reaching zero crosses the phase boundary in the same step: the mode
/// flips, the new phase's full duration is loaded, and the timer pauses.
pub fn tick(state: TimerState) -> TimerState {
    if !state.running || state.remaining_seconds == 0 {
        return state;
    }

    let remaining = state.remaining_seconds - 1;
    if remaining > 0 {
        return TimerState {
            remaining_seconds: remaining,
            ..state
        };
    }

    let mode = state.mode.flipped();
    debug!(from = state.mode.label(), to = mode.label(), "phase complete");
    TimerState {
        mode,
        remaining_seconds: state.duration_for(mode),
        running: false,
        ..state
    }
}

/// Change both phase lengths. Inputs below one minute are clamped up.
///
/// The current phase is rebased onto its new full length even while
/// running.
pub fn update_durations(state: TimerState, focus_minutes: u32, break_minutes: u32) -> TimerState {
    let next = TimerState {
        focus_duration_seconds: focus_minutes.max(1).saturating_mul(SECONDS_PER_MINUTE),
        break_duration_seconds: break_minutes.max(1).saturating_mul(SECONDS_PER_MINUTE),
        ..state
    };
    TimerState {
        remaining_seconds: next.duration_for(next.mode),
        ..next
    }
}

/// Format seconds as "MM:SS"
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
