//! Timer card state machine
//!
//! `TimerController` is the core of a card: a pure, synchronous state
//! machine over a one-second counter. It knows nothing about HTTP or the
//! tick schedule; the ticker task calls `tick()` once per second while the
//! card is Running, and the API layer calls the command methods. All user
//! feedback goes through the injected `Feedback` collaborator so the
//! controller stays fully testable on its own.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TimerError;
use crate::services::feedback::Feedback;
use crate::utils::duration::{format_mm_ss, parse_mm_ss};

/// Default countdown target when none is configured (10 minutes)
pub const DEFAULT_TARGET_SECONDS: u64 = 600;

/// Display duration for transition toasts
const TOAST: Duration = Duration::from_millis(2000);
/// Display duration for the time's-up toast
const FINISH_TOAST: Duration = Duration::from_millis(3000);

/// Counting direction of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Stopwatch: counter holds elapsed seconds
    CountUp,
    /// Countdown: counter holds remaining seconds
    CountDown,
}

/// Run state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero while running
    Finished,
}

/// One recorded lap. Immutable once created.
///
/// `total` is the cumulative elapsed basis at lap time, `diff` the delta to
/// the previous lap (or to the basis at the last clear/reset). Bases are
/// monotonically non-decreasing in both modes, so the saturating delta is a
/// defensive floor, not a load-bearing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LapRecord {
    pub index: u32,
    pub total: u64,
    pub diff: u64,
}

/// Enable flags for the four primary card controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    pub start: bool,
    pub pause: bool,
    pub lap: bool,
    pub reset: bool,
}

/// State machine for one timer card
pub struct TimerController {
    label: String,
    mode: Mode,
    target_seconds: u64,
    /// Elapsed seconds in count-up mode, remaining seconds in countdown
    counter: u64,
    run_state: RunState,
    /// Lap storage in recording order; rendering reverses it
    laps: Vec<LapRecord>,
    last_lap_basis: u64,
    feedback: Arc<dyn Feedback>,
}

impl TimerController {
    /// Create an idle count-up card with the given countdown target
    pub fn new(label: impl Into<String>, target_seconds: u64, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            label: label.into(),
            mode: Mode::CountUp,
            target_seconds,
            counter: 0,
            run_state: RunState::Idle,
            laps: Vec::new(),
            last_lap_basis: 0,
            feedback,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn target_seconds(&self) -> u64 {
        self.target_seconds
    }

    /// Current counter value: elapsed (count-up) or remaining (countdown)
    pub fn seconds(&self) -> u64 {
        self.counter
    }

    /// Laps in recording order, oldest first
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    /// Counter formatted as `MM:SS`
    pub fn display(&self) -> String {
        format_mm_ss(self.counter)
    }

    /// Target formatted as `MM:SS`
    pub fn target_display(&self) -> String {
        format_mm_ss(self.target_seconds)
    }

    pub fn status_text(&self) -> &'static str {
        match self.run_state {
            RunState::Idle => "Ready",
            RunState::Running => "Running",
            RunState::Paused => "Paused",
            RunState::Finished => "Time's up!",
        }
    }

    pub fn controls(&self) -> ControlFlags {
        let running = self.run_state == RunState::Running;
        ControlFlags {
            start: !running,
            pause: running,
            lap: running,
            reset: true,
        }
    }

    /// Elapsed seconds since the counting basis started: the raw counter in
    /// count-up mode, target minus remaining in countdown
    pub fn elapsed_basis(&self) -> u64 {
        match self.mode {
            Mode::CountUp => self.counter,
            Mode::CountDown => self.target_seconds.saturating_sub(self.counter),
        }
    }

    /// Fraction of the progress ring to fill.
    ///
    /// Countdown with a target fills as the target is consumed; count-up
    /// (and a zero-target countdown) wraps one full ring per minute.
    pub fn progress_fraction(&self) -> f64 {
        match self.mode {
            Mode::CountDown if self.target_seconds > 0 => {
                let consumed = self.target_seconds.saturating_sub(self.counter);
                (consumed as f64 / self.target_seconds as f64).clamp(0.0, 1.0)
            }
            _ => (self.elapsed_basis() % 60) as f64 / 60.0,
        }
    }

    /// Start or resume counting.
    ///
    /// Allowed from Idle, Paused, and Finished. A countdown with nothing
    /// left to count is rejected with `NotReady`. Returns `Ok(false)` if
    /// the card was already running.
    pub fn start(&mut self) -> Result<bool, TimerError> {
        if self.run_state == RunState::Running {
            return Ok(false);
        }
        if self.mode == Mode::CountDown && self.counter == 0 {
            return Err(self.report(TimerError::NotReady));
        }

        debug!("[{}] {:?} -> Running", self.label, self.run_state);
        self.run_state = RunState::Running;
        self.feedback.toast(&self.label, "Timer started", TOAST);
        Ok(true)
    }

    /// Advance the counter by one second. Only meaningful while Running;
    /// a stale call in any other state is a no-op.
    ///
    /// A countdown that reaches zero transitions to Finished within this
    /// same call and fires the alarm, never on a later cycle.
    pub fn tick(&mut self) -> RunState {
        if self.run_state != RunState::Running {
            return self.run_state;
        }

        match self.mode {
            Mode::CountUp => self.counter += 1,
            Mode::CountDown => {
                if self.counter > 0 {
                    self.counter -= 1;
                    if self.counter == 0 {
                        debug!("[{}] countdown finished", self.label);
                        self.run_state = RunState::Finished;
                        self.feedback.alarm(&self.label);
                        self.feedback.toast(&self.label, "Time's up!", FINISH_TOAST);
                    }
                }
            }
        }
        self.run_state
    }

    /// Pause a running card. Silently ignored in any other state; returns
    /// whether the card actually paused.
    pub fn pause(&mut self) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }

        debug!("[{}] Running -> Paused", self.label);
        self.run_state = RunState::Paused;
        self.feedback.toast(&self.label, "Timer paused", TOAST);
        true
    }

    /// Reset to the mode-appropriate baseline from any state: zero for
    /// count-up, the target for countdown. Clears the lap log and returns
    /// the card to Idle.
    pub fn reset(&mut self) {
        debug!("[{}] {:?} -> Idle (reset)", self.label, self.run_state);
        self.counter = match self.mode {
            Mode::CountUp => 0,
            Mode::CountDown => self.target_seconds,
        };
        self.run_state = RunState::Idle;
        self.laps.clear();
        self.last_lap_basis = 0;
        self.feedback.toast(&self.label, "Timer reset", TOAST);
    }

    /// Switch counting direction. Rejected while Running so the client can
    /// revert its selector. Otherwise reinitializes the counter, clears a
    /// Finished state, and re-zeroes the lap basis (the lap log itself
    /// survives until a reset or explicit clear).
    pub fn change_mode(&mut self, mode: Mode) -> Result<(), TimerError> {
        if self.run_state == RunState::Running {
            return Err(self.report(TimerError::ModeChangeRejected));
        }

        debug!("[{}] mode {:?} -> {:?}", self.label, self.mode, mode);
        self.mode = mode;
        self.counter = match mode {
            Mode::CountUp => 0,
            Mode::CountDown => self.target_seconds,
        };
        // A paused or finished counter is meaningless after reinitialization
        self.run_state = RunState::Idle;
        self.last_lap_basis = 0;
        Ok(())
    }

    /// Parse and apply a new `mm:ss` countdown target.
    ///
    /// In countdown mode the counter is reloaded with the new target and a
    /// Finished card becomes Idle again. A Running countdown keeps running
    /// against the reloaded counter: observed behavior of the original
    /// widget, kept intentionally (see DESIGN.md).
    pub fn apply_target(&mut self, text: &str) -> Result<u64, TimerError> {
        let seconds = parse_mm_ss(text).map_err(|e| self.report(e))?;

        debug!("[{}] target {} -> {}", self.label, self.target_seconds, seconds);
        self.target_seconds = seconds;
        if self.mode == Mode::CountDown {
            self.counter = seconds;
            if self.run_state == RunState::Finished {
                self.run_state = RunState::Idle;
            }
        }
        Ok(seconds)
    }

    /// Record a lap at the current elapsed basis. No-op unless Running.
    pub fn add_lap(&mut self) -> Option<LapRecord> {
        if self.run_state != RunState::Running {
            return None;
        }

        let total = self.elapsed_basis();
        let record = LapRecord {
            index: self.laps.len() as u32 + 1,
            total,
            diff: total.saturating_sub(self.last_lap_basis),
        };
        self.laps.push(record);
        self.last_lap_basis = total;
        debug!("[{}] lap {} at {}s", self.label, record.index, record.total);
        Some(record)
    }

    /// Empty the lap log and re-base deltas to the current basis, so the
    /// next lap reports its delta from now rather than from session start.
    pub fn clear_laps(&mut self) {
        self.laps.clear();
        self.last_lap_basis = self.elapsed_basis();
    }

    /// Toast a validation error and hand it back for the API response
    fn report(&self, error: TimerError) -> TimerError {
        self.feedback.toast(&self.label, &error.to_string(), TOAST);
        error
    }
}
