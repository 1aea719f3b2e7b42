//! Per-card runtime state
//!
//! Wraps a `TimerController` in the locking and notification plumbing the
//! async layers need: API handlers mutate the controller through
//! `with_controller`, and the card's ticker task follows run-state
//! transitions through a watch channel.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::error;

use crate::services::feedback::Feedback;
use crate::state::timer::{RunState, TimerController};

/// One timer card: the controller plus its run-state channel
pub struct CardState {
    pub id: usize,
    pub label: String,
    controller: Mutex<TimerController>,
    run_tx: watch::Sender<RunState>,
}

impl CardState {
    /// Create an idle card with the shared feedback service
    pub fn new(id: usize, target_seconds: u64, feedback: Arc<dyn Feedback>) -> Self {
        let label = format!("card-{}", id);
        let (run_tx, _) = watch::channel(RunState::Idle);
        Self {
            id,
            label: label.clone(),
            controller: Mutex::new(TimerController::new(label, target_seconds, feedback)),
            run_tx,
        }
    }

    /// Subscribe to run-state transitions. The ticker task parks on this
    /// channel and only spins its interval while the value is `Running`.
    pub fn subscribe_run_state(&self) -> watch::Receiver<RunState> {
        self.run_tx.subscribe()
    }

    /// Run an operation against the locked controller and publish the
    /// resulting run state before releasing the lock, so the ticker always
    /// observes transitions in lock order.
    pub fn with_controller<T, F>(&self, op: F) -> Result<T, String>
    where
        F: FnOnce(&mut TimerController) -> T,
    {
        let mut controller = self
            .controller
            .lock()
            .map_err(|e| format!("Failed to lock card controller: {}", e))?;

        let out = op(&mut *controller);
        self.publish_run_state(controller.run_state());
        Ok(out)
    }

    /// Advance the card by one tick. Returns false once the card is no
    /// longer Running so the ticker stands down. A tick that raced a
    /// pause/reset observes the new state under the same lock and leaves
    /// the counter untouched.
    pub fn advance_tick(&self) -> bool {
        match self.with_controller(|c| c.tick()) {
            Ok(state) => state == RunState::Running,
            Err(e) => {
                error!("[{}] tick failed: {}", self.label, e);
                false
            }
        }
    }

    fn publish_run_state(&self, state: RunState) {
        self.run_tx.send_if_modified(|current| {
            if *current != state {
                *current = state;
                true
            } else {
                false
            }
        });
    }
}
