//! Per-card ticker background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::state::{CardState, RunState};

/// Background task that drives one card's 1-second tick.
///
/// The task parks on the card's run-state watch channel and only spins an
/// interval while the card is Running. Leaving Running — pause, reset, or a
/// countdown finishing inside `advance_tick` — stands the interval down, so
/// no tick can fire for a run segment that already ended. Wall-clock
/// driven, not guaranteed drift-free.
pub async fn card_ticker_task(card: Arc<CardState>) {
    info!("[{}] ticker task started", card.label);

    let mut run_rx = card.subscribe_run_state();

    loop {
        // Park until the card enters Running
        if run_rx
            .wait_for(|state| *state == RunState::Running)
            .await
            .is_err()
        {
            // Card dropped, nothing left to tick
            return;
        }

        debug!("[{}] ticking", card.label);
        let period = Duration::from_secs(1);
        let mut interval = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if !card.advance_tick() {
                        debug!("[{}] run segment ended, ticker standing down", card.label);
                        break;
                    }
                }
                changed = run_rx.changed() => {
                    match changed {
                        Ok(()) => {
                            if *run_rx.borrow_and_update() != RunState::Running {
                                debug!("[{}] cancelled, ticker standing down", card.label);
                                break;
                            }
                            // A wake that lands back on Running keeps the schedule
                        }
                        Err(_) => return,
                    }
                }
            }
        }
    }
}
