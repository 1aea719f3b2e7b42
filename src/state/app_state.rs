//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};

use crate::ring::RingGeometry;
use crate::services::feedback::SharedFeedback;
use crate::state::CardState;

/// Application state: the deck of timer cards plus everything they share
pub struct AppState {
    /// Independent timer cards, ids starting at 1
    pub cards: Vec<Arc<CardState>>,
    /// Feedback service shared by every card
    pub feedback: Arc<SharedFeedback>,
    /// Progress-ring geometry shared by every card
    pub ring: RingGeometry,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the deck with `card_count` idle cards sharing one feedback
    /// service and one ring geometry
    pub fn new(
        host: String,
        port: u16,
        card_count: usize,
        target_seconds: u64,
        ring_radius: f64,
    ) -> Self {
        let feedback = Arc::new(SharedFeedback::new());
        let cards = (1..=card_count)
            .map(|id| Arc::new(CardState::new(id, target_seconds, feedback.clone() as _)))
            .collect();

        Self {
            cards,
            feedback,
            ring: RingGeometry::new(ring_radius),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Look up a card by its 1-based id
    pub fn card(&self, id: usize) -> Option<&Arc<CardState>> {
        id.checked_sub(1).and_then(|i| self.cards.get(i))
    }

    /// Record the last command for the status endpoint
    pub fn record_action(&self, card_label: &str, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(format!("{}:{}", card_label, action));
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
