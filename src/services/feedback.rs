//! Toast and alarm feedback service
//!
//! Cards never render anything themselves; they hand user feedback to a
//! shared `Feedback` collaborator injected at construction. The production
//! implementation logs through tracing and keeps just enough state for the
//! status endpoint: the last toast shown (last shown wins, a toast from one
//! card never suppresses a later one from another) and a count of alarms.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A transient notification with its display duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub card: String,
    pub message: String,
    pub duration_ms: u64,
    pub shown_at: DateTime<Utc>,
}

/// Feedback sink shared by all cards. Implementations must tolerate
/// interleaved calls from independent cards.
pub trait Feedback: Send + Sync {
    /// Show a transient notification for the given card
    fn toast(&self, card: &str, message: &str, duration: Duration);

    /// Sound the audible alarm for the given card
    fn alarm(&self, card: &str);
}

/// Production feedback service backed by tracing
pub struct SharedFeedback {
    last_toast: Mutex<Option<Toast>>,
    alarms_sounded: AtomicU64,
}

impl SharedFeedback {
    pub fn new() -> Self {
        Self {
            last_toast: Mutex::new(None),
            alarms_sounded: AtomicU64::new(0),
        }
    }

    /// The most recently shown toast, from any card
    pub fn last_toast(&self) -> Option<Toast> {
        self.last_toast.lock().ok().and_then(|t| t.clone())
    }

    /// Total alarms sounded since startup
    pub fn alarms_sounded(&self) -> u64 {
        self.alarms_sounded.load(Ordering::Relaxed)
    }
}

impl Feedback for SharedFeedback {
    fn toast(&self, card: &str, message: &str, duration: Duration) {
        info!("[{}] toast: {} ({}ms)", card, message, duration.as_millis());

        match self.last_toast.lock() {
            Ok(mut last) => {
                *last = Some(Toast {
                    card: card.to_string(),
                    message: message.to_string(),
                    duration_ms: duration.as_millis() as u64,
                    shown_at: Utc::now(),
                });
            }
            Err(e) => warn!("Failed to record toast: {}", e),
        }
    }

    fn alarm(&self, card: &str) {
        info!("[{}] alarm sounding", card);
        self.alarms_sounded.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for SharedFeedback {
    fn default() -> Self {
        Self::new()
    }
}

/// Test double that records every call for assertion
#[cfg(test)]
#[derive(Default)]
pub struct RecordingFeedback {
    pub toasts: Mutex<Vec<(String, String, u64)>>,
    pub alarms: Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingFeedback {
    pub fn toast_messages(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message, _)| message.clone())
            .collect()
    }

    pub fn alarm_count(&self) -> usize {
        self.alarms.lock().unwrap().len()
    }
}

#[cfg(test)]
impl Feedback for RecordingFeedback {
    fn toast(&self, card: &str, message: &str, duration: Duration) {
        self.toasts.lock().unwrap().push((
            card.to_string(),
            message.to_string(),
            duration.as_millis() as u64,
        ));
    }

    fn alarm(&self, card: &str) {
        self.alarms.lock().unwrap().push(card.to_string());
    }
}
