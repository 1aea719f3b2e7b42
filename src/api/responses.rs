//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use crate::ring::RingGeometry;
use crate::services::feedback::Toast;
use crate::state::timer::{ControlFlags, LapRecord, Mode, RunState, TimerController};
use crate::utils::duration::format_mm_ss;

/// One lap as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapView {
    pub index: u32,
    pub total: String,
    pub total_seconds: u64,
    pub diff_seconds: u64,
}

impl From<LapRecord> for LapView {
    fn from(lap: LapRecord) -> Self {
        Self {
            index: lap.index,
            total: format_mm_ss(lap.total),
            total_seconds: lap.total,
            diff_seconds: lap.diff,
        }
    }
}

/// Full observable state of one card: everything a presentation layer
/// needs to render it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub card: String,
    pub mode: Mode,
    pub run_state: RunState,
    pub status: String,
    pub display: String,
    pub seconds: u64,
    pub target: String,
    pub target_seconds: u64,
    pub progress_fraction: f64,
    pub ring_radius: f64,
    pub ring_circumference: f64,
    pub stroke_offset: f64,
    pub controls: ControlFlags,
    /// Newest-first, the display order
    pub laps: Vec<LapView>,
}

impl CardSnapshot {
    /// Capture the card's observable state. Ring values are recomputed
    /// here, so every snapshot reflects the latest counter mutation.
    pub fn capture(controller: &TimerController, ring: &RingGeometry) -> Self {
        let fraction = controller.progress_fraction();
        Self {
            card: controller.label().to_string(),
            mode: controller.mode(),
            run_state: controller.run_state(),
            status: controller.status_text().to_string(),
            display: controller.display(),
            seconds: controller.seconds(),
            target: controller.target_display(),
            target_seconds: controller.target_seconds(),
            progress_fraction: fraction,
            ring_radius: ring.radius(),
            ring_circumference: ring.circumference(),
            stroke_offset: ring.stroke_offset(fraction),
            controls: controller.controls(),
            laps: controller.laps().iter().rev().copied().map(LapView::from).collect(),
        }
    }
}

/// API response structure for card command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub card: CardSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, card: CardSnapshot) -> Self {
        Self {
            status,
            message,
            error: None,
            timestamp: Utc::now(),
            card,
        }
    }

    /// Command applied
    pub fn ok(message: impl Into<String>, card: CardSnapshot) -> Self {
        Self::new("ok".to_string(), message.into(), card)
    }

    /// Command was a silent no-op in the current state
    pub fn ignored(message: impl Into<String>, card: CardSnapshot) -> Self {
        Self::new("ignored".to_string(), message.into(), card)
    }

    /// Command rejected by validation; the snapshot is unchanged so the
    /// client can revert its controls
    pub fn rejected(error: &TimerError, card: CardSnapshot) -> Self {
        let mut response = Self::new("rejected".to_string(), error.to_string(), card);
        response.error = Some(error.kind().to_string());
        response
    }
}

/// Aggregate status response with all card snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub cards: Vec<CardSnapshot>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    pub last_toast: Option<Toast>,
    pub alarms_sounded: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.0.0".to_string(),
        }
    }
}
