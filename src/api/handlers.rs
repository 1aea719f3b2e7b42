//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::responses::{ApiResponse, CardSnapshot, HealthResponse, StatusResponse};
use crate::error::TimerError;
use crate::state::{AppState, CardCommand, CardState, Mode, RunState};

/// Request body for POST /cards/:card_id/mode
#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

/// Request body for POST /cards/:card_id/target
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub target: String,
}

/// Request body for POST /cards/:card_id/key
#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

fn lookup_card(state: &AppState, card_id: usize) -> Result<Arc<CardState>, StatusCode> {
    match state.card(card_id) {
        Some(card) => Ok(card.clone()),
        None => {
            warn!("Unknown card id: {}", card_id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

fn lock_failure(e: String) -> StatusCode {
    error!("{}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle POST /cards/:card_id/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let (verdict, snapshot) = card
        .with_controller(|c| (c.start(), CardSnapshot::capture(c, &state.ring)))
        .map_err(lock_failure)?;
    state.record_action(&card.label, "start");

    Ok(Json(match verdict {
        Ok(true) => {
            info!("[{}] start command applied", card.label);
            ApiResponse::ok("Timer started", snapshot)
        }
        Ok(false) => ApiResponse::ignored("Timer already running", snapshot),
        Err(e) => ApiResponse::rejected(&e, snapshot),
    }))
}

/// Handle POST /cards/:card_id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let (paused, snapshot) = card
        .with_controller(|c| (c.pause(), CardSnapshot::capture(c, &state.ring)))
        .map_err(lock_failure)?;
    state.record_action(&card.label, "pause");

    Ok(Json(if paused {
        info!("[{}] pause command applied", card.label);
        ApiResponse::ok("Timer paused", snapshot)
    } else {
        ApiResponse::ignored("Pause ignored, timer not running", snapshot)
    }))
}

/// Handle POST /cards/:card_id/lap
pub async fn lap_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let (lap, snapshot) = card
        .with_controller(|c| (c.add_lap(), CardSnapshot::capture(c, &state.ring)))
        .map_err(lock_failure)?;
    state.record_action(&card.label, "lap");

    Ok(Json(match lap {
        Some(lap) => {
            info!("[{}] lap {} recorded at {}s", card.label, lap.index, lap.total);
            ApiResponse::ok(format!("Lap {} recorded", lap.index), snapshot)
        }
        None => ApiResponse::ignored("Lap ignored, timer not running", snapshot),
    }))
}

/// Handle POST /cards/:card_id/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let snapshot = card
        .with_controller(|c| {
            c.reset();
            CardSnapshot::capture(c, &state.ring)
        })
        .map_err(lock_failure)?;
    state.record_action(&card.label, "reset");

    info!("[{}] reset command applied", card.label);
    Ok(Json(ApiResponse::ok("Timer reset", snapshot)))
}

/// Handle POST /cards/:card_id/laps/clear
pub async fn clear_laps_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let snapshot = card
        .with_controller(|c| {
            c.clear_laps();
            CardSnapshot::capture(c, &state.ring)
        })
        .map_err(lock_failure)?;
    state.record_action(&card.label, "clear-laps");

    Ok(Json(ApiResponse::ok("Laps cleared", snapshot)))
}

/// Handle POST /cards/:card_id/mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let (verdict, snapshot) = card
        .with_controller(|c| (c.change_mode(request.mode), CardSnapshot::capture(c, &state.ring)))
        .map_err(lock_failure)?;
    state.record_action(&card.label, "mode");

    Ok(Json(match verdict {
        Ok(()) => {
            info!("[{}] mode set to {:?}", card.label, request.mode);
            let message = match request.mode {
                Mode::CountUp => "Mode set to count-up",
                Mode::CountDown => "Mode set to countdown",
            };
            ApiResponse::ok(message, snapshot)
        }
        // Snapshot still shows the old mode so the client can revert
        Err(e) => ApiResponse::rejected(&e, snapshot),
    }))
}

/// Handle POST /cards/:card_id/target
pub async fn target_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
    Json(request): Json<TargetRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let (verdict, snapshot) = card
        .with_controller(|c| (c.apply_target(&request.target), CardSnapshot::capture(c, &state.ring)))
        .map_err(lock_failure)?;
    state.record_action(&card.label, "target");

    Ok(Json(match verdict {
        Ok(_) => {
            info!("[{}] target set to {}", card.label, snapshot.target);
            ApiResponse::ok(format!("Target set to {}", snapshot.target), snapshot)
        }
        Err(e) => ApiResponse::rejected(&e, snapshot),
    }))
}

enum KeyOutcome {
    Applied(String),
    Ignored(&'static str),
    Rejected(TimerError),
}

/// Handle POST /cards/:card_id/key - keyboard shortcut layer
pub async fn key_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
    Json(request): Json<KeyRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let card = lookup_card(&state, card_id)?;

    let mut chars = request.key.chars();
    let command = match (chars.next(), chars.next()) {
        (Some(key), None) => CardCommand::from_key(key),
        _ => None,
    };

    let Some(command) = command else {
        let snapshot = card
            .with_controller(|c| CardSnapshot::capture(c, &state.ring))
            .map_err(lock_failure)?;
        return Ok(Json(ApiResponse::ignored("Key not mapped", snapshot)));
    };

    let (outcome, snapshot) = card
        .with_controller(|c| {
            let outcome = match command {
                CardCommand::StartOrPause => {
                    if c.run_state() == RunState::Running {
                        c.pause();
                        KeyOutcome::Applied("Timer paused".to_string())
                    } else {
                        match c.start() {
                            Ok(_) => KeyOutcome::Applied("Timer started".to_string()),
                            Err(e) => KeyOutcome::Rejected(e),
                        }
                    }
                }
                CardCommand::Reset => {
                    c.reset();
                    KeyOutcome::Applied("Timer reset".to_string())
                }
                CardCommand::Lap => match c.add_lap() {
                    Some(lap) => KeyOutcome::Applied(format!("Lap {} recorded", lap.index)),
                    None => KeyOutcome::Ignored("Lap ignored, timer not running"),
                },
            };
            (outcome, CardSnapshot::capture(c, &state.ring))
        })
        .map_err(lock_failure)?;
    state.record_action(&card.label, "key");

    Ok(Json(match outcome {
        KeyOutcome::Applied(message) => {
            info!("[{}] key {:?} applied", card.label, request.key);
            ApiResponse::ok(message, snapshot)
        }
        KeyOutcome::Ignored(message) => ApiResponse::ignored(message, snapshot),
        KeyOutcome::Rejected(e) => ApiResponse::rejected(&e, snapshot),
    }))
}

/// Handle GET /cards/:card_id - snapshot only
pub async fn snapshot_handler(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<usize>,
) -> Result<Json<CardSnapshot>, StatusCode> {
    let card = lookup_card(&state, card_id)?;
    let snapshot = card
        .with_controller(|c| CardSnapshot::capture(c, &state.ring))
        .map_err(lock_failure)?;
    Ok(Json(snapshot))
}

/// Handle GET /status - all cards plus server and feedback state
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let mut cards = Vec::with_capacity(state.cards.len());
    for card in &state.cards {
        let snapshot = card
            .with_controller(|c| CardSnapshot::capture(c, &state.ring))
            .map_err(lock_failure)?;
        cards.push(snapshot);
    }

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        cards,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
        last_toast: state.feedback.last_toast(),
        alarms_sounded: state.feedback.alarms_sounded(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
