//! Timer Deck - A state-managed HTTP server hosting independent timer cards
//!
//! This is the main entry point for the timer-deck application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use timer_deck::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::card_ticker_task,
    utils::{duration::parse_mm_ss, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_deck={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-deck server v1.0.0");
    info!(
        "Configuration: host={}, port={}, cards={}, target={}",
        config.host, config.port, config.cards, config.target
    );

    // Validate the default countdown target up front
    let target_seconds = match parse_mm_ss(&config.target) {
        Ok(seconds) => seconds,
        Err(e) => {
            tracing::error!("Invalid --target {:?}: {}", config.target, e);
            std::process::exit(1);
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(
        config.host.clone(),
        config.port,
        config.cards,
        target_seconds,
        config.radius,
    ));

    // Start one ticker background task per card
    for card in &state.cards {
        tokio::spawn(card_ticker_task(Arc::clone(card)));
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /cards/:id/start      - Start or resume a card");
    info!("  POST /cards/:id/pause      - Pause a running card");
    info!("  POST /cards/:id/lap        - Record a lap");
    info!("  POST /cards/:id/reset      - Reset to the mode baseline");
    info!("  POST /cards/:id/laps/clear - Clear the lap log");
    info!("  POST /cards/:id/mode       - Switch count-up/countdown");
    info!("  POST /cards/:id/target     - Set countdown target (mm:ss)");
    info!("  POST /cards/:id/key        - Keyboard shortcut dispatch");
    info!("  GET  /cards/:id            - Card snapshot");
    info!("  GET  /status               - All cards and server status");
    info!("  GET  /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
