//! Study Clock - a study/break interval timer with persistent study-time tracking
//!
//! This is the main entry point for the study-clock application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use study_clock::{
    api::ApiContext,
    config::Config,
    create_router,
    services::{CommandPlayer, PlaybackControl},
    shutdown_signal,
    state::PhaseTimer,
    storage::FileCounterStore,
    tasks::display_task,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting study-clock v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, study={}min, break={}min, counter={}",
        config.host,
        config.port,
        config.study,
        config.break_minutes,
        config.counter_file.display()
    );

    // Wire up the collaborators
    let store = Arc::new(FileCounterStore::new(config.counter_file.clone()));
    let player = Arc::new(CommandPlayer::new(config.player.clone()));
    if let Some(audio) = config.audio.clone() {
        player.set_source(audio);
    }

    let playback: Arc<dyn PlaybackControl> = player;
    let timer = Arc::new(PhaseTimer::new(
        config.study,
        config.break_minutes,
        Arc::clone(&playback),
        store,
    ));

    // Start the display task, then publish the initial events it renders
    let display_timer = Arc::clone(&timer);
    tokio::spawn(async move {
        display_task(display_timer).await;
    });
    timer.publish_startup();

    // Create HTTP router with all endpoints
    let app = create_router(ApiContext {
        timer: Arc::clone(&timer),
        playback,
    });

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start           - Start or resume the timer");
    info!("  POST /pause           - Pause the timer and save the study total");
    info!("  POST /reset           - Reset to an idle study phase");
    info!("  POST /duration/:phase - Set the study or break duration");
    info!("  POST /audio           - Select the audio source");
    info!("  GET  /status          - Current phase, clock, and study total");
    info!("  GET  /health          - Health check");

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

    // Closing without an explicit pause must not lose the study total
    timer.persist_total();

    info!("Server shutdown complete");
    Ok(())
}
