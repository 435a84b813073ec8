use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradesense::config::Config;
use tradesense::services::SqliteStore;
use tradesense::tui::{self, LogBuffer, LogMakeWriter};
use tradesense::{app_router, AppState};

const LOG_BUFFER_LINES: usize = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env());

    // Initialize tracing; in TUI mode logs go to the Logs view instead of stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tradesense=debug,tower_http=debug".into());
    let log_buffer = Arc::new(LogBuffer::new(LOG_BUFFER_LINES));
    if config.tui_enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(LogMakeWriter::new(log_buffer.clone())),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!("Starting TradeSense on {}", config.bind_address());

    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    info!("Opened store at {}", config.database_path);

    let state = AppState::new(config.clone(), store)?;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let tasks = state.start_background_tasks(&shutdown_tx);

    // Load saved API keys and initialize the bot
    state.app.init().await;

    let app = app_router(state.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("TradeSense listening on {}", config.bind_address());

    if config.tui_enabled {
        let mut server_shutdown = shutdown_tx.subscribe();
        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.recv().await;
                })
                .await;
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        });

        tui::run_tui(state.clone(), log_buffer).await?;

        let _ = shutdown_tx.send(());
        let _ = server.await;
    } else {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;
        let _ = shutdown_tx.send(());
    }

    state.bot.stop();
    for task in tasks {
        let _ = task.await;
    }

    info!("TradeSense stopped");
    Ok(())
}
