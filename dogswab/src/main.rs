use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dogswab::api::{create_router, AppState};
use dogswab::config::Config;
use dogswab::engine::ReminderEngine;
use dogswab::notify::{InAppChannel, LogChannel, NotificationDispatcher};
use dogswab::persistence::JsonFileRepository;

#[derive(Parser)]
#[command(name = "dogswab")]
#[command(about = "Pet health reminder and care recommendation engine")]
struct Args {
    /// Skip restoring persisted reminders on startup
    #[arg(long)]
    no_restore: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dogswab=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(LogChannel),
        Arc::new(InAppChannel::new()),
    ));

    let engine = match &config.persistence.path {
        Some(path) => {
            tracing::info!(path, "using JSON reminder snapshot");
            ReminderEngine::with_repository(
                dispatcher,
                Arc::new(JsonFileRepository::new(path.clone())),
            )
        }
        None => {
            tracing::warn!(
                "REMINDER_STORE_PATH is not set, reminders will not survive a restart"
            );
            ReminderEngine::new(dispatcher)
        }
    };

    if args.no_restore {
        tracing::info!("skipping reminder restore (--no-restore)");
    } else {
        let restored = engine.restore()?;
        tracing::info!(restored, "reminder restore complete");
    }

    // Negotiate notification permission once at startup, like the app shell
    // would on install.
    let granted = engine.request_notification_permission();
    if !granted {
        tracing::warn!("notification permission denied - using in-app fallback only");
    }

    let engine = Arc::new(engine);
    let state = AppState::new(config.clone(), engine.clone());

    let cancel_token = CancellationToken::new();

    tracing::info!(
        interval_secs = config.reminders.sweep_interval_secs,
        "starting overdue reminder sweep..."
    );
    let sweep_engine = engine.clone();
    let sweep_interval = config.reminders.sweep_interval_secs;
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("reminder sweep shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(sweep_interval)) => {
                    let fired = sweep_engine.run_sweep();
                    if fired > 0 {
                        tracing::info!(fired, "sweep fired overdue reminders");
                    }
                }
            }
        }
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Dogswab engine starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
