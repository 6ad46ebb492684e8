use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use weight_tracker::config::{resolve_port, resolve_reconcile_interval};
use weight_tracker::dates::today;
use weight_tracker::ticker::spawn_reconcile_loop;
use weight_tracker::{load_data, persist_data, resolve_data_path, router, AppState, Program};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let program = Program::default();
    let data = load_data(&data_path, &program, today()).await;
    info!(records = data.records.len(), path = %data_path.display(), "log loaded");
    if let Err(err) = persist_data(&data_path, &data).await {
        warn!("initial save failed: {err}");
    }

    let state = AppState::new(data_path, program, data);
    spawn_reconcile_loop(state.clone(), resolve_reconcile_interval());

    let addr = SocketAddr::from(([0, 0, 0, 0], resolve_port()));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
