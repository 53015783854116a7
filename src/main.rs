use anyhow::{anyhow, Context, Result};
use promtrack::api::{create_api_router, server_exit, spawn_server};
use promtrack::config::AppConfig;
use promtrack::metrics::Metrics;
use promtrack::sampler::spawn_task_sampler;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal promtrack error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration from environment")?;
    let listen = config.listen_addr().context("parse listen address")?;

    // Registration conflicts must stop the process before it serves anything
    let metrics = Arc::new(Metrics::new().context("register metrics")?);

    let sampler = spawn_task_sampler(Arc::clone(&metrics), config.sample_interval());
    info!(
        interval_secs = config.sample_interval().as_secs(),
        "live task sampler started"
    );

    let app = create_api_router(Arc::clone(&metrics));
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("bind HTTP listener {listen}"))?;

    info!(address = %listen, "promtrack HTTP server starting");
    let mut server = spawn_server(listener, app);

    let mut ticker = tokio::time::interval(Duration::from_secs(30));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                info!(
                    live_tasks = metrics.goroutine_count().get(),
                    "promtrack heartbeat"
                );
            }
            res = &mut server => {
                sampler.abort();
                return Err(server_exit(res).into());
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(err) = res {
                    warn!(error = %err, "ctrl_c listener error");
                }
                info!("Shutdown signal received, exiting");
                break;
            }
        }
    }

    sampler.abort();
    server.abort();
    Ok(())
}

fn init_tracing() -> Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
