//! Faultline demo
//!
//! Runs a small HTTP or gRPC service behind the chaos middleware.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use chaos_config::{AppSettings, DEFAULT_LOG_FILTER, init_tracing};
use chaos_core::ChaosPolicy;
use chaos_demo::{ShutdownOutcome, create_router, run_with_grace, serve_grpc, shutdown_signal};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Faultline demo servers
#[derive(Debug, Parser)]
#[command(name = "faultline-demo")]
#[command(author, version, about = "Chaos injection demo servers", long_about = None)]
struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "FAULTLINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve `GET /ping` over HTTP
    Http {
        /// Port to listen on (overrides server.http_port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve the gRPC health service
    Grpc {
        /// Port to listen on (overrides server.grpc_port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings =
        AppSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_tracing(DEFAULT_LOG_FILTER, settings.server.log_format)?;

    let policy = settings.policy()?;
    log_policy(&policy);

    match cli.command {
        Commands::Http { port } => {
            run_http(&settings, policy, port.unwrap_or(settings.server.http_port)).await
        },
        Commands::Grpc { port } => {
            run_grpc(&settings, policy, port.unwrap_or(settings.server.grpc_port)).await
        },
    }
}

fn log_policy(policy: &ChaosPolicy) {
    info!(
        enabled = policy.enabled,
        trigger = policy.trigger().unwrap_or("<none>"),
        latency = ?policy.latency,
        failure_rate = policy.failure_rate,
        "Chaos policy loaded"
    );
}

async fn run_http(settings: &AppSettings, policy: ChaosPolicy, port: u16) -> anyhow::Result<()> {
    let trigger = policy.trigger().map(str::to_owned);
    let app = create_router(policy, settings.server.request_timeout());

    let addr = format!("{}:{}", settings.server.host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 HTTP demo listening on http://{}", addr);
    match trigger {
        Some(key) => info!("Try: curl -i -H '{key}: 1' http://{addr}/ping"),
        None => info!("Try: curl -i http://{addr}/ping"),
    }

    let outcome = run_with_grace(
        shutdown_signal(),
        settings.server.shutdown_timeout(),
        move |shutdown| async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
        },
    )
    .await?;

    log_stopped("HTTP", outcome);
    Ok(())
}

async fn run_grpc(settings: &AppSettings, policy: ChaosPolicy, port: u16) -> anyhow::Result<()> {
    let trigger = policy.trigger().map(str::to_owned);
    let addr: SocketAddr = format!("{}:{}", settings.server.host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", settings.server.host, port))?;

    info!("🚀 gRPC demo listening on {}", addr);
    match trigger {
        Some(key) => info!(
            "Try: grpcurl -plaintext -H '{key}: 1' {addr} grpc.health.v1.Health/Check"
        ),
        None => info!("Try: grpcurl -plaintext {addr} grpc.health.v1.Health/Check"),
    }

    let outcome = run_with_grace(
        shutdown_signal(),
        settings.server.shutdown_timeout(),
        move |shutdown| serve_grpc(addr, policy, shutdown),
    )
    .await?;

    log_stopped("gRPC", outcome);
    Ok(())
}

fn log_stopped(server: &str, outcome: ShutdownOutcome) {
    match outcome {
        ShutdownOutcome::Forced => warn!(server, "Demo stopped with requests still in flight"),
        ShutdownOutcome::Drained | ShutdownOutcome::Exited => info!("👋 {server} demo stopped"),
    }
}
