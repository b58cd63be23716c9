use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod extractors;
mod function;
mod middleware;
mod routes;
mod state;

use config::Config;
use function::{FunctionDispatcher, InvocationEvent};
use routes::create_router;
use state::AppState;

#[derive(Parser)]
#[command(name = "narrative-server")]
#[command(about = "Narrative backend: X login, post fetch and checkout", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Handle one serverless invocation envelope and print the response envelope
    Invoke {
        /// Path to the JSON event, or `-` for stdin
        #[arg(long)]
        event: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for invocation output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrative_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Invoke { event } => invoke(config, &event).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let bind_address = config.bind_address;
    tracing::info!("Starting narrative server on {}", bind_address);

    // Initialize application state
    let state = Arc::new(AppState::new(config).await?);

    // Build router
    let app = create_router(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.pool.close();
    tracing::info!("Server stopped");
    Ok(())
}

async fn invoke(config: Config, source: &str) -> Result<()> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {}", source))?
    };

    let event: InvocationEvent =
        serde_json::from_str(&raw).context("Event is not a valid invocation envelope")?;

    let state = Arc::new(AppState::new(config).await?);
    let dispatcher = FunctionDispatcher::new(state.clone());
    let response = dispatcher.handle(event).await;
    state.pool.close();

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Graceful shutdown initiated");
}
