//! ChatShield - Contact-information detection and masking engine
//!
//! Serves the moderation API over HTTP or runs one-off checks from the
//! command line.

use anyhow::Result;
use chatshield::{
    api,
    config::ShieldConfig,
    service::{types::DetectResponse, DetectionRequest, ModerationService},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chatshield")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Contact-information detection and masking engine for mediated chat")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CHATSHIELD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the moderation HTTP service
    Serve {
        /// Host to bind to (overrides configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a single message through the detector
    Check {
        /// Message text
        #[arg(short, long)]
        message: String,

        /// Sensitivity level (low, medium, high)
        #[arg(short, long)]
        sensitivity: Option<String>,

        /// User identifier for rate-limit bookkeeping
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chatshield={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = if let Some(config_path) = cli.config {
        let content = std::fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        ShieldConfig::default()
    };

    match cli.command {
        Commands::Serve { host, port } => {
            run_server(config, host, port).await?;
        }
        Commands::Check {
            message,
            sensitivity,
            user,
        } => {
            run_check(config, message, sensitivity, user).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(
    mut config: ShieldConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let origins = config.server.allowed_origins.clone();
    let service = Arc::new(ModerationService::new(config)?);
    let app = api::build_app(service, &origins);

    tracing::info!(%addr, "Starting ChatShield moderation service");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

async fn run_check(
    config: ShieldConfig,
    message: String,
    sensitivity: Option<String>,
    user: Option<String>,
) -> Result<()> {
    let sensitivity = match sensitivity {
        Some(s) => Some(s.parse().map_err(anyhow::Error::msg)?),
        None => None,
    };
    let service = ModerationService::new(config)?;
    let result = service
        .detect(DetectionRequest {
            text: message,
            user_id: user,
            sensitivity,
        })
        .await;
    println!(
        "{}",
        serde_json::to_string_pretty(&DetectResponse::from(result))?
    );
    Ok(())
}

fn show_config(config: Option<&ShieldConfig>) -> Result<()> {
    let rendered = match config {
        Some(config) => toml::to_string_pretty(config)?,
        None => toml::to_string_pretty(&ShieldConfig::default())?,
    };
    println!("{}", rendered);
    Ok(())
}
