use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use snapmail::{create_router, AppState, MailTransport, RelayConfig, RelayVariant, SmtpMailer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "snapmail", about = "Capture-to-email relay services", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the photo relay (JSON /send-email)
    Photo,
    /// Serve the video relay (JSON /send-video)
    Video,
    /// Serve the multipart gateway (/api/send-email)
    Gateway,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let variant = match cli.command {
        Command::Photo => RelayVariant::Photo,
        Command::Video => RelayVariant::Video,
        Command::Gateway => RelayVariant::Gateway,
    };

    // Incomplete configuration aborts here, before anything binds
    let config = RelayConfig::from_env(variant)?;

    let mailer = Arc::new(SmtpMailer::from_config(&config)?);
    info!("Mail transport ready: {}", mailer.name());

    let state = AppState::new(config.clone(), mailer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        "{} running in {} mode on http://{}",
        config.service_name(),
        config.run_mode,
        addr
    );
    info!("Available endpoints:");
    match variant {
        RelayVariant::Photo => info!("  - POST http://{addr}/send-email"),
        RelayVariant::Video => info!("  - POST http://{addr}/send-video"),
        RelayVariant::Gateway => info!("  - POST http://{addr}/api/send-email"),
    }
    info!("  - GET  http://{addr}/health");

    axum::serve(listener, create_router(state))
        .await
        .context("server error")?;

    Ok(())
}
