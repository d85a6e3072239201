//! HTTP server for the contact form.
//!
//! Reads mail settings from the environment (see `contact_relay::config`)
//! and serves `POST /api/contact`.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use contact_relay::{routes, ContactPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "contact-relay", version, about = "Contact form intake server")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "CONTACT_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Skip the mail server check at startup
    #[arg(long)]
    skip_verify: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let pipeline = ContactPipeline::from_env();

    if !args.skip_verify {
        match pipeline.dispatcher().verify().await {
            Ok(()) => tracing::info!(
                provider = pipeline.dispatcher().provider_name(),
                "Mail transport reachable"
            ),
            Err(err) => tracing::warn!(
                category = %err.category,
                detail = %err.detail,
                "Mail transport check failed, submissions will report delivery errors"
            ),
        }
    }

    let app = routes::router(Arc::new(pipeline));
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(addr = %args.bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
