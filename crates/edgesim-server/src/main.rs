//! Standalone dashboard server binary.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use edgesim_core::ClientConfig;
use edgesim_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(name = "edgesim-server", about = "edgesim dashboard server", version)]
struct Args {
    /// Algorithm service to forward API calls to
    #[arg(long, env = "EDGESIM_UPSTREAM", default_value = "http://127.0.0.1:5000")]
    upstream: String,
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind to
    #[arg(long, short, default_value_t = 8000)]
    port: u16,
    /// Upstream request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut upstream = ClientConfig::new(args.upstream);
    if let Some(secs) = args.timeout {
        upstream = upstream.with_timeout(Duration::from_secs(secs));
    }

    serve(ServerConfig {
        upstream,
        host: args.host,
        port: args.port,
    })
    .await
}
