//! switchboardd — the switchboard dashboard daemon.
//!
//! Polls the proxy API for backend health and serves the dashboard.
//!
//! # Usage
//!
//! ```text
//! switchboardd serve --config switchboard.toml --upstream 10.0.0.5:9200 --static-dir static
//! switchboardd render --config switchboard.toml --out static/index.html
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};

use switchboard_core::{ConfigOverrides, DashboardConfig};

#[derive(Parser)]
#[command(name = "switchboardd", about = "Switchboard dashboard daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the proxy API and serve the dashboard.
    Serve {
        /// Path to switchboard.toml. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Address to listen on.
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Proxy API address (host:port).
        #[arg(long)]
        upstream: Option<String>,

        /// Milliseconds between polls.
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Directory of static UI files (stylesheets, logo).
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Write the first-paint document without starting the poller.
    Render {
        /// Path to switchboard.toml. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,switchboardd=debug,switchboard_monitor=debug,switchboard_dashboard=debug",
                )
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            listen,
            upstream,
            poll_interval_ms,
            static_dir,
        } => {
            let config = load_config(config.as_deref())?.with_overrides(ConfigOverrides {
                listen,
                upstream,
                poll_interval_ms,
                static_dir,
            })?;
            info!(
                listen = %config.listen,
                upstream = %config.upstream.address,
                poll_interval_ms = config.poll_interval_ms,
                "switchboard dashboard starting"
            );
            switchboardd::run(config, shutdown_signal()).await
        }
        Command::Render { config, out } => {
            let config = load_config(config.as_deref())?;
            match out {
                Some(path) => switchboardd::render_to(&config, &path)?,
                None => println!("{}", switchboard_dashboard::pages::render_document(&config)?),
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    match path {
        Some(path) => {
            let config = DashboardConfig::from_file(path)?;
            info!(path = ?path, "config loaded");
            Ok(config)
        }
        None => Ok(DashboardConfig::default()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
