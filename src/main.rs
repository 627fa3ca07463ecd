// Copyright 2026 Rankgate Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use rankgate::config::Config;
use rankgate::resolver::Resolver;
use rankgate::rest;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "rankgate",
    about = "HTTP gateway resolving game usernames to ranked tiers",
    version
)]
struct Cli {
    /// Listen port (overrides the PORT environment variable)
    #[arg(long, short)]
    port: Option<u16>,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "rankgate=debug" } else { "rankgate=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse()?),
        )
        .init();

    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!("starting rankgate v{}", env!("CARGO_PKG_VERSION"));
    info!(
        port = config.port,
        profile_api = %config.profile_api,
        rank_page = %config.rank_page,
        timeout_ms = config.timeout_ms,
        "configuration loaded"
    );

    let resolver = Arc::new(Resolver::new(&config));
    rest::start(config.port, resolver).await
}
