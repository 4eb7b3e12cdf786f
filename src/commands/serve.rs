use crate::db::tasks::Tasks;
use crate::libs::config::Config;
use crate::web::{create_router, AppState};
use anyhow::Result;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// TCP port to bind (overrides configuration)
    #[arg(long)]
    port: Option<u16>,
    /// Database file path (overrides configuration)
    #[arg(long)]
    db_file: Option<PathBuf>,
}

/// Runs the HTTP API server until interrupted.
pub async fn cmd(args: ServeArgs) -> Result<()> {
    let config = Config::read()?;
    let server_config = config.server.unwrap_or_default();
    let port = args.port.unwrap_or(server_config.port);

    let tasks = match args.db_file.or_else(|| server_config.db_file.map(PathBuf::from)) {
        Some(path) => Tasks::open(path)?,
        None => Tasks::new()?,
    };
    let state = AppState::new(tasks, &config.calendar.unwrap_or_default());
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "tickline server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
