pub mod routes;
pub mod state;

use std::net::SocketAddr;

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = tabulae_cli::VERSION,
	rename_all = "kebab",
	styles = tabulae_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: tabulae_cli::ConfigArgs,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = tabulae_config::load(&args.config.config)?;
	tabulae_cli::init_tracing(&config.service.log_level).map_err(|err| eyre::eyre!(err))?;
	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let state = AppState::new(config)?;
	let app = routes::router(state);

	let http_listener = TcpListener::bind(http_addr).await?;
	tracing::info!(%http_addr, "HTTP server listening.");
	axum::serve(http_listener, app).await?;
	Ok(())
}
