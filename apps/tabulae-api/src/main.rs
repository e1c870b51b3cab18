use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = tabulae_api::Args::parse();
	tabulae_api::run(args).await
}
