//! Shared plumbing for the workspace binaries.

use std::path::PathBuf;

use clap::{
	Args,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// The `--config` flag every binary takes.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Installs the global subscriber. An unparsable `log_level` falls back to `info`.
pub fn init_tracing(log_level: &str) -> Result<(), InitError> {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).try_init()
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	#[derive(Debug, Parser)]
	struct Cli {
		#[command(flatten)]
		config: ConfigArgs,
	}

	#[test]
	fn parses_short_and_long_config_flags() {
		let short = Cli::try_parse_from(["tabulae", "-c", "tabulae.toml"])
			.expect("Failed to parse short flag.");
		let long = Cli::try_parse_from(["tabulae", "--config", "tabulae.toml"])
			.expect("Failed to parse long flag.");

		assert_eq!(short.config.config, PathBuf::from("tabulae.toml"));
		assert_eq!(long.config.config, short.config.config);
		assert!(Cli::try_parse_from(["tabulae"]).is_err());
	}
}
