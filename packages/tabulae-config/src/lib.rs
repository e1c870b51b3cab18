mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Enhance, Index, IndexNames, IndexTarget, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for (label, url) in
		[("index.base_url", &cfg.index.base_url), ("enhance.base_url", &cfg.enhance.base_url)]
	{
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			return Err(Error::Validation {
				message: format!("{label} must be an http:// or https:// URL."),
			});
		}
	}

	for (label, timeout_ms) in [
		("index.timeout_ms", cfg.index.timeout_ms),
		("enhance.verify_timeout_ms", cfg.enhance.verify_timeout_ms),
		("enhance.company_timeout_ms", cfg.enhance.company_timeout_ms),
		("enhance.profile_timeout_ms", cfg.enhance.profile_timeout_ms),
		("enhance.media_database_timeout_ms", cfg.enhance.media_database_timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	for (label, target) in cfg.index.names.targets() {
		if target.index.trim().is_empty() || target.types.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("index.names.{label} must name both an index and its types."),
			});
		}
		if target.index.contains('/') || target.types.contains('/') {
			return Err(Error::Validation {
				message: format!("index.names.{label} must not contain '/'."),
			});
		}
	}

	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit < cfg.search.default_limit {
		return Err(Error::Validation {
			message: "search.max_limit must be at least search.default_limit.".to_string(),
		});
	}
	if cfg.search.timeseries_limit == 0 {
		return Err(Error::Validation {
			message: "search.timeseries_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for url in [&mut cfg.index.base_url, &mut cfg.enhance.base_url] {
		let trimmed = url.trim().trim_end_matches('/').to_string();

		*url = trimmed;
	}

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
