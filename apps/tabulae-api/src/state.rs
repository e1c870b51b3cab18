use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use tabulae_index::Deadline;
use tabulae_search::{RequestContext, SearchService};

/// Optional `offset`/`limit` query parameters shared by every listing route.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
	pub offset: Option<u32>,
	pub limit: Option<u32>,
}

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub fn new(config: tabulae_config::Config) -> color_eyre::Result<Self> {
		let service = SearchService::new(config)?;

		Ok(Self { service: Arc::new(service) })
	}

	/// Request context for index-backed routes: the page clamped to `search.max_limit` and a
	/// deadline of `index.timeout_ms` from now.
	pub fn context(&self, params: PageParams) -> RequestContext {
		let search = &self.service.cfg.search;
		let limit =
			params.limit.unwrap_or(search.default_limit).max(1).min(search.max_limit.max(1));
		let deadline = Deadline::after(Duration::from_millis(self.service.cfg.index.timeout_ms));

		RequestContext::new(params.offset.unwrap_or(0), limit, deadline)
	}

	/// Enrichment calls are bounded by their per-endpoint timeouts only.
	pub fn enrichment_context(&self) -> RequestContext {
		RequestContext::new(0, 0, Deadline::none())
	}
}
