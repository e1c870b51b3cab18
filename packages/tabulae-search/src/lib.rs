pub mod coerce;
pub mod criteria;
pub mod database;
pub mod enrich;
pub mod feeds;
pub mod headlines;
pub mod instagram;
pub mod location;
pub mod query;
pub mod reconcile;
pub mod records;
pub mod rfc3339;
pub mod timeseries;
pub mod tweets;
pub mod whitelist;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use ahash::AHashSet;
use serde::Serialize;
use serde_json::Value;

pub use coerce::{Decoded, FieldWarning};
pub use criteria::{
	InstagramText, LocationFilter, MediaDatabaseCriteria, MediaDatabaseQuery, RssText, TimeRange,
	TwitterText,
};
pub use database::DatabaseContact;
pub use error::{Error, Result};
pub use location::{Disambiguation, Place};
pub use query::QueryBuilder;
pub use records::{
	FeedItem, Headline, InstagramPost, InstagramTimeseries, LocationCity, LocationCountry,
	LocationState, Publication, Tweet, TwitterTimeseries,
};
pub use whitelist::{Contact, Dimension, Feed, Whitelist};

use tabulae_config::{Config, IndexTarget};
use tabulae_index::{
	Deadline, EnhanceClient, IndexClient,
	wire::{MgetDoc, SearchBody, SearchHits},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote document index as seen by the search operations.
pub trait DocumentIndex
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		target: &'a IndexTarget,
		body: &'a SearchBody,
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<SearchHits>>;

	fn query_string<'a>(
		&'a self,
		target: &'a IndexTarget,
		q: &'a str,
		from: u32,
		size: u32,
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<SearchHits>>;

	fn mget<'a>(
		&'a self,
		target: &'a IndexTarget,
		ids: &'a [String],
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<Vec<MgetDoc>>>;

	fn mapping<'a>(
		&'a self,
		target: &'a IndexTarget,
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<Value>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub offset: u32,
	pub limit: u32,
}

/// Per-request pagination and the deadline every outbound call must honor.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
	pub page: Page,
	pub deadline: Deadline,
}
impl RequestContext {
	pub fn new(offset: u32, limit: u32, deadline: Deadline) -> Self {
		Self { page: Page { offset, limit }, deadline }
	}
}

/// One page of results. `total` is what the index reported, before any ownership filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<T> {
	pub results: Vec<T>,
	pub count: usize,
	pub total: u64,
}
impl<T> SearchPage<T> {
	pub fn new(results: Vec<T>, total: u64) -> Self {
		Self { count: results.len(), results, total }
	}

	pub fn empty() -> Self {
		Self { results: Vec::new(), count: 0, total: 0 }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub index: Arc<dyn DocumentIndex>,
	pub enhance: EnhanceClient,
}
impl SearchService {
	pub fn new(cfg: Config) -> Result<Self> {
		let index = IndexClient::new(&cfg.index)?;

		Self::with_index(cfg, Arc::new(index))
	}

	pub fn with_index(cfg: Config, index: Arc<dyn DocumentIndex>) -> Result<Self> {
		let enhance = EnhanceClient::new(&cfg.enhance).map_err(Error::enhance)?;

		Ok(Self { cfg, index, enhance })
	}

	pub(crate) async fn run_search(
		&self,
		target: &IndexTarget,
		body: &SearchBody,
		deadline: Deadline,
	) -> Result<SearchHits> {
		self.index.search(target, body, deadline).await.map_err(|err| {
			tracing::warn!(
				error = %err,
				index = %target.index,
				types = %target.types,
				"Index search failed."
			);

			Error::from(err)
		})
	}

	pub(crate) async fn run_query_string(
		&self,
		target: &IndexTarget,
		q: &str,
		page: Page,
		deadline: Deadline,
	) -> Result<SearchHits> {
		self.index.query_string(target, q, page.offset, page.limit, deadline).await.map_err(
			|err| {
				tracing::warn!(
					error = %err,
					index = %target.index,
					types = %target.types,
					"Index query-string search failed."
				);

				Error::from(err)
			},
		)
	}
}

impl DocumentIndex for IndexClient {
	fn search<'a>(
		&'a self,
		target: &'a IndexTarget,
		body: &'a SearchBody,
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<SearchHits>> {
		Box::pin(IndexClient::search(self, target, body, deadline))
	}

	fn query_string<'a>(
		&'a self,
		target: &'a IndexTarget,
		q: &'a str,
		from: u32,
		size: u32,
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<SearchHits>> {
		Box::pin(IndexClient::query_string(self, target, q, from, size, deadline))
	}

	fn mget<'a>(
		&'a self,
		target: &'a IndexTarget,
		ids: &'a [String],
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<Vec<MgetDoc>>> {
		Box::pin(IndexClient::mget(self, target, ids, deadline))
	}

	fn mapping<'a>(
		&'a self,
		target: &'a IndexTarget,
		deadline: Deadline,
	) -> BoxFuture<'a, tabulae_index::Result<Value>> {
		Box::pin(IndexClient::mapping(self, target, deadline))
	}
}

/// Lower-cased, trimmed handles with blanks and repeats dropped, in request order.
pub(crate) fn normalize_handles<I, S>(handles: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = AHashSet::new();

	handles
		.into_iter()
		.map(|handle| handle.as_ref().trim().to_lowercase())
		.filter(|handle| !handle.is_empty() && seen.insert(handle.clone()))
		.collect()
}
