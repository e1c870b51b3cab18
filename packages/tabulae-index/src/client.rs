use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use tabulae_config::IndexTarget;

use crate::{
	Deadline, Error, Result,
	wire::{MgetBody, MgetDoc, MgetResponse, SearchBody, SearchHits, SearchResponse},
};

/// Connection to the remote document index.
///
/// Built once at startup and shared; it holds no per-request state.
#[derive(Debug, Clone)]
pub struct IndexClient {
	client: Client,
	base_url: String,
	timeout: Duration,
}
impl IndexClient {
	pub fn new(cfg: &tabulae_config::Index) -> Result<Self> {
		let client = Client::builder().build()?;

		Ok(Self {
			client,
			base_url: cfg.base_url.trim_end_matches('/').to_string(),
			timeout: Duration::from_millis(cfg.timeout_ms),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Runs a structured boolean query against `target`.
	pub async fn search(
		&self,
		target: &IndexTarget,
		body: &SearchBody,
		deadline: Deadline,
	) -> Result<SearchHits> {
		let url = self.url(target, "_search");
		let request = self.client.post(&url).json(body);
		let response: SearchResponse = self.execute(request, &url, deadline).await?;

		Ok(response.hits)
	}

	/// Runs a Lucene query-string search (`?q=`) against `target`.
	pub async fn query_string(
		&self,
		target: &IndexTarget,
		q: &str,
		from: u32,
		size: u32,
		deadline: Deadline,
	) -> Result<SearchHits> {
		let url = self.url(target, "_search");
		let request = self.client.get(&url).query(&[
			("size", size.to_string()),
			("from", from.to_string()),
			("q", q.to_string()),
		]);
		let response: SearchResponse = self.execute(request, &url, deadline).await?;

		Ok(response.hits)
	}

	/// Fetches documents by id. Missing ids come back with `found == false`.
	pub async fn mget(
		&self,
		target: &IndexTarget,
		ids: &[String],
		deadline: Deadline,
	) -> Result<Vec<MgetDoc>> {
		let url = self.url(target, "_mget");
		let request = self.client.post(&url).json(&MgetBody { ids });
		let response: MgetResponse = self.execute(request, &url, deadline).await?;

		Ok(response.docs)
	}

	pub async fn mapping(&self, target: &IndexTarget, deadline: Deadline) -> Result<Value> {
		let url = format!("{}/{}/_mapping/{}", self.base_url, target.index, target.types);
		let request = self.client.get(&url);

		self.execute(request, &url, deadline).await
	}

	fn url(&self, target: &IndexTarget, action: &str) -> String {
		format!("{}/{}/{}/{action}", self.base_url, target.index, target.types)
	}

	async fn execute<T>(&self, request: RequestBuilder, url: &str, deadline: Deadline) -> Result<T>
	where
		T: DeserializeOwned,
	{
		send_json(request, url, deadline, self.timeout).await
	}
}

pub(crate) async fn send_json<T>(
	request: RequestBuilder,
	url: &str,
	deadline: Deadline,
	call_timeout: Duration,
) -> Result<T>
where
	T: DeserializeOwned,
{
	let response = send(request, url, deadline, call_timeout).await?;
	let bytes = response.bytes().await.map_err(|err| transport_error(err, url))?;

	Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn send(
	request: RequestBuilder,
	url: &str,
	deadline: Deadline,
	call_timeout: Duration,
) -> Result<Response> {
	let Some(budget) = deadline.budget(call_timeout) else {
		return Err(Error::Timeout { url: url.to_string() });
	};
	let response =
		request.timeout(budget).send().await.map_err(|err| transport_error(err, url))?;
	let status = response.status();

	if !status.is_success() {
		return Err(Error::Status { status: status.as_u16(), url: url.to_string() });
	}

	Ok(response)
}

fn transport_error(err: reqwest::Error, url: &str) -> Error {
	if err.is_timeout() { Error::Timeout { url: url.to_string() } } else { Error::Reqwest(err) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn index_config(base_url: &str) -> tabulae_config::Index {
		tabulae_config::Index {
			base_url: base_url.to_string(),
			timeout_ms: 1_000,
			names: Default::default(),
		}
	}

	#[test]
	fn builds_index_urls() {
		let client = IndexClient::new(&index_config("https://search.example.org/"))
			.expect("Failed to build client.");
		let target = IndexTarget::new("feeds", "feed,md-feed");

		assert_eq!(
			client.url(&target, "_search"),
			"https://search.example.org/feeds/feed,md-feed/_search"
		);
		assert_eq!(
			client.url(&target, "_mget"),
			"https://search.example.org/feeds/feed,md-feed/_mget"
		);
	}
}
