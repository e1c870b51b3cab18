mod error;

pub use error::{Error, Result};

use std::{
	future::IntoFuture,
	sync::{Arc, Mutex},
	time::Duration,
};

use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::{Method, StatusCode, Uri},
	response::{IntoResponse, Response},
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};

type Responder = dyn Fn(&RecordedRequest) -> StubReply + Send + Sync;

/// A request received by [`StubServer`], kept for assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub query: Option<String>,
	pub body: Value,
}
impl RecordedRequest {
	/// Decoded value of a query-string parameter.
	pub fn query_param(&self, key: &str) -> Option<String> {
		let query = self.query.as_deref()?;

		query.split('&').find_map(|pair| {
			let (name, value) = pair.split_once('=')?;

			if name == key { Some(decode_component(value)) } else { None }
		})
	}
}

#[derive(Debug, Clone)]
pub struct StubReply {
	pub status: StatusCode,
	pub body: Value,
	pub delay: Option<Duration>,
}
impl StubReply {
	pub fn json(body: Value) -> Self {
		Self { status: StatusCode::OK, body, delay: None }
	}

	pub fn status(status: StatusCode) -> Self {
		Self { status, body: serde_json::json!({ "error": status.as_u16() }), delay: None }
	}

	pub fn delayed(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);

		self
	}
}

#[derive(Clone)]
struct StubState {
	responder: Arc<Responder>,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server standing in for the document index or the enrichment service.
///
/// Every request is recorded and answered by the supplied responder.
pub struct StubServer {
	base_url: String,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	shutdown: Option<oneshot::Sender<()>>,
}
impl StubServer {
	pub async fn start<F>(responder: F) -> Result<Self>
	where
		F: Fn(&RecordedRequest) -> StubReply + Send + Sync + 'static,
	{
		let requests = Arc::new(Mutex::new(Vec::new()));
		let state = StubState { responder: Arc::new(responder), requests: requests.clone() };
		let app = Router::new().fallback(handle).with_state(state);
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let (tx, rx) = oneshot::channel();
		let server = axum::serve(listener, app).with_graceful_shutdown(async move {
			let _ = rx.await;
		});

		tokio::spawn(async move {
			let _ = server.into_future().await;
		});

		Ok(Self { base_url: format!("http://{addr}"), requests, shutdown: Some(tx) })
	}

	/// Server that answers every request with the same JSON body.
	pub async fn fixed(body: Value) -> Result<Self> {
		Self::start(move |_| StubReply::json(body.clone())).await
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn request_count(&self) -> usize {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn last_request(&self) -> Result<RecordedRequest> {
		self.requests()
			.pop()
			.ok_or_else(|| Error::Message("Stub server received no requests.".to_string()))
	}
}
impl Drop for StubServer {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

/// Valid configuration pointing both remote services at local stubs.
pub fn test_config(index_url: &str, enhance_url: &str) -> tabulae_config::Config {
	tabulae_config::Config {
		service: tabulae_config::Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "debug".to_string(),
		},
		index: tabulae_config::Index {
			base_url: index_url.to_string(),
			timeout_ms: 2_000,
			names: Default::default(),
		},
		enhance: tabulae_config::Enhance {
			base_url: enhance_url.to_string(),
			verify_timeout_ms: 2_000,
			company_timeout_ms: 2_000,
			profile_timeout_ms: 2_000,
			media_database_timeout_ms: 2_000,
		},
		search: tabulae_config::Search { default_limit: 20, max_limit: 100, timeseries_limit: 31 },
	}
}

/// Wraps documents in the index's `_search` response envelope.
pub fn search_response(total: u64, docs: &[(&str, Value)]) -> Value {
	let hits: Vec<Value> = docs
		.iter()
		.map(|(id, data)| {
			serde_json::json!({
				"_id": id,
				"_score": 1.0,
				"_source": { "data": data }
			})
		})
		.collect();

	serde_json::json!({ "hits": { "total": total, "hits": hits } })
}

/// Wraps documents in the index's `_mget` response envelope; `None` marks a missing id.
pub fn mget_response(docs: &[(&str, Option<Value>)]) -> Value {
	let docs: Vec<Value> = docs
		.iter()
		.map(|(id, data)| match data {
			Some(data) => serde_json::json!({
				"_id": id,
				"found": true,
				"_source": { "data": data }
			}),
			None => serde_json::json!({ "_id": id, "found": false }),
		})
		.collect();

	serde_json::json!({ "docs": docs })
}

async fn handle(
	State(state): State<StubState>,
	method: Method,
	uri: Uri,
	body: Bytes,
) -> Response {
	let body = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).unwrap_or(Value::Null)
	};
	let request = RecordedRequest {
		method,
		path: uri.path().to_string(),
		query: uri.query().map(str::to_string),
		body,
	};
	let reply = (state.responder)(&request);

	state.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request);

	if let Some(delay) = reply.delay {
		tokio::time::sleep(delay).await;
	}

	(reply.status, Json(reply.body)).into_response()
}

fn decode_component(raw: &str) -> String {
	let spaced = raw.replace('+', " ");

	urlencoding::decode(&spaced).map(|value| value.into_owned()).unwrap_or(spaced)
}
