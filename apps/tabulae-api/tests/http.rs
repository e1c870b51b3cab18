use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use tabulae_api::{routes, state::AppState};
use tabulae_testkit::{StubReply, StubServer, search_response, test_config};

const UNUSED_ENHANCE: &str = "http://127.0.0.1:9";

fn app_for(index: &StubServer) -> Router {
	let state = AppState::new(test_config(index.base_url(), UNUSED_ENHANCE))
		.expect("Failed to initialize app state.");

	routes::router(state)
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Failed to parse response body.")
	};

	(status, json)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post(uri: &str, payload: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let (status, _) = call(app_for(&index), get("/health")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(index.request_count(), 0);
}

#[tokio::test]
async fn tweets_route_returns_a_filtered_page() {
	let index = StubServer::fixed(search_response(9, &[
		("1", json!({ "Username": "acmenews", "Text": "owned" })),
		("2", json!({ "Username": "stranger", "Text": "foreign" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let (status, body) = call(
		app_for(&index),
		post("/v1/tweets?offset=10&limit=5", json!({ "usernames": ["AcmeNews", "Globex"] })),
	)
	.await;
	let request = index.last_request().expect("Missing request.");

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["count"], 1);
	assert_eq!(body["total"], 9);
	assert_eq!(body["results"][0]["text"], "owned");
	assert_eq!(body["results"][0]["type"], "tweets");
	assert_eq!(request.body["from"], 10);
	assert_eq!(request.body["size"], 5);
}

#[tokio::test]
async fn oversized_limits_are_clamped() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let (status, _) = call(app_for(&index), get("/v1/media-database/contacts?limit=5000")).await;
	let request = index.last_request().expect("Missing request.");

	assert_eq!(status, StatusCode::OK);
	assert_eq!(request.path, "/md1/contacts/_search");
	assert_eq!(request.body["size"], 100);
}

#[tokio::test]
async fn missing_profile_maps_to_not_found() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let (status, body) = call(app_for(&index), get("/v1/twitter/profiles/ghost")).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error_code"], "not_found");
}

#[tokio::test]
async fn index_failure_maps_to_bad_gateway() {
	let index = StubServer::start(|_| StubReply::status(StatusCode::SERVICE_UNAVAILABLE))
		.await
		.expect("Failed to start stub index.");
	let (status, body) = call(app_for(&index), get("/v1/headlines/publications/12")).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(body["error_code"], "search_failed");
}

#[tokio::test]
async fn blank_publication_name_is_rejected() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let (status, body) = call(app_for(&index), get("/v1/publications?name=%20")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_request");
	assert_eq!(index.request_count(), 0);
}

#[tokio::test]
async fn city_route_disambiguates() {
	let index = StubServer::fixed(search_response(2, &[
		("c1", json!({
			"cityName": "Springfield",
			"fixedStateName": "Illinois",
			"fixedCountryName": "United States",
		})),
		("c2", json!({
			"cityName": "Springfield Lake",
			"fixedStateName": "Illinois",
			"fixedCountryName": "United States",
		})),
	]))
	.await
	.expect("Failed to start stub index.");
	let uri = "/v1/locations/cities?name=springfield&state=Illinois&country=United%20States";
	let (status, body) = call(app_for(&index), get(uri)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["total"], 1);
	assert_eq!(body["results"][0]["id"], "c1");
	assert_eq!(body["results"][0]["cityName"], "Springfield");
}

#[tokio::test]
async fn feed_route_accepts_contacts_and_feeds() {
	let index = StubServer::fixed(search_response(1, &[
		("1", json!({ "Type": "Headline", "FeedURL": "https://acme.example.org/rss" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let payload = json!({
		"contacts": [{ "twitter": "acmenews" }],
		"feeds": [{ "url": "https://acme.example.org/rss" }],
	});
	let (status, body) = call(app_for(&index), post("/v1/feeds", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["results"][0]["type"], "headlines");
	assert_eq!(body["results"][0]["feedurl"], "https://acme.example.org/rss");
}
