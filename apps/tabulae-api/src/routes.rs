use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use tabulae_index::enhance::{EmailVerificationResponse, EnhanceResponse, MediaDatabaseProfile};
use tabulae_search::{
	Contact, DatabaseContact, Error, Feed, FeedItem, Headline, InstagramPost, InstagramTimeseries,
	LocationCity, LocationCountry, LocationState, MediaDatabaseQuery, Publication, SearchPage,
	Tweet, TwitterTimeseries,
};

use crate::state::{AppState, PageParams};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct UsernamesRequest {
	pub usernames: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TimeseriesRequest {
	pub usernames: Vec<String>,
	#[serde(default = "default_days")]
	pub days: u32,
}

#[derive(Debug, Deserialize)]
pub struct FeedsRequest {
	#[serde(default)]
	pub feeds: Vec<Feed>,
}

#[derive(Debug, Deserialize)]
pub struct ContactFeedRequest {
	#[serde(default)]
	pub contacts: Vec<Contact>,
	#[serde(default)]
	pub feeds: Vec<Feed>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub state: String,
	#[serde(default)]
	pub country: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NameParams {
	#[serde(default)]
	pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CompanyParams {
	pub url: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
			Error::Timeout { message } =>
				ApiError::new(StatusCode::GATEWAY_TIMEOUT, "upstream_timeout", message),
			Error::Index { message } =>
				ApiError::new(StatusCode::BAD_GATEWAY, "search_failed", message),
			Error::Enhance { message } =>
				ApiError::new(StatusCode::BAD_GATEWAY, "enrichment_failed", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/tweets", post(tweets_by_usernames))
		.route("/v1/tweets/{username}", get(tweets_by_username))
		.route("/v1/twitter/profiles/{username}", get(twitter_profile))
		.route("/v1/twitter/timeseries", post(twitter_timeseries_by_usernames))
		.route("/v1/twitter/timeseries/{username}", get(twitter_timeseries_by_username))
		.route("/v1/instagram/posts/{username}", get(instagram_posts_by_username))
		.route("/v1/instagram/profiles/{username}", get(instagram_profile))
		.route("/v1/instagram/timeseries", post(instagram_timeseries_by_usernames))
		.route("/v1/instagram/timeseries/{username}", get(instagram_timeseries_by_username))
		.route("/v1/headlines", post(headlines_by_resource))
		.route("/v1/headlines/publications/{publication_id}", get(headlines_by_publication))
		.route("/v1/feeds", post(feed_for_contacts))
		.route("/v1/media-database/contacts", get(media_database))
		.route("/v1/media-database/search", post(search_media_database))
		.route("/v1/media-database/publications", get(media_database_publications))
		.route("/v1/media-database/schema", get(media_database_schema))
		.route("/v1/contacts-database", get(contacts_database))
		.route("/v1/publications", get(publications_by_name))
		.route("/v1/locations/countries", get(country))
		.route("/v1/locations/states", get(state_by_name))
		.route("/v1/locations/cities", get(city))
		.route("/v1/enrich/verify/{email}", get(verify_email))
		.route("/v1/enrich/company", get(company))
		.route("/v1/enrich/profiles/{email}", get(contact_profile))
		.route("/v1/enrich/profiles/{email}/verified", get(contact_profile_verified))
		.route("/v1/enrich/media-database/{email}", get(media_database_profile))
		.with_state(state)
}

fn default_days() -> u32 {
	1
}

fn today() -> time::Date {
	OffsetDateTime::now_utc().date()
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn tweets_by_username(
	State(state): State<AppState>,
	Path(username): Path<String>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<Tweet>> {
	let response = state.service.tweets_by_username(&username, state.context(page)).await?;
	Ok(Json(response))
}

async fn tweets_by_usernames(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Json(payload): Json<UsernamesRequest>,
) -> ApiResult<SearchPage<Tweet>> {
	let response =
		state.service.tweets_by_usernames(&payload.usernames, state.context(page)).await?;
	Ok(Json(response))
}

async fn twitter_profile(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> ApiResult<Value> {
	let ctx = state.context(PageParams::default());
	let response = state.service.twitter_profile(&username, ctx).await?;
	Ok(Json(response))
}

async fn twitter_timeseries_by_username(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> ApiResult<SearchPage<TwitterTimeseries>> {
	let ctx = state.context(PageParams::default());
	let response = state.service.twitter_timeseries_by_username(&username, ctx).await?;
	Ok(Json(response))
}

async fn twitter_timeseries_by_usernames(
	State(state): State<AppState>,
	Json(payload): Json<TimeseriesRequest>,
) -> ApiResult<SearchPage<TwitterTimeseries>> {
	let ctx = state.context(PageParams::default());
	let response = state
		.service
		.twitter_timeseries_by_usernames(&payload.usernames, today(), payload.days, ctx)
		.await?;
	Ok(Json(response))
}

async fn instagram_posts_by_username(
	State(state): State<AppState>,
	Path(username): Path<String>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<InstagramPost>> {
	let response =
		state.service.instagram_posts_by_username(&username, state.context(page)).await?;
	Ok(Json(response))
}

async fn instagram_profile(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> ApiResult<Value> {
	let ctx = state.context(PageParams::default());
	let response = state.service.instagram_profile(&username, ctx).await?;
	Ok(Json(response))
}

async fn instagram_timeseries_by_username(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> ApiResult<SearchPage<InstagramTimeseries>> {
	let ctx = state.context(PageParams::default());
	let response = state.service.instagram_timeseries_by_username(&username, ctx).await?;
	Ok(Json(response))
}

async fn instagram_timeseries_by_usernames(
	State(state): State<AppState>,
	Json(payload): Json<TimeseriesRequest>,
) -> ApiResult<SearchPage<InstagramTimeseries>> {
	let ctx = state.context(PageParams::default());
	let response = state
		.service
		.instagram_timeseries_by_usernames(&payload.usernames, today(), payload.days, ctx)
		.await?;
	Ok(Json(response))
}

async fn headlines_by_resource(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Json(payload): Json<FeedsRequest>,
) -> ApiResult<SearchPage<Headline>> {
	let response = state.service.headlines_by_resource(&payload.feeds, state.context(page)).await?;
	Ok(Json(response))
}

async fn headlines_by_publication(
	State(state): State<AppState>,
	Path(publication_id): Path<i64>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<Headline>> {
	let response =
		state.service.headlines_by_publication(publication_id, state.context(page)).await?;
	Ok(Json(response))
}

async fn feed_for_contacts(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Json(payload): Json<ContactFeedRequest>,
) -> ApiResult<SearchPage<FeedItem>> {
	let ctx = state.context(page);
	let response = state.service.feed_for_contacts(&payload.contacts, &payload.feeds, ctx).await?;
	Ok(Json(response))
}

async fn media_database(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<Value>> {
	let response = state.service.media_database(state.context(page)).await?;
	Ok(Json(response))
}

async fn search_media_database(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Json(payload): Json<MediaDatabaseQuery>,
) -> ApiResult<SearchPage<Value>> {
	let response = state.service.search_media_database(&payload, state.context(page)).await?;
	Ok(Json(response))
}

async fn media_database_publications(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<Publication>> {
	let response = state.service.media_database_publications(state.context(page)).await?;
	Ok(Json(response))
}

async fn media_database_schema(State(state): State<AppState>) -> ApiResult<Value> {
	let ctx = state.context(PageParams::default());
	let response = state.service.media_database_schema(ctx).await?;
	Ok(Json(response))
}

async fn contacts_database(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<DatabaseContact>> {
	let response = state.service.contacts_database(state.context(page)).await?;
	Ok(Json(response))
}

async fn publications_by_name(
	State(state): State<AppState>,
	Query(params): Query<NameParams>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<Publication>> {
	let response = state.service.publications_by_name(&params.name, state.context(page)).await?;
	Ok(Json(response))
}

async fn country(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<LocationCountry>> {
	let response = state.service.country(&params.name, state.context(page)).await?;
	Ok(Json(response))
}

async fn state_by_name(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<LocationState>> {
	let ctx = state.context(page);
	let response = state.service.state(&params.name, &params.country, ctx).await?;
	Ok(Json(response))
}

async fn city(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
	Query(page): Query<PageParams>,
) -> ApiResult<SearchPage<LocationCity>> {
	let ctx = state.context(page);
	let response = state.service.city(&params.name, &params.state, &params.country, ctx).await?;
	Ok(Json(response))
}

async fn verify_email(
	State(state): State<AppState>,
	Path(email): Path<String>,
) -> ApiResult<EmailVerificationResponse> {
	let response = state.service.verify_email(&email, state.enrichment_context()).await?;
	Ok(Json(response))
}

async fn company(
	State(state): State<AppState>,
	Query(params): Query<CompanyParams>,
) -> ApiResult<EnhanceResponse> {
	let response = state.service.company(&params.url, state.enrichment_context()).await?;
	Ok(Json(response))
}

async fn contact_profile(
	State(state): State<AppState>,
	Path(email): Path<String>,
) -> ApiResult<EnhanceResponse> {
	let response = state.service.contact_profile(&email, state.enrichment_context()).await?;
	Ok(Json(response))
}

async fn contact_profile_verified(
	State(state): State<AppState>,
	Path(email): Path<String>,
) -> ApiResult<EnhanceResponse> {
	let response =
		state.service.contact_profile_verified(&email, state.enrichment_context()).await?;
	Ok(Json(response))
}

async fn media_database_profile(
	State(state): State<AppState>,
	Path(email): Path<String>,
) -> ApiResult<MediaDatabaseProfile> {
	let response =
		state.service.media_database_profile(&email, state.enrichment_context()).await?;
	Ok(Json(response))
}
