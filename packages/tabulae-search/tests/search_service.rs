use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;
use time::macros::date;

use tabulae_index::Deadline;
use tabulae_search::{
	Contact, Error, Feed, MediaDatabaseQuery, RequestContext, SearchPage, SearchService,
};
use tabulae_testkit::{StubReply, StubServer, mget_response, search_response, test_config};

const UNUSED_ENHANCE: &str = "http://127.0.0.1:9";

fn service_for(index: &StubServer) -> SearchService {
	SearchService::new(test_config(index.base_url(), UNUSED_ENHANCE))
		.expect("Failed to build search service.")
}

fn ctx() -> RequestContext {
	RequestContext::new(0, 20, Deadline::after(Duration::from_secs(5)))
}

#[tokio::test]
async fn tweets_are_limited_to_requested_handles() {
	let index = StubServer::fixed(search_response(42, &[
		("1", json!({ "Username": "AcmeNews", "Text": "owned", "Likes": "7" })),
		("2", json!({ "Username": "someone_else", "Text": "foreign" })),
		("3", json!({ "Username": "globex", "Text": "also owned" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let usernames = vec!["acmenews".to_string(), "Globex".to_string()];
	let page = service.tweets_by_usernames(&usernames, ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.method, Method::POST);
	assert_eq!(request.path, "/tweets/tweet,md-tweet/_search");
	assert_eq!(request.body["query"]["bool"]["minimum_should_match"], "50%");
	assert_eq!(request.body["min_score"], 0.2);
	assert_eq!(
		request.body["query"]["bool"]["should"],
		json!([
			{ "match": { "data.Username": "acmenews" } },
			{ "match": { "data.Username": "globex" } },
		])
	);
	assert_eq!(
		request.body["sort"],
		json!([{ "data.CreatedAt": { "order": "desc", "mode": "avg" } }])
	);

	let texts: Vec<_> = page.results.iter().map(|tweet| tweet.text.as_str()).collect();

	assert_eq!(texts, vec!["owned", "also owned"]);
	assert_eq!(page.count, 2);
	assert_eq!(page.total, 42);
	assert_eq!(page.results[0].likes, 7);
}

#[tokio::test]
async fn single_handle_requires_a_strong_match() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let service = service_for(&index);
	let page = service.tweets_by_username("AcmeNews", ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(page, SearchPage::empty());
	assert_eq!(request.body["min_score"], 1.0);
	assert_eq!(request.body["query"]["bool"]["minimum_should_match"], "100%");
	assert_eq!(
		request.body["query"]["bool"]["should"],
		json!([{ "term": { "data.Username": "acmenews" } }])
	);
}

#[tokio::test]
async fn empty_ownership_skips_the_index() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let service = service_for(&index);
	let tweets = service.tweets_by_usernames(&[" ".to_string()], ctx()).await;
	let feed = service.feed_for_contacts(&[Contact::default()], &[], ctx()).await;
	let headlines = service.headlines_by_resource(&[], ctx()).await;

	assert_eq!(tweets.expect("Search failed.").total, 0);
	assert_eq!(feed.expect("Search failed.").count, 0);
	assert_eq!(headlines.expect("Search failed.").count, 0);
	assert_eq!(index.request_count(), 0);
}

#[tokio::test]
async fn feed_combines_every_owned_identity() {
	let index = StubServer::fixed(search_response(3, &[
		("1", json!({ "Type": "Headline", "FeedURL": "https://acme.example.org/rss" })),
		("2", json!({ "Type": "Tweet", "Username": "AcmeNews" })),
		("3", json!({ "Type": "Instagram", "InstagramUsername": "stranger" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let contacts =
		[Contact { twitter: "acmenews".to_string(), instagram: "acme.photos".to_string() }];
	let feeds = [Feed { url: "https://acme.example.org/rss".to_string() }];
	let page = service.feed_for_contacts(&contacts, &feeds, ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/feeds/feed,md-feed/_search");
	assert_eq!(
		request.body["query"]["bool"]["should"],
		json!([
			{ "term": { "data.Username": "acmenews" } },
			{ "term": { "data.InstagramUsername": "acme.photos" } },
			{ "match": { "data.FeedURL": "https://acme.example.org/rss" } },
		])
	);
	assert_eq!(request.body["query"]["bool"]["minimum_should_match"], "33%");

	let kinds: Vec<_> = page.results.iter().map(|item| item.kind.as_str()).collect();

	assert_eq!(kinds, vec!["headlines", "tweets"]);
	assert_eq!(page.total, 3);
}

#[tokio::test]
async fn publication_headlines_are_not_filtered() {
	let index = StubServer::fixed(search_response(2, &[
		("1", json!({ "Title": "first", "FeedURL": "https://any.example.org/rss" })),
		("2", json!({ "Title": "second", "PublishDate": "2024-01-02T08:00:00Z" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service.headlines_by_publication(77, ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/headlines/headline/_search");
	assert_eq!(
		request.body["query"]["bool"]["must"],
		json!([{ "term": { "data.PublicationId": 77 } }])
	);
	assert_eq!(request.body.get("min_score"), None);
	assert_eq!(page.count, 2);
}

#[tokio::test]
async fn timeseries_fetches_synthetic_ids() {
	let index = StubServer::fixed(mget_response(&[
		("acme-2024-01-03", Some(json!({ "Username": "acme", "Followers": 120 }))),
		("acme-2024-01-02", None),
		("acme-2024-01-01", Some(json!({ "Username": "acme", "Followers": "118" }))),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service
		.twitter_timeseries_by_usernames(&["Acme".to_string()], date!(2024 - 01 - 03), 3, ctx())
		.await
		.expect("Multi-get failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/timeseries/twitter/_mget");
	assert_eq!(
		request.body,
		json!({ "ids": ["acme-2024-01-03", "acme-2024-01-02", "acme-2024-01-01"] })
	);
	assert_eq!(
		page.results.iter().map(|point| point.followers).collect::<Vec<_>>(),
		vec![120, 118]
	);
	assert_eq!(page.total, 2);
}

#[tokio::test]
async fn single_handle_timeseries_is_capped() {
	let index = StubServer::fixed(search_response(1, &[
		("acme-2024-01-03", json!({ "Username": "acme", "Followers": 5, "Comments": 2 })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service
		.instagram_timeseries_by_username("ACME", ctx())
		.await
		.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/timeseries/instagram/_search");
	assert_eq!(request.body["size"], 31);
	assert_eq!(request.body["from"], 0);
	assert_eq!(page.results[0].comments, 2);
}

#[tokio::test]
async fn exact_city_is_returned_alone() {
	let index = StubServer::fixed(search_response(2, &[
		("c1", json!({
			"cityName": "Portland",
			"fixedStateName": "Oregon",
			"fixedCountryName": "United States",
		})),
		("c2", json!({
			"cityName": "Portland Heights",
			"fixedStateName": "Oregon",
			"fixedCountryName": "United States",
		})),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service
		.city("\"portland\"", "oregon", "united states", ctx())
		.await
		.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/locations/city/_search");
	assert_eq!(
		request.body["query"]["bool"]["must"],
		json!([
			{ "match": { "data.fixedCountryName": "united states" } },
			{ "match": { "data.fixedStateName": "oregon" } },
			{ "bool": { "should": [{ "match": { "data.cityName": "portland" } }] } },
		])
	);
	assert_eq!(page.total, 1);
	assert_eq!(page.results.len(), 1);
	assert_eq!(page.results[0].id, "c1");
}

#[tokio::test]
async fn partial_state_name_lists_candidates() {
	let index = StubServer::fixed(search_response(2, &[
		("s1", json!({ "stateName": "New York", "fixedCountryName": "United States" })),
		("s2", json!({ "stateName": "New Jersey", "fixedCountryName": "United States" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service.state("New", "United States", ctx()).await.expect("Search failed.");

	assert_eq!(page.total, 2);
	assert_eq!(page.count, 2);
}

#[tokio::test]
async fn country_uses_a_query_string() {
	let index = StubServer::fixed(search_response(1, &[
		("us", json!({ "countryName": "United States" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service.country("United States", ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.method, Method::GET);
	assert_eq!(request.path, "/locations/country/_search");
	assert_eq!(request.query_param("q").as_deref(), Some("data.countryName:United States"));
	assert_eq!(page.total, 1);
	assert_eq!(page.results[0].id, "us");
}

#[tokio::test]
async fn missing_profile_is_not_found() {
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let service = service_for(&index);
	let err = service
		.twitter_profile("ghost", ctx())
		.await
		.expect_err("Expected missing profile to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err}");
	assert_eq!(index.last_request().expect("Missing request.").path, "/tweets/user/_search");
}

#[tokio::test]
async fn index_failure_surfaces_as_search_error() {
	let index = StubServer::start(|_| StubReply::status(StatusCode::BAD_GATEWAY))
		.await
		.expect("Failed to start stub index.");
	let service = service_for(&index);
	let err = service.media_database(ctx()).await.expect_err("Expected index failure.");

	assert!(matches!(err, Error::Index { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn slow_index_times_out() {
	let index = StubServer::start(|_| {
		StubReply::json(search_response(0, &[])).delayed(Duration::from_millis(800))
	})
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let ctx = RequestContext::new(0, 20, Deadline::after(Duration::from_millis(100)));
	let err = service.contacts_database(ctx).await.expect_err("Expected timeout.");

	assert!(matches!(err, Error::Timeout { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn media_database_criteria_reach_the_index() {
	let index = StubServer::fixed(search_response(5, &[
		("a@acme.example.org", json!({ "name": "Ada" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let query: MediaDatabaseQuery = serde_json::from_value(json!({
		"included": { "organizations": ["Acme Daily"], "beats": ["technology", "science"] },
		"excluded": { "isFreelancer": true },
	}))
	.expect("Failed to parse criteria.");
	let page = service.search_media_database(&query, ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");
	let bool_query = &request.body["query"]["bool"];

	assert_eq!(request.path, "/md1/contacts/_search");
	assert_eq!(
		bool_query["must"],
		json!([{ "match": { "data.organizations.name": "Acme Daily" } }])
	);
	assert_eq!(bool_query["should"].as_array().map(Vec::len), Some(2));
	assert_eq!(
		bool_query["must_not"],
		json!([{ "term": { "data.writingInformation.isFreelancer": true } }])
	);
	assert_eq!(
		request.body["sort"],
		json!([{ "data.created": { "order": "desc", "mode": "avg" } }])
	);
	assert_eq!(page.results, vec![json!({ "name": "Ada" })]);
	assert_eq!(page.total, 5);
}

#[tokio::test]
async fn contacts_database_uses_document_ids_as_emails() {
	let index = StubServer::fixed(search_response(1, &[
		("ada@acme.example.org", json!({ "firstName": "Ada" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service.contacts_database(ctx()).await.expect("Search failed.");

	assert_eq!(page.results[0].email, "ada@acme.example.org");
	assert_eq!(index.last_request().expect("Missing request.").path, "/database/contacts/_search");
}

#[tokio::test]
async fn publications_are_typed_by_source() {
	let index = StubServer::fixed(search_response(1, &[
		("p1", json!({ "organizationName": "Acme Daily", "Url": "https://acme.example.org" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let by_name = service.publications_by_name("Acme", ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");
	let listed = service.media_database_publications(ctx()).await.expect("Search failed.");

	assert_eq!(request.query_param("q").as_deref(), Some("data.organizationName:Acme"));
	assert_eq!(by_name.results[0].kind, "publications");
	assert_eq!(by_name.results[0].name, "Acme Daily");
	assert_eq!(listed.results[0].kind, "media-publications");
	assert_eq!(listed.results[0].id, "p1");
}

#[tokio::test]
async fn schema_returns_the_raw_mapping() {
	let mapping = json!({ "md1": { "mappings": { "contacts": { "properties": {} } } } });
	let index = StubServer::fixed(mapping.clone()).await.expect("Failed to start stub.");
	let service = service_for(&index);
	let schema = service.media_database_schema(ctx()).await.expect("Mapping lookup failed.");

	assert_eq!(schema, mapping);
	assert_eq!(index.last_request().expect("Missing request.").path, "/md1/_mapping/contacts");
}

#[tokio::test]
async fn email_verification_goes_to_the_enrichment_service() {
	let enhance = StubServer::fixed(json!({
		"data": {
			"status": 200,
			"emails": [{
				"address": "ada@acme.example.org",
				"attributes": { "deliverable": true },
			}],
		},
	}))
	.await
	.expect("Failed to start stub enrichment service.");
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let service = SearchService::new(test_config(index.base_url(), enhance.base_url()))
		.expect("Failed to build search service.");
	let verified =
		service.verify_email("ada@acme.example.org", ctx()).await.expect("Verification failed.");

	assert_eq!(verified.data.emails.len(), 1);
	assert_eq!(
		enhance.last_request().expect("Missing request.").path,
		"/verify/ada%40acme.example.org"
	);
	assert_eq!(index.request_count(), 0);
}

#[tokio::test]
async fn city_without_state_keeps_every_state_in_the_country() {
	let index = StubServer::fixed(search_response(3, &[
		("c1", json!({
			"cityName": "San Francisco",
			"fixedStateName": "California",
			"fixedCountryName": "United States",
		})),
		("c2", json!({
			"cityName": "San Fernando",
			"fixedStateName": "California",
			"fixedCountryName": "United States",
		})),
		("c3", json!({
			"cityName": "San Felipe",
			"fixedStateName": "Baja California",
			"fixedCountryName": "Mexico",
		})),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service.city("San F", "", "United States", ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(
		request.body["query"]["bool"]["must"],
		json!([
			{ "match": { "data.fixedCountryName": "United States" } },
			{ "bool": { "should": [{ "match": { "data.cityName": "San F" } }] } },
		])
	);

	let ids: Vec<_> = page.results.iter().map(|city| city.id.as_str()).collect();

	assert_eq!(ids, vec!["c1", "c2"]);
	assert_eq!(page.total, 3);
}

#[tokio::test]
async fn instagram_posts_are_limited_to_the_handle() {
	let index = StubServer::fixed(search_response(2, &[
		("p1", json!({ "Username": "Acme.Photos", "Caption": "launch day", "Likes": 12 })),
		("p2", json!({ "Username": "stranger", "Caption": "not ours" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let page = service
		.instagram_posts_by_username(" ACME.photos ", ctx())
		.await
		.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/instagrams/instagram/_search");
	assert_eq!(
		request.body["query"]["bool"]["should"],
		json!([{ "term": { "data.Username": "acme.photos" } }])
	);
	assert_eq!(request.body["min_score"], 1.0);
	assert_eq!(page.count, 1);
	assert_eq!(page.total, 2);
	assert_eq!(page.results[0].caption, "launch day");
	assert_eq!(page.results[0].kind, "instagrams");
	assert_eq!(page.results[0].likes, 12);
}

#[tokio::test]
async fn headlines_follow_owned_feeds() {
	let index = StubServer::fixed(search_response(3, &[
		("h1", json!({ "Title": "owned", "FeedURL": "HTTPS://Acme.example.org/RSS" })),
		("h2", json!({ "Title": "foreign", "FeedURL": "https://initech.example.org/rss" })),
		("h3", json!({ "Title": "unlabeled" })),
	]))
	.await
	.expect("Failed to start stub index.");
	let service = service_for(&index);
	let feeds = [
		Feed { url: "https://globex.example.org/rss".to_string() },
		Feed { url: "https://acme.example.org/rss".to_string() },
	];
	let page = service.headlines_by_resource(&feeds, ctx()).await.expect("Search failed.");
	let request = index.last_request().expect("Missing request.");

	assert_eq!(request.path, "/headlines/headline/_search");
	assert_eq!(
		request.body["query"]["bool"]["should"],
		json!([
			{ "match": { "data.FeedURL": "https://acme.example.org/rss" } },
			{ "match": { "data.FeedURL": "https://globex.example.org/rss" } },
		])
	);
	assert_eq!(request.body["query"]["bool"]["minimum_should_match"], "50%");
	assert_eq!(request.body["min_score"], 0.2);
	assert_eq!(
		request.body["sort"],
		json!([{ "data.PublishDate": { "order": "desc", "mode": "avg" } }])
	);

	let titles: Vec<_> = page.results.iter().map(|headline| headline.title.as_str()).collect();

	assert_eq!(titles, vec!["owned", "unlabeled"]);
	assert!(page.results.iter().all(|headline| headline.kind == "headlines"));
	assert_eq!(page.total, 3);
}

#[tokio::test]
async fn company_lookup_uses_the_bare_domain() {
	let enhance = StubServer::fixed(json!({ "data": { "name": "Acme" } }))
		.await
		.expect("Failed to start stub enrichment service.");
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let service = SearchService::new(test_config(index.base_url(), enhance.base_url()))
		.expect("Failed to build search service.");
	let company = service
		.company("https://www.acme.example.org/", ctx())
		.await
		.expect("Company lookup failed.");

	assert_eq!(company.data["name"], "Acme");
	assert_eq!(
		enhance.last_request().expect("Missing request.").path,
		"/company/acme.example.org"
	);
}

#[tokio::test]
async fn media_database_profile_requires_a_successful_status() {
	let enhance = StubServer::start(|request| {
		let status = if request.path.contains("missing") { 404 } else { 200 };

		StubReply::json(json!({ "data": { "status": status, "name": "Ada Lovelace" } }))
	})
	.await
	.expect("Failed to start stub enrichment service.");
	let index = StubServer::fixed(search_response(0, &[])).await.expect("Failed to start stub.");
	let service = SearchService::new(test_config(index.base_url(), enhance.base_url()))
		.expect("Failed to build search service.");
	let profile = service
		.media_database_profile("ada@acme.example.org", ctx())
		.await
		.expect("Profile lookup failed.");

	assert_eq!(profile.data.status, 200);
	assert_eq!(profile.data.profile["name"], "Ada Lovelace");

	let err = service
		.media_database_profile("missing@acme.example.org", ctx())
		.await
		.expect_err("Expected a failed profile status to be rejected.");

	assert!(matches!(err, Error::Enhance { .. }), "Unexpected error: {err}");
	assert_eq!(enhance.request_count(), 2);
}
