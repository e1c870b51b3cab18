//! Media database filter criteria and their translation into a boolean query.

use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use tabulae_index::wire::{Clause, SearchBody};

use crate::{
	Page,
	query::{MEDIA_DATABASE_CREATED, QueryBuilder},
};

const ORGANIZATION_NAME: &str = "data.organizations.name";
const BEATS: &str = "data.writingInformation.beats";
const IS_FREELANCER: &str = "data.writingInformation.isFreelancer";
const IS_INFLUENCER: &str = "data.writingInformation.isInfluencer";
const CITY: &str = "data.demographics.locationDeduced.city.name";
const STATE: &str = "data.demographics.locationDeduced.state.name";
const COUNTRY: &str = "data.demographics.locationDeduced.country.name";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaDatabaseQuery {
	#[serde(default)]
	pub included: MediaDatabaseCriteria,
	#[serde(default)]
	pub excluded: MediaDatabaseCriteria,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDatabaseCriteria {
	#[serde(default)]
	pub beats: Vec<String>,
	#[serde(default)]
	pub is_freelancer: bool,
	#[serde(default)]
	pub is_influencer: bool,
	#[serde(default)]
	pub organizations: Vec<String>,
	#[serde(default)]
	pub locations: Vec<LocationFilter>,
	#[serde(default)]
	pub time: TimeRange,
	/// The fields below are parsed but never matched against the index.
	#[serde(default)]
	pub occasional_beats: Vec<String>,
	#[serde(default)]
	pub rss: RssText,
	#[serde(default)]
	pub instagram: InstagramText,
	#[serde(default)]
	pub twitter: TwitterText,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RssText {
	#[serde(default)]
	pub headline: String,
	#[serde(default)]
	pub include_body: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstagramText {
	#[serde(default)]
	pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TwitterText {
	#[serde(default, rename = "tweetbody")]
	pub tweet_body: String,
	#[serde(default, rename = "userDescription")]
	pub user_description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationFilter {
	#[serde(default)]
	pub country: String,
	#[serde(default)]
	pub state: String,
	#[serde(default)]
	pub city: String,
}
impl LocationFilter {
	fn is_empty(&self) -> bool {
		[&self.country, &self.state, &self.city].iter().all(|part| part.trim().is_empty())
	}

	fn clauses(&self) -> Vec<Clause> {
		[(CITY, &self.city), (STATE, &self.state), (COUNTRY, &self.country)]
			.into_iter()
			.filter(|(_, value)| !value.trim().is_empty())
			.map(|(field, value)| Clause::term(field, value.trim()))
			.collect()
	}

	/// The narrowest named part, used when the location is excluded.
	fn narrowest(&self) -> Option<Clause> {
		self.clauses().into_iter().next()
	}
}

/// Creation window on media database documents; either bound may be open.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeRange {
	#[serde(default, with = "crate::rfc3339")]
	pub from: Option<OffsetDateTime>,
	#[serde(default, with = "crate::rfc3339")]
	pub to: Option<OffsetDateTime>,
}
impl TimeRange {
	fn clause(&self) -> Option<Clause> {
		if self.from.is_none() && self.to.is_none() {
			return None;
		}

		let format = |bound: Option<OffsetDateTime>| bound.and_then(|at| at.format(&Rfc3339).ok());

		Some(Clause::range(MEDIA_DATABASE_CREATED, format(self.from), format(self.to)))
	}
}

/// Builds the media database search body.
///
/// Included organizations and beats follow the single-value-required rule per field. One
/// included location requires each named part; several locations become alternatives on the
/// city. Every excluded value becomes a `must_not` clause.
pub fn media_database_body(query: &MediaDatabaseQuery, page: Page) -> SearchBody {
	let included = &query.included;
	let excluded = &query.excluded;
	let mut builder = QueryBuilder::new(page)
		.field_values(values(ORGANIZATION_NAME, &included.organizations, Clause::matches))
		.field_values(values(BEATS, &included.beats, Clause::matches));
	let locations: Vec<&LocationFilter> =
		included.locations.iter().filter(|location| !location.is_empty()).collect();

	match locations.as_slice() {
		[] => {},
		[location] =>
			for clause in location.clauses() {
				builder = builder.must(clause);
			},
		several =>
			for location in several {
				if !location.city.trim().is_empty() {
					builder = builder.should(Clause::term(CITY, location.city.trim()));
				}
			},
	}

	if included.is_freelancer {
		builder = builder.must(Clause::term(IS_FREELANCER, true));
	}
	if included.is_influencer {
		builder = builder.must(Clause::term(IS_INFLUENCER, true));
	}
	if let Some(clause) = included.time.clause() {
		builder = builder.must(clause);
	}

	let exclusions = values(ORGANIZATION_NAME, &excluded.organizations, Clause::matches)
		.into_iter()
		.chain(values(BEATS, &excluded.beats, Clause::matches))
		.chain(excluded.locations.iter().filter_map(LocationFilter::narrowest))
		.chain(excluded.is_freelancer.then(|| Clause::term(IS_FREELANCER, true)))
		.chain(excluded.is_influencer.then(|| Clause::term(IS_INFLUENCER, true)))
		.chain(excluded.time.clause());

	for clause in exclusions {
		builder = builder.must_not(clause);
	}

	builder.adaptive_match().newest_first(MEDIA_DATABASE_CREATED).build()
}

fn values<F>(field: &str, raw: &[String], clause: F) -> Vec<Clause>
where
	F: Fn(&str, String) -> Clause,
{
	raw.iter()
		.map(|value| value.trim())
		.filter(|value| !value.is_empty())
		.map(|value| clause(field, value.to_string()))
		.collect()
}
