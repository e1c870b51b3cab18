//! Country, state and city lookup with name disambiguation.

use tabulae_index::wire::{Clause, Hit};

use crate::{
	RequestContext, Result, SearchPage, SearchService,
	coerce::Record,
	query::QueryBuilder,
	reconcile,
	records::{LocationCity, LocationCountry, LocationState},
};

const COUNTRY_NAME: &str = "data.countryName";
const FIXED_COUNTRY_NAME: &str = "data.fixedCountryName";
const FIXED_STATE_NAME: &str = "data.fixedStateName";
const STATE_NAME: &str = "data.stateName";
const CITY_NAME: &str = "data.cityName";

/// A named region together with the names of the regions enclosing it.
pub trait Place {
	fn name(&self) -> &str;

	/// Enclosing region names, innermost first.
	fn ancestors(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disambiguation<T> {
	pub candidates: Vec<T>,
	/// Set when a single candidate matched the query exactly.
	pub confident: bool,
}

/// Narrows index candidates for a region name.
///
/// With several candidates, keeps those that start with the same letter as `query`, contain
/// it, and sit in the requested `ancestors`. A blank ancestor matches any region. If the best
/// remaining candidate then equals the query on every name, it is returned alone.
pub fn disambiguate<T>(query: &str, ancestors: &[&str], candidates: Vec<T>) -> Disambiguation<T>
where
	T: Place,
{
	let query = query.trim().to_lowercase();
	let mut candidates = candidates;

	if candidates.len() > 1 && !query.is_empty() {
		candidates.retain(|candidate| {
			let name = candidate.name().to_lowercase();

			name.chars().next() == query.chars().next()
				&& name.contains(&query)
				&& same_names(&candidate.ancestors(), ancestors)
		});
	}

	let confident = candidates.first().is_some_and(|first| {
		first.name().to_lowercase() == query && same_names(&first.ancestors(), ancestors)
	});

	if confident {
		candidates.truncate(1);
	}

	Disambiguation { candidates, confident }
}

fn same_names(found: &[&str], expected: &[&str]) -> bool {
	found.len() == expected.len()
		&& found.iter().zip(expected).all(|(found, expected)| {
			let expected = expected.trim();

			expected.is_empty() || found.trim().to_lowercase() == expected.to_lowercase()
		})
}

impl Place for LocationCountry {
	fn name(&self) -> &str {
		&self.country_name
	}

	fn ancestors(&self) -> Vec<&str> {
		Vec::new()
	}
}

impl Place for LocationState {
	fn name(&self) -> &str {
		&self.state_name
	}

	fn ancestors(&self) -> Vec<&str> {
		vec![self.country_name.as_str()]
	}
}

impl Place for LocationCity {
	fn name(&self) -> &str {
		&self.city_name
	}

	fn ancestors(&self) -> Vec<&str> {
		vec![self.state_name.as_str(), self.country_name.as_str()]
	}
}

impl SearchService {
	pub async fn country(
		&self,
		name: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<LocationCountry>> {
		let name = clean_name(name);

		if name.is_empty() {
			return Ok(SearchPage::empty());
		}

		let target = &self.cfg.index.names.location_countries;
		let hits = self
			.run_query_string(target, &format!("{COUNTRY_NAME}:{name}"), ctx.page, ctx.deadline)
			.await?;
		let candidates = with_hit_ids::<LocationCountry>(&hits.hits, |country, id| country.id = id);

		Ok(into_page(disambiguate(&name, &[], candidates), hits.total))
	}

	pub async fn state(
		&self,
		name: &str,
		country: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<LocationState>> {
		let name = clean_name(name);
		let country = clean_name(country);
		let mut builder = QueryBuilder::new(ctx.page);

		if !country.is_empty() {
			builder = builder.must(Clause::matches(FIXED_COUNTRY_NAME, country.as_str()));
		}
		if !name.is_empty() {
			builder =
				builder.must(Clause::any_of(vec![Clause::matches(STATE_NAME, name.as_str())]));
		}

		let target = &self.cfg.index.names.location_states;
		let hits = self.run_search(target, &builder.build(), ctx.deadline).await?;
		let candidates = with_hit_ids::<LocationState>(&hits.hits, |state, id| state.id = id);

		Ok(into_page(disambiguate(&name, &[country.as_str()], candidates), hits.total))
	}

	pub async fn city(
		&self,
		name: &str,
		state: &str,
		country: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<LocationCity>> {
		let name = clean_name(name);
		let state = clean_name(state);
		let country = clean_name(country);
		let mut builder = QueryBuilder::new(ctx.page);

		if !country.is_empty() {
			builder = builder.must(Clause::matches(FIXED_COUNTRY_NAME, country.as_str()));
		}
		if !state.is_empty() {
			builder = builder.must(Clause::matches(FIXED_STATE_NAME, state.as_str()));
		}
		if !name.is_empty() {
			builder = builder.must(Clause::any_of(vec![Clause::matches(CITY_NAME, name.as_str())]));
		}

		let target = &self.cfg.index.names.location_cities;
		let hits = self.run_search(target, &builder.build(), ctx.deadline).await?;
		let candidates = with_hit_ids::<LocationCity>(&hits.hits, |city, id| city.id = id);

		let ancestors = [state.as_str(), country.as_str()];

		Ok(into_page(disambiguate(&name, &ancestors, candidates), hits.total))
	}
}

fn clean_name(raw: &str) -> String {
	raw.replace('"', "").trim().to_string()
}

fn with_hit_ids<T>(hits: &[Hit], set_id: impl Fn(&mut T, String)) -> Vec<T>
where
	T: Record,
{
	hits.iter()
		.filter_map(|hit| {
			let mut record = reconcile::decode_hit::<T>(hit)?.record;

			set_id(&mut record, hit.id.clone());

			Some(record)
		})
		.collect()
}

fn into_page<T>(disambiguation: Disambiguation<T>, index_total: u64) -> SearchPage<T> {
	match disambiguation {
		Disambiguation { candidates, confident: true } => SearchPage::new(candidates, 1),
		Disambiguation { candidates, .. } if candidates.is_empty() => SearchPage::empty(),
		Disambiguation { candidates, .. } => SearchPage::new(candidates, index_total),
	}
}
