//! Assembly of structured `_search` bodies.

use tabulae_index::wire::{BoolQuery, Clause, Query, SearchBody, SortClause};

use crate::Page;

pub const CREATED_AT: &str = "data.CreatedAt";
pub const PUBLISH_DATE: &str = "data.PublishDate";
pub const MEDIA_DATABASE_CREATED: &str = "data.created";

/// Share of `should` clauses a document has to satisfy, by clause count.
///
/// Integer division, so three clauses need `33%` and a hit on any one of them passes.
pub fn minimum_should_match(should_count: usize) -> Option<String> {
	match should_count {
		0 => None,
		1 => Some("100%".to_string()),
		2 => Some("50%".to_string()),
		count => Some(format!("{}%", 100 / count)),
	}
}

/// Relevance floor for handle and feed-URL lookups; broad lookups tolerate weaker matches.
pub fn minimum_score(should_count: usize) -> Option<f64> {
	match should_count {
		0 => None,
		1 => Some(1.0),
		2..=10 => Some(0.2),
		11..=20 => Some(0.1),
		_ => Some(0.0),
	}
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
	bool: BoolQuery,
	sort: Option<SortClause>,
	page: Page,
	min_score: Option<f64>,
}
impl QueryBuilder {
	pub fn new(page: Page) -> Self {
		Self { bool: BoolQuery::default(), sort: None, page, min_score: None }
	}

	pub fn must(mut self, clause: Clause) -> Self {
		self.bool.must.push(clause);

		self
	}

	pub fn should(mut self, clause: Clause) -> Self {
		self.bool.should.push(clause);

		self
	}

	pub fn must_not(mut self, clause: Clause) -> Self {
		self.bool.must_not.push(clause);

		self
	}

	/// Adds the clauses produced for one field: a single value is required, several values
	/// become alternatives.
	pub fn field_values(mut self, clauses: Vec<Clause>) -> Self {
		match clauses.len() {
			0 => {},
			1 => self.bool.must.extend(clauses),
			_ => self.bool.should.extend(clauses),
		}

		self
	}

	/// Replaces any previous sort; every query carries exactly one.
	pub fn newest_first(mut self, field: &str) -> Self {
		self.sort = Some(SortClause::newest_first(field));

		self
	}

	pub fn should_count(&self) -> usize {
		self.bool.should.len()
	}

	/// Sets `minimum_should_match` from the current number of `should` clauses.
	pub fn adaptive_match(mut self) -> Self {
		self.bool.minimum_should_match = minimum_should_match(self.should_count());

		self
	}

	/// Sets both `minimum_should_match` and `min_score` from the current `should` count.
	pub fn adaptive_thresholds(mut self) -> Self {
		self.min_score = minimum_score(self.should_count());

		self.adaptive_match()
	}

	pub fn build(self) -> SearchBody {
		SearchBody {
			query: Query { bool: self.bool },
			sort: self.sort.into_iter().collect(),
			size: self.page.limit,
			from: self.page.offset,
			min_score: self.min_score,
		}
	}
}
