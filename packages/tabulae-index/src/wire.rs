//! Request and response bodies of the remote document index.
//!
//! The shapes here are dictated by the index service and must stay byte-compatible with it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A leaf or nested condition inside a boolean query.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
	/// Exact, unanalyzed comparison: `{"term": {field: value}}`.
	Term { field: String, value: Value },
	/// Analyzed full-text comparison: `{"match": {field: value}}`.
	Match { field: String, value: Value },
	/// `{"range": {field: {"from": .., "to": ..}}}`; unset bounds are omitted.
	Range { field: String, from: Option<String>, to: Option<String> },
	/// A nested boolean query, used to OR a group of conditions inside a `must`.
	Bool(Box<BoolQuery>),
}
impl Clause {
	pub fn term(field: &str, value: impl Into<Value>) -> Self {
		Self::Term { field: field.to_string(), value: value.into() }
	}

	pub fn matches(field: &str, value: impl Into<Value>) -> Self {
		Self::Match { field: field.to_string(), value: value.into() }
	}

	pub fn range(field: &str, from: Option<String>, to: Option<String>) -> Self {
		Self::Range { field: field.to_string(), from, to }
	}

	pub fn any_of(clauses: Vec<Clause>) -> Self {
		Self::Bool(Box::new(BoolQuery { should: clauses, ..Default::default() }))
	}

	/// Document field the clause tests, `None` for nested boolean groups.
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::Term { field, .. } | Self::Match { field, .. } | Self::Range { field, .. } =>
				Some(field),
			Self::Bool(_) => None,
		}
	}

	pub fn value(&self) -> Option<&Value> {
		match self {
			Self::Term { value, .. } | Self::Match { value, .. } => Some(value),
			Self::Range { .. } | Self::Bool(_) => None,
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::Term { field, value } => serde_json::json!({ "term": { field: value } }),
			Self::Match { field, value } => serde_json::json!({ "match": { field: value } }),
			Self::Range { field, from, to } => {
				let mut bounds = Map::new();

				if let Some(from) = from {
					bounds.insert("from".to_string(), Value::String(from.clone()));
				}
				if let Some(to) = to {
					bounds.insert("to".to_string(), Value::String(to.clone()));
				}

				serde_json::json!({ "range": { field: bounds } })
			},
			Self::Bool(query) => serde_json::json!({ "bool": query }),
		}
	}
}
impl Serialize for Clause {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.to_value().serialize(serializer)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub must: Vec<Clause>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub should: Vec<Clause>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub must_not: Vec<Clause>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub minimum_should_match: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
	pub bool: BoolQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	Asc,
	Desc,
}

/// How a multi-valued field collapses to one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
	Min,
	Max,
	Avg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
	pub field: String,
	pub order: SortOrder,
	pub mode: SortMode,
}
impl SortClause {
	pub fn newest_first(field: &str) -> Self {
		Self { field: field.to_string(), order: SortOrder::Desc, mode: SortMode::Avg }
	}
}
impl Serialize for SortClause {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serde_json::json!({ &self.field: { "order": self.order, "mode": self.mode } })
			.serialize(serializer)
	}
}

/// Body of a structured `_search` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchBody {
	pub query: Query,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub sort: Vec<SortClause>,
	pub size: u32,
	pub from: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MgetBody<'a> {
	pub ids: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
	#[serde(default)]
	pub hits: SearchHits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
	#[serde(default, deserialize_with = "deserialize_total")]
	pub total: u64,
	#[serde(default)]
	pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
	#[serde(rename = "_id", default)]
	pub id: String,
	#[serde(rename = "_score", default)]
	pub score: Option<f64>,
	#[serde(rename = "_source", default)]
	pub source: Source,
}
impl Hit {
	/// The document payload when it is a JSON object.
	pub fn data(&self) -> Option<&Map<String, Value>> {
		self.source.data.as_object()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
	#[serde(default)]
	pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MgetResponse {
	#[serde(default)]
	pub docs: Vec<MgetDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MgetDoc {
	#[serde(rename = "_id", default)]
	pub id: String,
	#[serde(default)]
	pub found: bool,
	#[serde(rename = "_source", default)]
	pub source: Option<Source>,
}
impl MgetDoc {
	pub fn data(&self) -> Option<&Map<String, Value>> {
		self.source.as_ref().and_then(|source| source.data.as_object())
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalRepr {
	Count(u64),
	Object { value: u64 },
}

fn deserialize_total<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	match TotalRepr::deserialize(deserializer)? {
		TotalRepr::Count(count) => Ok(count),
		TotalRepr::Object { value } => Ok(value),
	}
}
