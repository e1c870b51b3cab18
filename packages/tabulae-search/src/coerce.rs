//! Lenient conversion of loosely typed index payloads into typed records.
//!
//! Index documents are written by several producers and field types drift over time. Each
//! record type names its fields explicitly in [`Record::assign`]; a value that cannot be
//! converted leaves the field at its default and is reported as a [`FieldWarning`] instead of
//! dropping the whole record.

use serde::Serialize;
use serde_json::{Map, Value};
use time::{
	Date, OffsetDateTime, PrimitiveDateTime,
	format_description::{
		BorrowedFormatItem,
		well_known::{Rfc2822, Rfc3339},
	},
	macros::format_description,
};

pub type Coerced<T> = std::result::Result<T, String>;

const NAIVE_DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
];
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
	pub field: String,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
	pub record: T,
	pub warnings: Vec<FieldWarning>,
}
impl<T> Decoded<T> {
	pub fn has_warning_for(&self, field: &str) -> bool {
		self.warnings.iter().any(|warning| warning.field == field)
	}
}

pub trait Record
where
	Self: Default,
{
	/// Stores one external field. Keys the record does not know are ignored.
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()>;
}

pub fn decode<T>(data: &Map<String, Value>) -> Decoded<T>
where
	T: Record,
{
	let mut record = T::default();
	let mut warnings = Vec::new();

	for (key, value) in data {
		if let Err(message) = record.assign(canonical_key(key), value) {
			warnings.push(FieldWarning { field: key.clone(), message });
		}
	}

	Decoded { record, warnings }
}

/// Maps the lower camel case names some producers use onto record field names.
pub fn canonical_key(key: &str) -> &str {
	match key {
		"id" => "Id",
		"organizationName" => "OrganizationName",
		"countryName" => "CountryName",
		"fixedCountryName" => "FixedCountryName",
		"stateName" => "StateName",
		"fixedStateName" => "FixedStateName",
		"cityName" => "CityName",
		other => other,
	}
}

pub fn int(value: &Value) -> Coerced<i64> {
	match value {
		Value::Null => Ok(0),
		Value::Bool(flag) => Ok(i64::from(*flag)),
		Value::Number(number) =>
			if let Some(int) = number.as_i64() {
				Ok(int)
			} else if let Some(float) = number.as_f64() {
				Ok(float.trunc() as i64)
			} else {
				Err(format!("number {number} does not fit an integer"))
			},
		Value::String(raw) => {
			let raw = raw.trim();

			if raw.is_empty() {
				return Ok(0);
			}

			raw.parse::<i64>()
				.or_else(|_| raw.parse::<f64>().map(|float| float.trunc() as i64))
				.map_err(|_| format!("{raw:?} is not an integer"))
		},
		other => Err(format!("expected an integer, found {}", kind(other))),
	}
}

/// Like [`int`] but refuses fractional input, for identifiers that must round-trip exactly.
pub fn int64(value: &Value) -> Coerced<i64> {
	match value {
		Value::Number(number) => number
			.as_i64()
			.or_else(|| number.as_u64().and_then(|unsigned| i64::try_from(unsigned).ok()))
			.ok_or_else(|| format!("number {number} is not a 64-bit integer")),
		Value::String(raw) if !raw.trim().is_empty() =>
			raw.trim().parse::<i64>().map_err(|_| format!("{raw:?} is not a 64-bit integer")),
		other => int(other),
	}
}

pub fn string(value: &Value) -> Coerced<String> {
	match value {
		Value::Null => Ok(String::new()),
		Value::String(raw) => Ok(raw.clone()),
		other => Err(format!("expected a string, found {}", kind(other))),
	}
}

pub fn boolean(value: &Value) -> Coerced<bool> {
	match value {
		Value::Null => Ok(false),
		Value::Bool(flag) => Ok(*flag),
		Value::Number(number) => Ok(number.as_f64().is_some_and(|float| float != 0.0)),
		Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
			"" | "0" | "f" | "false" => Ok(false),
			"1" | "t" | "true" => Ok(true),
			_ => Err(format!("{raw:?} is not a boolean")),
		},
		other => Err(format!("expected a boolean, found {}", kind(other))),
	}
}

/// Arrays convert element-wise; a bare string splits on whitespace.
pub fn string_list(value: &Value) -> Coerced<Vec<String>> {
	match value {
		Value::Null => Ok(Vec::new()),
		Value::String(raw) => Ok(raw.split_whitespace().map(str::to_string).collect()),
		Value::Array(items) => items
			.iter()
			.map(|item| match item {
				Value::String(raw) => Ok(raw.clone()),
				Value::Number(number) => Ok(number.to_string()),
				Value::Bool(flag) => Ok(flag.to_string()),
				other => Err(format!("list element is {}", kind(other))),
			})
			.collect(),
		other => Err(format!("expected a list of strings, found {}", kind(other))),
	}
}

pub fn int64_list(value: &Value) -> Coerced<Vec<i64>> {
	match value {
		Value::Null => Ok(Vec::new()),
		Value::Array(items) => items.iter().map(int64).collect(),
		other => Err(format!("expected a list of integers, found {}", kind(other))),
	}
}

/// RFC 3339, RFC 2822, zone-less date-times and plain dates (read as UTC), or Unix seconds.
pub fn timestamp(value: &Value) -> Coerced<Option<OffsetDateTime>> {
	match value {
		Value::Null => Ok(None),
		Value::Number(_) => {
			let seconds = int64(value)?;

			OffsetDateTime::from_unix_timestamp(seconds)
				.map(Some)
				.map_err(|err| format!("{seconds} is not a valid Unix timestamp: {err}"))
		},
		Value::String(raw) => {
			let raw = raw.trim();

			if raw.is_empty() {
				return Ok(None);
			}

			parse_timestamp(raw).map(Some).ok_or_else(|| format!("{raw:?} is not a timestamp"))
		},
		other => Err(format!("expected a timestamp, found {}", kind(other))),
	}
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(parsed);
	}
	if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc2822) {
		return Some(parsed);
	}

	for format in NAIVE_DATE_TIME_FORMATS {
		if let Ok(parsed) = PrimitiveDateTime::parse(raw, format) {
			return Some(parsed.assume_utc());
		}
	}

	Date::parse(raw, DATE_FORMAT).ok().map(|date| date.midnight().assume_utc())
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
