use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{FullTextQuery, ValidationError};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Inclusive range of sent dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
	start: Date,
	end: Date,
}
impl DateRange {
	pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
		if start > end {
			return Err(ValidationError::new(
				"date_range",
				format!("start date {start} is after end date {end}."),
			));
		}

		Ok(Self { start, end })
	}

	pub fn start(&self) -> Date {
		self.start
	}

	pub fn end(&self) -> Date {
		self.end
	}
}

/// Validated filter criteria for one search submission.
///
/// Entities are category-agnostic labels; which bucket a label was picked from is not retained.
/// Both lists keep their submission order and hold no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
	date_range: DateRange,
	entities: Vec<String>,
	topics: Vec<String>,
	full_text: Option<FullTextQuery>,
}
impl FilterState {
	pub fn new(date_range: DateRange) -> Self {
		Self { date_range, entities: Vec::new(), topics: Vec::new(), full_text: None }
	}

	pub fn with_entities<I, S>(mut self, entities: I) -> Result<Self, ValidationError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.entities = distinct_labels("entities", entities)?;

		Ok(self)
	}

	pub fn with_topics<I, S>(mut self, topics: I) -> Result<Self, ValidationError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.topics = distinct_labels("topics", topics)?;

		Ok(self)
	}

	pub fn with_full_text(mut self, raw: &str) -> Result<Self, ValidationError> {
		self.full_text = FullTextQuery::parse(raw)?;

		Ok(self)
	}

	pub fn date_range(&self) -> DateRange {
		self.date_range
	}

	pub fn entities(&self) -> &[String] {
		&self.entities
	}

	pub fn topics(&self) -> &[String] {
		&self.topics
	}

	pub fn full_text(&self) -> Option<&FullTextQuery> {
		self.full_text.as_ref()
	}
}

#[derive(Debug, Clone, Copy)]
pub struct FilterLimits {
	pub default_start_date: Date,
	pub default_end_date: Date,
	pub max_entities: usize,
	pub max_topics: usize,
	pub max_full_text_chars: usize,
}
impl From<&foia_config::Config> for FilterLimits {
	fn from(cfg: &foia_config::Config) -> Self {
		Self {
			default_start_date: cfg.corpus.default_start_date,
			default_end_date: cfg.corpus.default_end_date,
			max_entities: cfg.search.max_selected_entities,
			max_topics: cfg.search.max_selected_topics,
			max_full_text_chars: cfg.search.max_full_text_chars,
		}
	}
}

/// The search form as submitted. Missing dates fall back to the corpus window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInput {
	#[serde(with = "iso_date::option")]
	pub start_date: Option<Date>,
	#[serde(with = "iso_date::option")]
	pub end_date: Option<Date>,
	#[serde(deserialize_with = "null_as_default")]
	pub persons: Vec<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub orgs: Vec<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub locations: Vec<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub topics: Vec<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub full_text: String,
}
impl FilterInput {
	pub fn validate(&self, limits: &FilterLimits) -> Result<FilterState, ValidationError> {
		let date_range = DateRange::new(
			self.start_date.unwrap_or(limits.default_start_date),
			self.end_date.unwrap_or(limits.default_end_date),
		)?;
		let entities = self.persons.iter().chain(&self.orgs).chain(&self.locations);
		let state = FilterState::new(date_range)
			.with_entities(entities)?
			.with_topics(&self.topics)?;

		if state.entities.len() > limits.max_entities {
			return Err(ValidationError::new(
				"entities",
				format!("at most {} entities may be selected.", limits.max_entities),
			));
		}
		if state.topics.len() > limits.max_topics {
			return Err(ValidationError::new(
				"topics",
				format!("at most {} topics may be selected.", limits.max_topics),
			));
		}
		if self.full_text.trim().chars().count() > limits.max_full_text_chars {
			return Err(ValidationError::new(
				"full_text",
				format!("search text must be at most {} characters.", limits.max_full_text_chars),
			));
		}

		state.with_full_text(&self.full_text)
	}
}

/// Cleared form fields may arrive as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn distinct_labels<I, S>(field: &str, values: I) -> Result<Vec<String>, ValidationError>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for value in values {
		let label = value.as_ref().trim();

		if label.is_empty() {
			return Err(ValidationError::new(field, "selected values must be non-empty."));
		}
		if seen.insert(label.to_string()) {
			out.push(label.to_string());
		}
	}

	Ok(out)
}
