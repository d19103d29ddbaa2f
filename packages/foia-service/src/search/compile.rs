//! Compiles a [`FilterState`] into a parameterized search statement and its explanation.
//!
//! Every clause is emitted through [`ClauseBuilder::push`], which records the SQL predicate, the
//! bound values and the explanation fragment in one step. Filter values only ever reach the
//! statement as `$n` placeholders; the statement text is assembled from literals in this file.

use std::fmt::{Display, Formatter};

use foia_domain::FilterState;
use foia_storage::queries::SqlParam;

use crate::{Error, Result};

pub const SEARCH_COLUMNS: &str =
	"email_id, pg_number, sent, subject, from_email, to_emails, top_topic, entities";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
	predicate_clauses: Vec<String>,
	statement: String,
	params: Vec<SqlParam>,
}
impl CompiledQuery {
	pub fn predicate_clauses(&self) -> &[String] {
		&self.predicate_clauses
	}

	pub fn statement(&self) -> &str {
		&self.statement
	}

	pub fn params(&self) -> &[SqlParam] {
		&self.params
	}
}

/// Human-readable account of a search, one fragment per predicate clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
	fragments: Vec<String>,
}
impl Explanation {
	pub fn fragments(&self) -> &[String] {
		&self.fragments
	}

	pub fn sentence(&self) -> String {
		self.fragments.join(" and ")
	}
}
impl Display for Explanation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.sentence())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSearch {
	pub query: CompiledQuery,
	pub explanation: Explanation,
}

pub fn compile(filter: &FilterState) -> Result<CompiledSearch> {
	let mut builder = ClauseBuilder::default();
	let range = filter.date_range();
	let (start, end) = (range.start(), range.end());

	builder.push(
		vec![SqlParam::Date(start), SqlParam::Date(end)],
		|p| format!("sent::date BETWEEN {} AND {}", p[0], p[1]),
		format!("between {start} and {end}"),
	);

	let entities = filter.entities();

	if !entities.is_empty() {
		ensure_bindable("entities", entities)?;

		let fragment = match entities {
			[single] => format!("email references {single}"),
			many => format!("email references at least one of {}", many.join(", ")),
		};

		builder.push(
			vec![SqlParam::TextArray(entities.to_vec())],
			|p| format!("entities && {}", p[0]),
			fragment,
		);
	}

	let topics = filter.topics();

	if !topics.is_empty() {
		ensure_bindable("topics", topics)?;
		builder.push(
			vec![SqlParam::TextArray(topics.to_vec())],
			|p| format!("top_topic = ANY({})", p[0]),
			format!("topic is {}", topics.join(", ")),
		);
	}

	if let Some(full_text) = filter.full_text() {
		let text = full_text.text();

		ensure_bindable("full_text", &[text])?;
		builder.push(
			vec![SqlParam::Text(text.to_string())],
			|p| format!("to_tsvector('english', body) @@ websearch_to_tsquery('english', {})", p[0]),
			format!("text body contains \"{text}\""),
		);
	}

	Ok(builder.finish())
}

#[derive(Default)]
struct ClauseBuilder {
	clauses: Vec<String>,
	params: Vec<SqlParam>,
	fragments: Vec<String>,
}
impl ClauseBuilder {
	/// Binds `params`, renders the predicate from their placeholders and records `fragment`
	/// alongside it.
	fn push<F>(&mut self, params: Vec<SqlParam>, render: F, fragment: String)
	where
		F: FnOnce(&[String]) -> String,
	{
		let mut placeholders = Vec::with_capacity(params.len());

		for param in params {
			let type_name = param.type_name();

			self.params.push(param);
			placeholders.push(format!("${}::{type_name}", self.params.len()));
		}

		self.clauses.push(render(&placeholders));
		self.fragments.push(fragment);
	}

	fn finish(self) -> CompiledSearch {
		let statement = format!(
			"\
SELECT {SEARCH_COLUMNS}
FROM covid19.fauci_emails
WHERE {}
ORDER BY sent, email_id",
			self.clauses.join("\n\tAND "),
		);

		CompiledSearch {
			query: CompiledQuery { predicate_clauses: self.clauses, statement, params: self.params },
			explanation: Explanation { fragments: self.fragments },
		}
	}
}

/// PostgreSQL text cannot carry NUL, so such a value has no bindable representation.
fn ensure_bindable<S>(field: &str, values: &[S]) -> Result<()>
where
	S: AsRef<str>,
{
	if values.iter().any(|value| value.as_ref().contains('\0')) {
		return Err(Error::Escaping {
			message: format!("{field} contains a NUL character and cannot be bound as text."),
		});
	}

	Ok(())
}
