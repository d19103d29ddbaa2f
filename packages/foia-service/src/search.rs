pub mod compile;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use foia_domain::FilterInput;
use foia_storage::models::EmailRow;

use crate::{ExplorerService, Result, search::compile::CompiledSearch};

time::serde::format_description!(
	sent_timestamp,
	PrimitiveDateTime,
	"[year]-[month]-[day] [hour]:[minute]:[second]"
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailItem {
	pub email_id: i32,
	pub pg_number: i32,
	#[serde(with = "sent_timestamp")]
	pub sent: PrimitiveDateTime,
	pub subject: Option<String>,
	#[serde(rename = "from")]
	pub from_email: Option<String>,
	#[serde(rename = "to")]
	pub to_emails: Option<String>,
	pub top_topic: Option<String>,
	pub entities: Vec<String>,
}
impl From<EmailRow> for EmailItem {
	fn from(row: EmailRow) -> Self {
		Self {
			email_id: row.email_id,
			pg_number: row.pg_number,
			sent: row.sent,
			subject: row.subject,
			from_email: row.from_email,
			to_emails: row.to_emails,
			top_topic: row.top_topic,
			entities: row.entities.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub count: usize,
	/// What was searched, e.g. `between 2020-01-23 and 2020-05-06 and email references CDC`.
	pub explanation: String,
	/// The explanation prefixed with the match count.
	pub summary: String,
	pub items: Vec<EmailItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
	pub explanation: String,
	pub fragments: Vec<String>,
	pub predicate_clauses: Vec<String>,
	pub statement: String,
}
impl From<CompiledSearch> for ExplainResponse {
	fn from(compiled: CompiledSearch) -> Self {
		Self {
			explanation: compiled.explanation.sentence(),
			fragments: compiled.explanation.fragments().to_vec(),
			predicate_clauses: compiled.query.predicate_clauses().to_vec(),
			statement: compiled.query.statement().to_string(),
		}
	}
}

impl ExplorerService {
	/// Validates and compiles a submission without running it.
	pub fn compile_request(&self, req: &FilterInput) -> Result<CompiledSearch> {
		let filter = req.validate(self.limits())?;

		compile::compile(&filter)
	}

	pub fn explain(&self, req: &FilterInput) -> Result<ExplainResponse> {
		Ok(self.compile_request(req)?.into())
	}

	pub async fn search(&self, req: FilterInput) -> Result<SearchResponse> {
		let compiled = self.compile_request(&req)?;
		let rows = self.bounded("search", self.store.search(&compiled.query)).await?;
		let explanation = compiled.explanation.sentence();
		let count = rows.len();

		Ok(SearchResponse {
			count,
			summary: format!("{count} emails {explanation}"),
			explanation,
			items: rows.into_iter().map(EmailItem::from).collect(),
		})
	}
}
