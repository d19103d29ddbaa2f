use time::Date;

use crate::{
	Error, Result,
	db::Db,
	models::{DailyVolume, EmailRow},
};

/// A value bound to a `$n` placeholder. Values never appear in statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
	Date(Date),
	Text(String),
	TextArray(Vec<String>),
}
impl SqlParam {
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Date(_) => "date",
			Self::Text(_) => "text",
			Self::TextArray(_) => "text[]",
		}
	}
}

pub async fn list_entity_labels(
	db: &Db,
	codes: &[&str],
	max_entity_id: i32,
) -> Result<Vec<String>> {
	if codes.is_empty() {
		return Err(Error::InvalidArgument("entity type codes must be non-empty.".to_string()));
	}

	let codes = codes.iter().map(|code| code.to_string()).collect::<Vec<_>>();
	let labels = sqlx::query_scalar::<_, String>(
		"\
SELECT DISTINCT entity
FROM covid19.entities
WHERE entity_id <= $1
	AND enttype = ANY($2)
	AND entity IS NOT NULL
	AND entity <> ''
ORDER BY entity",
	)
	.bind(max_entity_id)
	.bind(codes)
	.fetch_all(&db.pool)
	.await?;

	Ok(labels)
}

pub async fn list_topic_labels(db: &Db) -> Result<Vec<String>> {
	let labels = sqlx::query_scalar::<_, String>(
		"\
SELECT DISTINCT top_topic
FROM covid19.fauci_emails
WHERE top_topic IS NOT NULL
	AND top_topic <> ''
ORDER BY top_topic",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(labels)
}

/// Runs a compiled search statement, binding `params` to `$1..$n` in order.
pub async fn fetch_emails(db: &Db, statement: &str, params: &[SqlParam]) -> Result<Vec<EmailRow>> {
	let mut query = sqlx::query_as::<_, EmailRow>(statement);

	for param in params {
		query = match param {
			SqlParam::Date(value) => query.bind(*value),
			SqlParam::Text(value) => query.bind(value.as_str()),
			SqlParam::TextArray(values) => query.bind(values.as_slice()),
		};
	}

	let rows = query.fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn daily_volume(db: &Db, file_id: i32, since: Date) -> Result<Vec<DailyVolume>> {
	let rows = sqlx::query_as::<_, DailyVolume>(
		"\
SELECT sent::date AS date, count(*) AS emails
FROM covid19.emails
WHERE file_id = $1
	AND sent::date >= $2
GROUP BY 1
ORDER BY 1",
	)
	.bind(file_id)
	.bind(since)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
