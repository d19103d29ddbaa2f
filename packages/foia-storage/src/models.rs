use time::{Date, PrimitiveDateTime};

/// One row of the search result set, in the column order of the search statement.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmailRow {
	pub email_id: i32,
	pub pg_number: i32,
	pub sent: PrimitiveDateTime,
	pub subject: Option<String>,
	pub from_email: Option<String>,
	pub to_emails: Option<String>,
	pub top_topic: Option<String>,
	/// NULL when the loader recorded no entities for the email.
	pub entities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyVolume {
	pub date: Date,
	pub emails: i64,
}
