use serde::{Deserialize, Serialize};
use time::Date;

use crate::{ExplorerService, Result};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePoint {
	#[serde(with = "iso_date")]
	pub date: Date,
	pub emails: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeResponse {
	pub items: Vec<VolumePoint>,
}

impl ExplorerService {
	/// Emails per sent date for the configured source file, from the configured start date on.
	pub async fn daily_volume(&self) -> Result<VolumeResponse> {
		let corpus = &self.cfg.corpus;
		let rows = self
			.bounded(
				"daily volume",
				self.store.daily_volume(corpus.volume_file_id, corpus.volume_start_date),
			)
			.await?;
		let items =
			rows.into_iter().map(|row| VolumePoint { date: row.date, emails: row.emails }).collect();

		Ok(VolumeResponse { items })
	}
}
