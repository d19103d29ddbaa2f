use serde::Deserialize;
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub corpus: Corpus,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Fixed properties of the loaded email corpus.
#[derive(Debug, Deserialize)]
pub struct Corpus {
	/// Entity rows above this id are extraction noise and never offered as choices.
	#[serde(default = "default_max_entity_id")]
	pub max_entity_id: i32,
	/// Source file whose emails feed the daily volume series.
	#[serde(default = "default_volume_file_id")]
	pub volume_file_id: i32,
	#[serde(with = "iso_date", default = "default_volume_start_date")]
	pub volume_start_date: Date,
	#[serde(with = "iso_date", default = "default_start_date")]
	pub default_start_date: Date,
	#[serde(with = "iso_date", default = "default_end_date")]
	pub default_end_date: Date,
}
impl Default for Corpus {
	fn default() -> Self {
		Self {
			max_entity_id: default_max_entity_id(),
			volume_file_id: default_volume_file_id(),
			volume_start_date: default_volume_start_date(),
			default_start_date: default_start_date(),
			default_end_date: default_end_date(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_query_timeout_ms")]
	pub query_timeout_ms: u64,
	#[serde(default = "default_max_selected")]
	pub max_selected_entities: usize,
	#[serde(default = "default_max_selected")]
	pub max_selected_topics: usize,
	#[serde(default = "default_max_full_text_chars")]
	pub max_full_text_chars: usize,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			query_timeout_ms: default_query_timeout_ms(),
			max_selected_entities: default_max_selected(),
			max_selected_topics: default_max_selected(),
			max_full_text_chars: default_max_full_text_chars(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_max_entity_id() -> i32 {
	515
}

fn default_volume_file_id() -> i32 {
	1_000
}

fn default_volume_start_date() -> Date {
	time::macros::date!(2020 - 01 - 01)
}

fn default_start_date() -> Date {
	time::macros::date!(2020 - 01 - 23)
}

fn default_end_date() -> Date {
	time::macros::date!(2020 - 05 - 06)
}

fn default_query_timeout_ms() -> u64 {
	10_000
}

fn default_max_selected() -> usize {
	64
}

fn default_max_full_text_chars() -> usize {
	512
}
