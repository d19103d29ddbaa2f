pub mod lookup;
pub mod search;
pub mod volume;

mod error;

pub use error::{Error, Result};
pub use lookup::{LookupCache, LookupKey, LookupOptions};
pub use search::{
	EmailItem, ExplainResponse, SearchResponse,
	compile::{CompiledQuery, CompiledSearch, Explanation, compile},
};
pub use volume::{VolumePoint, VolumeResponse};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use time::Date;

use foia_config::Config;
use foia_domain::{EntityCategory, FilterLimits};
use foia_storage::{
	db::Db,
	models::{DailyVolume, EmailRow},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the email corpus. Every value must reach the store as a bound parameter.
pub trait CorpusStore
where
	Self: Send + Sync,
{
	fn entity_labels<'a>(
		&'a self,
		category: EntityCategory,
		max_entity_id: i32,
	) -> BoxFuture<'a, foia_storage::Result<Vec<String>>>;

	fn topic_labels<'a>(&'a self) -> BoxFuture<'a, foia_storage::Result<Vec<String>>>;

	fn search<'a>(
		&'a self,
		query: &'a CompiledQuery,
	) -> BoxFuture<'a, foia_storage::Result<Vec<EmailRow>>>;

	fn daily_volume<'a>(
		&'a self,
		file_id: i32,
		since: Date,
	) -> BoxFuture<'a, foia_storage::Result<Vec<DailyVolume>>>;
}

pub struct PgCorpusStore {
	pub db: Db,
}
impl CorpusStore for PgCorpusStore {
	fn entity_labels<'a>(
		&'a self,
		category: EntityCategory,
		max_entity_id: i32,
	) -> BoxFuture<'a, foia_storage::Result<Vec<String>>> {
		Box::pin(queries::list_entity_labels(&self.db, category.codes(), max_entity_id))
	}

	fn topic_labels<'a>(&'a self) -> BoxFuture<'a, foia_storage::Result<Vec<String>>> {
		Box::pin(queries::list_topic_labels(&self.db))
	}

	fn search<'a>(
		&'a self,
		query: &'a CompiledQuery,
	) -> BoxFuture<'a, foia_storage::Result<Vec<EmailRow>>> {
		Box::pin(queries::fetch_emails(&self.db, query.statement(), query.params()))
	}

	fn daily_volume<'a>(
		&'a self,
		file_id: i32,
		since: Date,
	) -> BoxFuture<'a, foia_storage::Result<Vec<DailyVolume>>> {
		Box::pin(queries::daily_volume(&self.db, file_id, since))
	}
}

pub struct ExplorerService {
	pub cfg: Config,
	pub store: Arc<dyn CorpusStore>,
	pub lookups: LookupCache,
	limits: FilterLimits,
}
impl ExplorerService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_store(cfg, Arc::new(PgCorpusStore { db }))
	}

	pub fn with_store(cfg: Config, store: Arc<dyn CorpusStore>) -> Self {
		let limits = FilterLimits::from(&cfg);

		Self { cfg, store, lookups: LookupCache::default(), limits }
	}

	pub fn limits(&self) -> &FilterLimits {
		&self.limits
	}

	/// Awaits a store call, giving up after `search.query_timeout_ms`. Dropping the call on
	/// expiry cancels the in-flight query.
	pub(crate) async fn bounded<T>(
		&self,
		operation: &str,
		call: BoxFuture<'_, foia_storage::Result<T>>,
	) -> Result<T> {
		let timeout = Duration::from_millis(self.cfg.search.query_timeout_ms);

		match tokio::time::timeout(timeout, call).await {
			Ok(result) => Ok(result?),
			Err(_) => Err(Error::Timeout { operation: operation.to_string() }),
		}
	}
}
