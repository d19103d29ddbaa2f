use std::{
	collections::HashMap,
	future::Future,
	sync::{Arc, Mutex},
};

use serde::Serialize;
use tokio::sync::OnceCell;

use foia_domain::{EntityCategory, EntityOption};

use crate::{ExplorerService, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKey {
	Entities(EntityCategory),
	Topics,
}

/// Session-lifetime cache of filter choices.
///
/// Each key is populated lazily by its first caller; concurrent first callers wait on the same
/// population instead of issuing their own query. Populated values never expire. A failed
/// population leaves the key empty.
#[derive(Default)]
pub struct LookupCache {
	slots: Mutex<HashMap<LookupKey, Arc<OnceCell<Arc<[String]>>>>>,
}
impl LookupCache {
	pub async fn get_or_populate<F, Fut>(&self, key: LookupKey, populate: F) -> Result<Arc<[String]>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Vec<String>>>,
	{
		let slot = {
			let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());

			slots.entry(key).or_default().clone()
		};
		let values = slot
			.get_or_try_init(|| async { populate().await.map(Arc::from) })
			.await?;

		Ok(values.clone())
	}

	pub fn is_populated(&self, key: LookupKey) -> bool {
		let slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());

		slots.get(&key).map(|slot| slot.initialized()).unwrap_or(false)
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupOptions {
	pub entities: Vec<EntityOption>,
	pub topics: Vec<String>,
}

impl ExplorerService {
	/// Distinct entity labels of one bucket, sorted ascending.
	pub async fn entity_options(&self, category: EntityCategory) -> Result<Vec<String>> {
		let max_entity_id = self.cfg.corpus.max_entity_id;
		let labels = self
			.lookups
			.get_or_populate(LookupKey::Entities(category), || {
				self.bounded("entity lookup", self.store.entity_labels(category, max_entity_id))
			})
			.await?;

		Ok(labels.to_vec())
	}

	/// Distinct non-empty topic labels, sorted ascending.
	pub async fn topic_options(&self) -> Result<Vec<String>> {
		let labels = self
			.lookups
			.get_or_populate(LookupKey::Topics, || {
				self.bounded("topic lookup", self.store.topic_labels())
			})
			.await?;

		Ok(labels.to_vec())
	}

	pub async fn all_options(&self) -> Result<LookupOptions> {
		let [person, org, location] = EntityCategory::ALL;
		let (persons, orgs, locations, topics) = tokio::try_join!(
			self.entity_options(person),
			self.entity_options(org),
			self.entity_options(location),
			self.topic_options(),
		)?;
		let entities = EntityCategory::ALL
			.into_iter()
			.zip([persons, orgs, locations])
			.flat_map(|(category, labels)| {
				labels.into_iter().map(move |label| EntityOption { label, category })
			})
			.collect();

		Ok(LookupOptions { entities, topics })
	}
}
