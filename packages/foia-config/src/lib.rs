mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Corpus, Postgres, Search, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.corpus.max_entity_id <= 0 {
		return Err(Error::Validation {
			message: "corpus.max_entity_id must be greater than zero.".to_string(),
		});
	}
	if cfg.corpus.default_start_date > cfg.corpus.default_end_date {
		return Err(Error::Validation {
			message: "corpus.default_start_date must not be after corpus.default_end_date."
				.to_string(),
		});
	}
	if cfg.search.query_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.query_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("search.max_selected_entities", cfg.search.max_selected_entities),
		("search.max_selected_topics", cfg.search.max_selected_topics),
		("search.max_full_text_chars", cfg.search.max_full_text_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
}
