mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Ranking,
	Search, SearchPriority, Service, Session, Storage,
};

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
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
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
	if cfg.storage.catalog.compatibility_version.is_empty() {
		return Err(Error::Validation {
			message: "storage.catalog.compatibility_version must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("llm_extractor", &cfg.providers.llm_extractor.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if !cfg.providers.llm_extractor.temperature.is_finite()
		|| cfg.providers.llm_extractor.temperature < 0.0
	{
		return Err(Error::Validation {
			message: "providers.llm_extractor.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}
	if cfg.search.result_limit == 0 {
		return Err(Error::Validation {
			message: "search.result_limit must be greater than zero.".to_string(),
		});
	}

	let priority = &cfg.search.priority;

	if !(0.0..=5.0).contains(&priority.min_rating) {
		return Err(Error::Validation {
			message: "search.priority.min_rating must be in the range 0.0-5.0.".to_string(),
		});
	}
	if priority.overfetch_factor == 0 {
		return Err(Error::Validation {
			message: "search.priority.overfetch_factor must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("ranking.similarity_weight", cfg.ranking.similarity_weight),
		("ranking.rating_weight", cfg.ranking.rating_weight),
		("ranking.rating_count_weight", cfg.ranking.rating_count_weight),
		("ranking.priority_similarity_weight", cfg.ranking.priority_similarity_weight),
		("ranking.priority_rating_weight", cfg.ranking.priority_rating_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if !(0.0..=5.0).contains(&cfg.ranking.default_global_rating) {
		return Err(Error::Validation {
			message: "ranking.default_global_rating must be in the range 0.0-5.0.".to_string(),
		});
	}
	if cfg.ranking.default_confidence_threshold == 0 {
		return Err(Error::Validation {
			message: "ranking.default_confidence_threshold must be greater than zero.".to_string(),
		});
	}
	if cfg.session.memory_size == 0 {
		return Err(Error::Validation {
			message: "session.memory_size must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.storage.catalog.compatibility_version =
		cfg.storage.catalog.compatibility_version.trim().to_string();

	for base in [&mut cfg.providers.embedding.api_base, &mut cfg.providers.llm_extractor.api_base] {
		while base.ends_with('/') {
			base.pop();
		}
	}
}
