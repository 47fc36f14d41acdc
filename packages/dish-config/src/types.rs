use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub session: Session,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	#[serde(default)]
	pub catalog: Catalog,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Catalog {
	/// Every search is restricted to recipes tagged with this appliance version.
	pub compatibility_version: String,
}
impl Default for Catalog {
	fn default() -> Self {
		Self { compatibility_version: "TM6".to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm_extractor: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub result_limit: u32,
	/// Zero disables the query embedding cache.
	pub embedding_cache_size: u32,
	pub priority: SearchPriority,
}
impl Default for Search {
	fn default() -> Self {
		Self { result_limit: 10, embedding_cache_size: 128, priority: SearchPriority::default() }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchPriority {
	pub min_rating: f32,
	pub min_rating_count: u32,
	pub overfetch_factor: u32,
	pub min_pool: u32,
}
impl Default for SearchPriority {
	fn default() -> Self {
		Self { min_rating: 4.0, min_rating_count: 10, overfetch_factor: 50, min_pool: 50 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub similarity_weight: f32,
	pub rating_weight: f32,
	pub rating_count_weight: f32,
	pub priority_similarity_weight: f32,
	pub priority_rating_weight: f32,
	pub default_global_rating: f32,
	pub default_confidence_threshold: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			similarity_weight: 0.6,
			rating_weight: 0.3,
			rating_count_weight: 0.1,
			priority_similarity_weight: 0.2,
			priority_rating_weight: 0.8,
			default_global_rating: 3.0,
			default_confidence_threshold: 5,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Session {
	pub memory_size: u32,
}
impl Default for Session {
	fn default() -> Self {
		Self { memory_size: 10 }
	}
}
