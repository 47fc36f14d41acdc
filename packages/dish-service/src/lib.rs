pub mod conversation;
pub mod ranking;
pub mod recommend;
pub mod similar;

mod cache;
mod error;

pub use conversation::{Conversation, TurnOutcome};
pub use error::{Error, Result};
pub use recommend::{RecommendRequest, RecommendResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use cache::EmbeddingCache;
use dish_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use dish_domain::Candidate;
use dish_providers::{embedding, extractor};
use dish_storage::{
	db::Db,
	queries::{self, VectorSearch},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait ExtractorProvider
where
	Self: Send + Sync,
{
	/// Returns the raw filter object the model produced for `query`.
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

/// Recipe catalog backing the search stage.
pub trait RecipeStore
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, args: VectorSearch<'a>) -> BoxFuture<'a, Result<Vec<Candidate>>>;

	fn fetch_recipe<'a>(&'a self, recipe_id: &'a str) -> BoxFuture<'a, Result<Option<Candidate>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub extractor: Arc<dyn ExtractorProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		extractor: Arc<dyn ExtractorProvider>,
	) -> Self {
		Self { embedding, extractor }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), extractor: provider }
	}
}

pub struct PgRecipeStore {
	pub db: Db,
}
impl RecipeStore for PgRecipeStore {
	fn search<'a>(&'a self, args: VectorSearch<'a>) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move { Ok(queries::vector_search(&self.db, args).await?) })
	}

	fn fetch_recipe<'a>(&'a self, recipe_id: &'a str) -> BoxFuture<'a, Result<Option<Candidate>>> {
		Box::pin(async move { Ok(queries::fetch_recipe(&self.db, recipe_id).await?) })
	}
}

/// The recommendation pipeline. Shareable across conversations behind an `Arc`.
pub struct RecipeService {
	pub cfg: Config,
	pub store: Arc<dyn RecipeStore>,
	pub providers: Providers,
	embedding_cache: EmbeddingCache,
}
impl RecipeService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, Arc::new(PgRecipeStore { db }), Providers::default())
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn RecipeStore>, providers: Providers) -> Self {
		let embedding_cache = EmbeddingCache::new(cfg.search.embedding_cache_size);

		Self { cfg, store, providers, embedding_cache }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl ExtractorProvider for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(extractor::extract_filters(cfg, query))
	}
}
