use serde::Serialize;

use crate::{
	Error, RecipeService, Result,
	cache::{cache_key_prefix, embedding_cache_key},
	ranking,
};
use dish_domain::{FilterRecord, RankedResult, keywords};
use dish_providers::embedding;
use dish_storage::queries::VectorSearch;

#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
	pub query: String,
	/// Filters of the turn this query refines.
	pub carried_filters: Option<FilterRecord>,
	/// Overrides any count mentioned in the query and the configured default.
	pub limit: Option<u32>,
	/// Plain similarity search: no extracted filters and no rating priority.
	pub skip_filter_extraction: bool,
}
impl RecommendRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: query.into(), ..Default::default() }
	}

	pub fn refining(mut self, filters: FilterRecord) -> Self {
		self.carried_filters = Some(filters);

		self
	}

	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
	pub results: Vec<RankedResult>,
	/// Effective filters without `result_limit`. Carry these into a refinement.
	pub filters: FilterRecord,
	pub prioritized: bool,
	pub requested_limit: u32,
	pub search_limit: u32,
}

impl RecipeService {
	pub async fn recommend(&self, req: RecommendRequest) -> Result<RecommendResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "Query must be non-empty.".to_string() });
		}
		if req.limit == Some(0) {
			return Err(Error::InvalidRequest {
				message: "Result limit must be greater than zero.".to_string(),
			});
		}

		let prioritized =
			!req.skip_filter_extraction && keywords::should_prioritize_ratings(query);
		let extraction = async {
			if req.skip_filter_extraction {
				FilterRecord::default()
			} else {
				self.extract_filters(query).await
			}
		};
		let (mut extracted, embedding) = tokio::join!(extraction, self.embed_query(query));
		let embedding = embedding?;

		if prioritized && extracted.min_rating.is_none() {
			let priority = &self.cfg.search.priority;

			extracted.min_rating = Some(priority.min_rating);
			extracted.min_rating_count.get_or_insert(priority.min_rating_count);
		}

		let mut filters = match req.carried_filters.as_ref() {
			Some(carried) => FilterRecord::merge(Some(carried), &extracted),
			None => extracted,
		};
		let extracted_limit = filters.take_result_limit().filter(|limit| *limit > 0);
		let requested_limit = req.limit.or(extracted_limit).unwrap_or(self.cfg.search.result_limit);
		let search_limit = self.search_limit(requested_limit, prioritized);
		let candidates = self
			.store
			.search(VectorSearch {
				embedding: &embedding,
				filters: &filters,
				compatibility_version: &self.cfg.storage.catalog.compatibility_version,
				limit: search_limit,
			})
			.await?;
		let candidate_count = candidates.len();
		let mut results = ranking::rank(&self.cfg.ranking, candidates, prioritized);

		if prioritized {
			results.truncate(requested_limit as usize);
		}

		tracing::info!(
			query,
			prioritized,
			refined = req.carried_filters.is_some(),
			requested_limit,
			search_limit,
			candidates = candidate_count,
			results = results.len(),
			"Recommendation finished."
		);

		Ok(RecommendResponse { results, filters, prioritized, requested_limit, search_limit })
	}

	fn search_limit(&self, requested_limit: u32, prioritized: bool) -> u32 {
		if !prioritized {
			return requested_limit;
		}

		let priority = &self.cfg.search.priority;

		requested_limit.saturating_mul(priority.overfetch_factor).max(priority.min_pool)
	}

	/// Never fails: an unavailable or confused extractor means "no filters".
	async fn extract_filters(&self, query: &str) -> FilterRecord {
		match self.providers.extractor.extract(&self.cfg.providers.llm_extractor, query).await {
			Ok(raw) => {
				let filters = FilterRecord::from_value(&raw);

				tracing::debug!(?filters, "Extracted filters.");

				filters
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					"Filter extraction failed. Falling back to similarity search only."
				);

				FilterRecord::default()
			},
		}
	}

	pub(crate) async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let key = embedding_cache_key(cfg, text);

		if let Some(vector) = self.embedding_cache.get(&key) {
			tracing::debug!(cache_key_prefix = cache_key_prefix(&key), "Embedding cache hit.");

			return Ok(vector);
		}

		let embeddings = self.providers.embedding.embed(cfg, &[text.to_string()]).await?;
		let Some(vector) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		embedding::check_dimensions(&vector, cfg.dimensions)?;

		self.embedding_cache.insert(key, vector.clone());

		Ok(vector)
	}
}
