//! Query embeddings for recipe search.
//!
//! Vectors are compared against the catalog's stored recipe embeddings, so every vector must
//! have exactly the configured number of dimensions.

use color_eyre::{Result, eyre};
use serde::Deserialize;

use crate::JsonEndpoint;
use dish_config::EmbeddingProviderConfig;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
	index: Option<usize>,
	embedding: Vec<f32>,
}

/// Embeds each recipe query, returning vectors in input order.
pub async fn embed(cfg: &EmbeddingProviderConfig, queries: &[String]) -> Result<Vec<Vec<f32>>> {
	if queries.is_empty() {
		return Ok(Vec::new());
	}

	let endpoint =
		JsonEndpoint::new(&cfg.api_base, &cfg.path, &cfg.api_key, &cfg.default_headers, cfg.timeout_ms)?;
	let body = serde_json::json!({
		"model": cfg.model,
		"input": queries,
		"dimensions": cfg.dimensions,
	});
	let vectors = parse_query_vectors(endpoint.post(&body).await?, queries.len())?;

	for vector in &vectors {
		check_dimensions(vector, cfg.dimensions)?;
	}

	Ok(vectors)
}

/// A query vector is only comparable with the catalog when its length matches `dimensions`.
pub fn check_dimensions(vector: &[f32], dimensions: u32) -> Result<()> {
	if vector.len() != dimensions as usize {
		return Err(eyre::eyre!(
			"Recipe query embedding dimension mismatch: expected {dimensions}, got {}.",
			vector.len()
		));
	}

	Ok(())
}

fn parse_query_vectors(json: serde_json::Value, expected: usize) -> Result<Vec<Vec<f32>>> {
	let response: EmbeddingResponse = serde_json::from_value(json)
		.map_err(|err| eyre::eyre!("Recipe query embedding response is malformed: {err}."))?;

	if response.data.len() != expected {
		return Err(eyre::eyre!(
			"Recipe query embedding response has {} vectors for {expected} queries.",
			response.data.len()
		));
	}

	let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];

	for (position, item) in response.data.into_iter().enumerate() {
		let index = item.index.unwrap_or(position);
		let slot = slots
			.get_mut(index)
			.ok_or_else(|| eyre::eyre!("Recipe query embedding index {index} is out of range."))?;

		if slot.replace(item.embedding).is_some() {
			return Err(eyre::eyre!("Recipe query embedding index {index} appears twice."));
		}
	}

	slots
		.into_iter()
		.enumerate()
		.map(|(index, slot)| {
			slot.ok_or_else(|| eyre::eyre!("Recipe query embedding {index} is missing."))
		})
		.collect()
}
