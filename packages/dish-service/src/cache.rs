use std::{
	num::NonZeroUsize,
	sync::{Mutex, MutexGuard},
};

use lru::LruCache;

use dish_config::EmbeddingProviderConfig;

const EMBEDDING_CACHE_SCHEMA_VERSION: i32 = 1;

/// Bounded map from query text to its embedding. A zero capacity disables caching.
pub(crate) struct EmbeddingCache {
	entries: Option<Mutex<LruCache<String, Vec<f32>>>>,
}
impl EmbeddingCache {
	pub(crate) fn new(capacity: u32) -> Self {
		let entries = usize::try_from(capacity)
			.ok()
			.and_then(NonZeroUsize::new)
			.map(|capacity| Mutex::new(LruCache::new(capacity)));

		Self { entries }
	}

	pub(crate) fn get(&self, key: &str) -> Option<Vec<f32>> {
		let entries = self.entries.as_ref()?;

		lock(entries).get(key).cloned()
	}

	pub(crate) fn insert(&self, key: String, vector: Vec<f32>) {
		if let Some(entries) = self.entries.as_ref() {
			lock(entries).put(key, vector);
		}
	}
}

pub(crate) fn embedding_cache_key(cfg: &EmbeddingProviderConfig, text: &str) -> String {
	let payload = serde_json::json!({
		"kind": "embedding",
		"schema_version": EMBEDDING_CACHE_SCHEMA_VERSION,
		"provider_id": cfg.provider_id,
		"model": cfg.model,
		"dimensions": cfg.dimensions,
		"text": text.trim(),
	});

	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}

pub(crate) fn cache_key_prefix(key: &str) -> &str {
	&key[..key.len().min(12)]
}

// A panic while holding the lock leaves the map itself intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn evicts_least_recently_used() {
		let cache = EmbeddingCache::new(2);

		cache.insert("a".to_string(), vec![1.0]);
		cache.insert("b".to_string(), vec![2.0]);

		assert_eq!(cache.get("a"), Some(vec![1.0]));

		cache.insert("c".to_string(), vec![3.0]);

		assert_eq!(cache.get("b"), None);
		assert_eq!(cache.get("a"), Some(vec![1.0]));
		assert_eq!(cache.get("c"), Some(vec![3.0]));
	}

	#[test]
	fn zero_capacity_disables_cache() {
		let cache = EmbeddingCache::new(0);

		cache.insert("a".to_string(), vec![1.0]);

		assert_eq!(cache.get("a"), None);
	}
}
