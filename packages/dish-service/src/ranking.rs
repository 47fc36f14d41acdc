//! Blends query similarity with a Bayesian-smoothed rating.
//!
//! The smoothed rating pulls each recipe's average towards the rating of the whole candidate
//! pool, weighted by how many reviews the recipe has relative to a confidence threshold taken
//! from the pool's own review counts.

use dish_config::Ranking;
use dish_domain::{Candidate, RankedResult};

const MAX_RATING: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
	pub similarity: f32,
	pub rating: f32,
}
impl RankWeights {
	pub fn resolve(cfg: &Ranking, prioritize_ratings: bool) -> Self {
		if prioritize_ratings {
			Self { similarity: cfg.priority_similarity_weight, rating: cfg.priority_rating_weight }
		} else {
			Self {
				similarity: cfg.similarity_weight,
				rating: cfg.rating_weight + cfg.rating_count_weight,
			}
		}
	}
}

/// Scores and orders `candidates`, best first. Ties keep their search order.
pub fn rank(cfg: &Ranking, candidates: Vec<Candidate>, prioritize_ratings: bool) -> Vec<RankedResult> {
	if candidates.is_empty() {
		return Vec::new();
	}

	let weights = RankWeights::resolve(cfg, prioritize_ratings);
	let global_avg = global_average_rating(&candidates, cfg.default_global_rating);
	let threshold = confidence_threshold(&candidates, cfg.default_confidence_threshold);
	let mut ranked: Vec<RankedResult> = candidates
		.into_iter()
		.map(|candidate| {
			let bayesian_rating =
				bayesian_rating(candidate.rating, candidate.rating_count, global_avg, threshold);
			let rank_score = candidate.similarity_score * weights.similarity
				+ (bayesian_rating / MAX_RATING) * weights.rating;

			RankedResult { candidate, bayesian_rating, rank_score }
		})
		.collect();

	ranked.sort_by(|a, b| b.rank_score.total_cmp(&a.rank_score));

	tracing::debug!(
		candidates = ranked.len(),
		prioritize_ratings,
		global_avg,
		confidence_threshold = threshold,
		"Ranked candidates."
	);

	ranked
}

/// Review-count weighted mean rating, or `fallback` when nobody has reviewed anything.
pub fn global_average_rating(candidates: &[Candidate], fallback: f32) -> f32 {
	let (weighted, total) = candidates.iter().fold((0.0_f64, 0_u64), |(weighted, total), c| {
		(weighted + f64::from(c.rating) * f64::from(c.rating_count), total + u64::from(c.rating_count))
	});

	if total == 0 {
		return fallback;
	}

	(weighted / total as f64) as f32
}

/// The review count at index `floor(n / 10)` of the ascending non-zero counts.
pub fn confidence_threshold(candidates: &[Candidate], fallback: u32) -> u32 {
	let mut counts: Vec<u32> =
		candidates.iter().map(|c| c.rating_count).filter(|count| *count > 0).collect();

	if counts.is_empty() {
		return fallback;
	}

	counts.sort_unstable();

	counts[counts.len() / 10]
}

pub fn bayesian_rating(rating: f32, rating_count: u32, global_avg: f32, threshold: u32) -> f32 {
	if rating_count == 0 {
		return global_avg;
	}

	let c = f64::from(threshold);
	let n = f64::from(rating_count);

	((c * f64::from(global_avg) + f64::from(rating) * n) / (c + n)) as f32
}
