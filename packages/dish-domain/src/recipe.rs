use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
	pub calories_kcal: Option<f32>,
	pub protein_g: Option<f32>,
	pub carbs_g: Option<f32>,
	pub fat_g: Option<f32>,
}

/// One recipe returned by vector search, before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
	pub recipe_id: String,
	pub title: String,
	pub url: String,
	pub image_url: Option<String>,
	pub prep_time_minutes: Option<i32>,
	pub cook_time_minutes: Option<i32>,
	pub total_time_minutes: Option<i32>,
	pub servings: Option<String>,
	pub difficulty: Option<String>,
	pub nutrition: Nutrition,
	/// Average review score on a 0-5 scale. Unrated recipes carry 0.
	pub rating: f32,
	pub rating_count: u32,
	/// Cosine-style similarity to the query, 1.0 meaning identical.
	pub similarity_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
	#[serde(flatten)]
	pub candidate: Candidate,
	/// Smoothed rating on the same 0-5 scale as `rating`.
	pub bayesian_rating: f32,
	pub rank_score: f32,
}
