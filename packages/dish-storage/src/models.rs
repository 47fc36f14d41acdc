use dish_domain::{Candidate, Nutrition};

#[derive(Debug, sqlx::FromRow)]
pub struct RecipeRow {
	pub recipe_id: String,
	pub title: String,
	pub url: String,
	pub image_url: Option<String>,
	pub prep_time_minutes: Option<i32>,
	pub cook_time_minutes: Option<i32>,
	pub total_time_minutes: Option<i32>,
	pub servings: Option<String>,
	pub difficulty: Option<String>,
	pub nutrition_calories_kcal: Option<f32>,
	pub nutrition_protein_g: Option<f32>,
	pub nutrition_carbs_g: Option<f32>,
	pub nutrition_fat_g: Option<f32>,
	pub rating: Option<f32>,
	pub rating_count: Option<i32>,
	/// Absent for direct lookups that are not scored against a query.
	pub similarity_score: Option<f32>,
}
impl RecipeRow {
	pub fn into_candidate(self) -> Candidate {
		Candidate {
			recipe_id: self.recipe_id,
			title: self.title,
			url: self.url,
			image_url: self.image_url,
			prep_time_minutes: self.prep_time_minutes,
			cook_time_minutes: self.cook_time_minutes,
			total_time_minutes: self.total_time_minutes,
			servings: self.servings,
			difficulty: self.difficulty,
			nutrition: Nutrition {
				calories_kcal: self.nutrition_calories_kcal,
				protein_g: self.nutrition_protein_g,
				carbs_g: self.nutrition_carbs_g,
				fat_g: self.nutrition_fat_g,
			},
			rating: self.rating.filter(|rating| rating.is_finite()).unwrap_or(0.0).clamp(0.0, 5.0),
			rating_count: self.rating_count.and_then(|count| u32::try_from(count).ok()).unwrap_or(0),
			similarity_score: self
				.similarity_score
				.filter(|score| score.is_finite())
				.unwrap_or(0.0)
				.clamp(0.0, 1.0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row() -> RecipeRow {
		RecipeRow {
			recipe_id: "r-1".to_string(),
			title: "Lentil soup".to_string(),
			url: "https://example.com/r-1".to_string(),
			image_url: None,
			prep_time_minutes: Some(10),
			cook_time_minutes: Some(25),
			total_time_minutes: Some(35),
			servings: Some("4".to_string()),
			difficulty: Some("easy".to_string()),
			nutrition_calories_kcal: Some(280.0),
			nutrition_protein_g: None,
			nutrition_carbs_g: None,
			nutrition_fat_g: None,
			rating: None,
			rating_count: Some(-3),
			similarity_score: Some(1.2),
		}
	}

	#[test]
	fn missing_and_invalid_values_become_neutral() {
		let candidate = row().into_candidate();

		assert_eq!(candidate.rating, 0.0);
		assert_eq!(candidate.rating_count, 0);
		assert_eq!(candidate.similarity_score, 1.0);
		assert_eq!(candidate.nutrition.calories_kcal, Some(280.0));
	}
}
