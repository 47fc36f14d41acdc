use crate::{RecipeService, RecommendRequest, Result};
use dish_domain::RankedResult;

impl RecipeService {
	/// Recipes close to `recipe_id`, searched by its title without filter extraction.
	///
	/// An unknown id yields no results. `None` uses the configured result limit.
	pub async fn similar_recipes(
		&self,
		recipe_id: &str,
		limit: Option<u32>,
	) -> Result<Vec<RankedResult>> {
		let Some(recipe) = self.store.fetch_recipe(recipe_id).await? else {
			tracing::warn!(recipe_id, "Recipe not found for similar search.");

			return Ok(Vec::new());
		};
		let req = RecommendRequest {
			query: recipe.title,
			carried_filters: None,
			limit,
			skip_filter_extraction: true,
		};

		Ok(self.recommend(req).await?.results)
	}
}
