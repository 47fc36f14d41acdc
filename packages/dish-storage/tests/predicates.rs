use dish_domain::{FilterRecord, filter::TagSet};
use dish_storage::queries::{self, VectorSearch};

fn set(values: &[&str]) -> Option<TagSet> {
	Some(values.iter().map(|value| value.to_string()).collect())
}

fn render(filters: &FilterRecord) -> String {
	let embedding = [0.1, 0.2, 0.3];
	let args = VectorSearch { embedding: &embedding, filters, compatibility_version: "TM6", limit: 50 };

	queries::build_vector_search(&args).sql().to_string()
}

#[test]
fn unfiltered_search_only_restricts_version() {
	let sql = render(&FilterRecord::default());

	assert!(sql.contains("r.embedding IS NOT NULL"));
	assert!(sql.contains("FROM recipe_thermomix_versions rtv"));
	assert!(sql.contains("rtv.version = $2"));
	assert!(sql.contains("ORDER BY r.embedding <=> $3::text::vector, r.recipe_id"));
	assert!(sql.ends_with("LIMIT $4"));
	assert!(!sql.contains("recipe_tags"));
	assert!(!sql.contains("ILIKE"));
}

#[test]
fn tag_sets_use_membership_subqueries() {
	let filters = FilterRecord {
		dietary_tags: set(&["vegetarian"]),
		tags: set(&["mains", "soups"]),
		exclude_tags: set(&["beef"]),
		..Default::default()
	};
	let sql = render(&filters);

	assert!(sql.contains("FROM recipe_dietary_tags WHERE dietary_tag = ANY($3)"));
	assert!(sql.contains("r.recipe_id IN (SELECT recipe_id FROM recipe_tags WHERE tag = ANY($4))"));
	assert!(
		sql.contains("r.recipe_id NOT IN (SELECT recipe_id FROM recipe_tags WHERE tag = ANY($5))")
	);
}

#[test]
fn empty_sets_add_no_predicate() {
	let filters = FilterRecord { tags: Some(TagSet::new()), ..Default::default() };

	assert!(!render(&filters).contains("recipe_tags"));
}

#[test]
fn main_protein_matches_title_or_tag() {
	let filters = FilterRecord { main_protein: Some("chicken".to_string()), ..Default::default() };
	let sql = render(&filters);

	assert!(sql.contains("AND (r.title ILIKE $3 OR r.recipe_id IN"));
	assert!(sql.contains("WHERE tag = $4))"));
}

#[test]
fn every_ingredient_must_be_present() {
	let filters = FilterRecord { ingredients: set(&["garlic", "spinach"]), ..Default::default() };
	let sql = render(&filters);

	assert_eq!(sql.matches("FROM recipe_ingredients WHERE ingredient ILIKE").count(), 2);
}

#[test]
fn nutrition_flags_only_apply_when_true() {
	let filters = FilterRecord {
		high_protein: Some(true),
		low_fat: Some(false),
		low_calorie: Some(true),
		..Default::default()
	};
	let sql = render(&filters);

	assert!(sql.contains("r.nutrition_protein_g > "));
	assert!(sql.contains("r.nutrition_calories_kcal < "));
	assert!(!sql.contains("r.nutrition_fat_g < "));
	assert!(!sql.contains("r.nutrition_carbs_g < "));
}

#[test]
fn scalar_bounds_are_rendered() {
	let filters = FilterRecord {
		max_time: Some(30),
		min_time: Some(10),
		difficulty: set(&["easy"]),
		recipe_name: Some("curry".to_string()),
		min_rating: Some(4.0),
		min_rating_count: Some(10),
		..Default::default()
	};
	let sql = render(&filters);

	assert!(sql.contains("r.total_time_minutes <= $3"));
	assert!(sql.contains("r.total_time_minutes >= $4"));
	assert!(sql.contains("lower(r.difficulty) = ANY($5)"));
	assert!(sql.contains("r.title ILIKE $6"));
	assert!(sql.contains("r.rating >= $7"));
	assert!(sql.contains("r.rating_count >= $8"));
	assert!(sql.ends_with("LIMIT $10"));
}
