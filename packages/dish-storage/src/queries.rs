use sqlx::{Postgres, QueryBuilder};

use crate::{Error, Result, db::Db, models::RecipeRow};
use dish_domain::{Candidate, FilterRecord, filter::TagSet};

pub const HIGH_PROTEIN_MIN_G: f32 = 20.0;
pub const LOW_FAT_MAX_G: f32 = 10.0;
pub const LOW_CARB_MAX_G: f32 = 30.0;
pub const LOW_CALORIE_MAX_KCAL: f32 = 300.0;

const RECIPE_COLUMNS: &str = "\
	r.recipe_id::text AS recipe_id,
	r.title,
	r.url,
	r.image_url,
	r.prep_time_minutes::int4 AS prep_time_minutes,
	r.cook_time_minutes::int4 AS cook_time_minutes,
	r.total_time_minutes::int4 AS total_time_minutes,
	r.servings::text AS servings,
	r.difficulty,
	r.nutrition_calories_kcal::real AS nutrition_calories_kcal,
	r.nutrition_protein_g::real AS nutrition_protein_g,
	r.nutrition_carbs_g::real AS nutrition_carbs_g,
	r.nutrition_fat_g::real AS nutrition_fat_g,
	r.rating::real AS rating,
	r.rating_count::int4 AS rating_count";

pub struct VectorSearch<'a> {
	pub embedding: &'a [f32],
	pub filters: &'a FilterRecord,
	pub compatibility_version: &'a str,
	pub limit: u32,
}

/// Nearest recipes to `embedding` that satisfy every filter predicate, closest first.
pub async fn vector_search(db: &Db, args: VectorSearch<'_>) -> Result<Vec<Candidate>> {
	if args.embedding.is_empty() {
		return Err(Error::InvalidArgument("Query embedding must be non-empty.".to_string()));
	}
	if args.limit == 0 {
		return Ok(Vec::new());
	}

	let mut builder = build_vector_search(&args);
	let rows: Vec<RecipeRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	tracing::debug!(rows = rows.len(), limit = args.limit, "Vector search finished.");

	Ok(rows.into_iter().map(RecipeRow::into_candidate).collect())
}

pub async fn fetch_recipe(db: &Db, recipe_id: &str) -> Result<Option<Candidate>> {
	let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new("SELECT ");

	builder.push(RECIPE_COLUMNS);
	builder.push(",\n\tNULL::real AS similarity_score\nFROM recipes r\nWHERE r.recipe_id::text = ");
	builder.push_bind(recipe_id.to_string());

	let row: Option<RecipeRow> = builder.build_query_as().fetch_optional(&db.pool).await?;

	Ok(row.map(RecipeRow::into_candidate))
}

pub fn build_vector_search(args: &VectorSearch<'_>) -> QueryBuilder<'static, Postgres> {
	let vector = vector_to_pg(args.embedding);
	let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new("SELECT ");

	builder.push(RECIPE_COLUMNS);
	builder.push(",\n\tGREATEST(0, 1 - (r.embedding <=> ");
	builder.push_bind(vector.clone());
	builder.push("::text::vector))::real AS similarity_score\nFROM recipes r\nWHERE r.embedding IS NOT NULL");
	builder.push(
		"\n\tAND EXISTS (SELECT 1 FROM recipe_thermomix_versions rtv WHERE rtv.recipe_id = r.recipe_id AND rtv.version = ",
	);
	builder.push_bind(args.compatibility_version.to_string());
	builder.push(")");

	push_filter_predicates(&mut builder, args.filters);

	builder.push("\nORDER BY r.embedding <=> ");
	builder.push_bind(vector);
	builder.push("::text::vector, r.recipe_id\nLIMIT ");
	builder.push_bind(i64::from(args.limit));

	builder
}

pub fn push_filter_predicates(builder: &mut QueryBuilder<'static, Postgres>, filters: &FilterRecord) {
	if let Some(values) = non_empty(&filters.dietary_tags) {
		builder.push(
			"\n\tAND r.recipe_id IN (SELECT recipe_id FROM recipe_dietary_tags WHERE dietary_tag = ANY(",
		);
		builder.push_bind(values);
		builder.push("))");
	}
	if let Some(values) = non_empty(&filters.tags) {
		push_tag_membership(builder, "IN", values);
	}
	if let Some(values) = non_empty(&filters.cuisine) {
		push_tag_membership(builder, "IN", values);
	}
	if let Some(values) = non_empty(&filters.exclude_tags) {
		push_tag_membership(builder, "NOT IN", values);
	}
	if let Some(protein) = filters.main_protein.as_deref() {
		builder.push("\n\tAND (r.title ILIKE ");
		builder.push_bind(contains_pattern(protein));
		builder.push(" OR r.recipe_id IN (SELECT recipe_id FROM recipe_tags WHERE tag = ");
		builder.push_bind(protein.to_string());
		builder.push("))");
	}
	if let Some(max_time) = filters.max_time {
		builder.push("\n\tAND r.total_time_minutes <= ");
		builder.push_bind(i64::from(max_time));
	}
	if let Some(min_time) = filters.min_time {
		builder.push("\n\tAND r.total_time_minutes >= ");
		builder.push_bind(i64::from(min_time));
	}
	if let Some(values) = non_empty(&filters.difficulty) {
		builder.push("\n\tAND lower(r.difficulty) = ANY(");
		builder.push_bind(values);
		builder.push(")");
	}
	if let Some(name) = filters.recipe_name.as_deref() {
		builder.push("\n\tAND r.title ILIKE ");
		builder.push_bind(contains_pattern(name));
	}
	if let Some(ingredients) = filters.ingredients.as_ref() {
		for ingredient in ingredients {
			builder.push(
				"\n\tAND r.recipe_id IN (SELECT recipe_id FROM recipe_ingredients WHERE ingredient ILIKE ",
			);
			builder.push_bind(contains_pattern(ingredient));
			builder.push(")");
		}
	}

	for (flag, predicate, bound) in [
		(filters.high_protein, "\n\tAND r.nutrition_protein_g > ", HIGH_PROTEIN_MIN_G),
		(filters.low_fat, "\n\tAND r.nutrition_fat_g < ", LOW_FAT_MAX_G),
		(filters.low_carb, "\n\tAND r.nutrition_carbs_g < ", LOW_CARB_MAX_G),
		(filters.low_calorie, "\n\tAND r.nutrition_calories_kcal < ", LOW_CALORIE_MAX_KCAL),
	] {
		if flag == Some(true) {
			builder.push(predicate);
			builder.push_bind(bound);
		}
	}

	if let Some(min_rating) = filters.min_rating {
		builder.push("\n\tAND r.rating >= ");
		builder.push_bind(min_rating);
	}
	if let Some(min_count) = filters.min_rating_count {
		builder.push("\n\tAND r.rating_count >= ");
		builder.push_bind(i64::from(min_count));
	}
}

pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

/// `%text%` with LIKE metacharacters escaped.
pub fn contains_pattern(text: &str) -> String {
	let mut out = String::with_capacity(text.len() + 2);

	out.push('%');

	for ch in text.trim().chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('%');

	out
}

fn push_tag_membership(
	builder: &mut QueryBuilder<'static, Postgres>,
	operator: &str,
	values: Vec<String>,
) {
	builder.push(format!(
		"\n\tAND r.recipe_id {operator} (SELECT recipe_id FROM recipe_tags WHERE tag = ANY("
	));
	builder.push_bind(values);
	builder.push("))");
}

fn non_empty(set: &Option<TagSet>) -> Option<Vec<String>> {
	set.as_ref().filter(|values| !values.is_empty()).map(|values| values.iter().cloned().collect())
}
