use color_eyre::{Result, eyre};
use serde_json::Value;

use crate::JsonEndpoint;

const MAX_ATTEMPTS: usize = 3;

const SYSTEM_PROMPT: &str = "You turn recipe search requests into structured filters. \
Output must be a single JSON object and nothing else. Omit every field the request does not imply.";

const FIELD_GUIDE: &str = "\
Fields:
- dietary_tags: dietary restrictions such as vegetarian, vegan, gluten free, nut free, lactose free, sugar free, mediterranean.
- tags: meal categories, one or more of breakfast, desserts, soups, salads, mains, side dishes, drinks.
- cuisine: cuisines such as indian, italian, chinese, mexican, thai, french, japanese, greek, american, spanish.
- max_time / min_time: total time bounds in minutes. \"quick\" means max_time 30.
- difficulty: any of easy, medium, hard.
- recipe_name: dish name keywords.
- main_protein: one of chicken, beef, pork, lamb, fish, seafood, turkey, duck.
- exclude_tags: tags to exclude, used for the proteins that were not asked for.
- ingredients: ingredients that must appear.
- high_protein, low_fat, low_carb, low_calorie: true when the request asks for it.
- result_limit: how many recipes the request asks for.

Rules:
1. Dessert, cake, sweet or pastry requests never get high_protein or low_fat.
2. Nutrition requests never get dessert tags.
3. Generic recipe, lunch or dinner requests without a category get tags [\"mains\", \"soups\", \"salads\"].
4. Desserts, drinks, side dishes and breakfast are only used when named explicitly.
5. Naming one protein sets main_protein and puts the other common proteins in exclude_tags.
6. main_protein refers to the dish itself, not to incidental ingredients such as stock.
7. Dish types such as pasta, rice, pizza or curry set recipe_name and skip the default categories.";

const EXAMPLES: [(&str, &str); 16] = [
	(
		"easy vegetarian dinner under 30 minutes",
		r#"{"dietary_tags": ["vegetarian"], "tags": ["mains", "soups", "salads"], "max_time": 30, "difficulty": ["easy"]}"#,
	),
	(
		"quick vegetarian recipes, high protein and low fat",
		r#"{"dietary_tags": ["vegetarian"], "tags": ["mains", "soups", "salads"], "max_time": 30, "high_protein": true, "low_fat": true}"#,
	),
	("vegetarian desserts", r#"{"dietary_tags": ["vegetarian"], "tags": ["desserts"]}"#),
	(
		"gluten free nut free desserts",
		r#"{"dietary_tags": ["gluten free", "nut free"], "tags": ["desserts"]}"#,
	),
	("2 recipes", r#"{"tags": ["mains", "soups", "salads"], "result_limit": 2}"#),
	(
		"chicken curry",
		r#"{"recipe_name": "chicken curry", "main_protein": "chicken", "exclude_tags": ["beef", "pork", "lamb", "fish"]}"#,
	),
	("pasta recipes", r#"{"recipe_name": "pasta"}"#),
	("chocolate cake", r#"{"recipe_name": "chocolate cake", "tags": ["desserts"]}"#),
	(
		"5 easy breakfast recipes",
		r#"{"tags": ["breakfast"], "difficulty": ["easy"], "result_limit": 5}"#,
	),
	(
		"vegan low carb meals",
		r#"{"dietary_tags": ["vegan"], "tags": ["mains", "soups", "salads"], "low_carb": true}"#,
	),
	(
		"beef stew under 60 minutes",
		r#"{"tags": ["mains", "soups", "salads"], "main_protein": "beef", "exclude_tags": ["chicken", "pork", "lamb", "fish"], "max_time": 60}"#,
	),
	("lunch recipe", r#"{"tags": ["mains", "soups", "salads"]}"#),
	("quick dinner ideas", r#"{"tags": ["mains", "soups", "salads"], "max_time": 30}"#),
	(
		"easy italian pasta",
		r#"{"cuisine": ["italian"], "recipe_name": "pasta", "tags": ["mains"], "difficulty": ["easy"]}"#,
	),
	(
		"best chicken recipes",
		r#"{"main_protein": "chicken", "exclude_tags": ["beef", "pork", "lamb", "fish"], "tags": ["mains", "soups", "salads"]}"#,
	),
	(
		"top rated vegetarian meals",
		r#"{"dietary_tags": ["vegetarian"], "tags": ["mains", "soups", "salads"]}"#,
	),
];

/// Asks the chat model for the filters implied by `query` and returns the raw JSON object.
pub async fn extract_filters(cfg: &dish_config::LlmProviderConfig, query: &str) -> Result<Value> {
	let endpoint =
		JsonEndpoint::new(&cfg.api_base, &cfg.path, &cfg.api_key, &cfg.default_headers, cfg.timeout_ms)?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": build_filter_messages(query),
	});

	for attempt in 1..=MAX_ATTEMPTS {
		match parse_extractor_json(endpoint.post(&body).await?) {
			Ok(parsed) => return Ok(parsed),
			Err(err) => tracing::debug!(attempt, error = %err, "Discarding unusable filter reply."),
		}
	}

	Err(eyre::eyre!("Extractor response is not valid JSON."))
}

pub fn build_filter_messages(query: &str) -> Vec<Value> {
	let mut examples = String::new();

	for (example_query, response) in EXAMPLES {
		examples.push_str(&format!("Query: {example_query}\nResponse: {response}\n\n"));
	}

	let user_prompt =
		format!("{FIELD_GUIDE}\n\nExamples:\n{examples}Extract filters for this query:\n{query}");

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

fn parse_extractor_json(json: Value) -> Result<Value> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| eyre::eyre!("Extractor response is missing JSON content."))?;
	let parsed: Value = serde_json::from_str(strip_code_fence(content))
		.map_err(|_| eyre::eyre!("Extractor content is not valid JSON."))?;

	if !parsed.is_object() {
		return Err(eyre::eyre!("Extractor content must be a JSON object."));
	}

	Ok(parsed)
}

fn strip_code_fence(content: &str) -> &str {
	let mut text = content.trim();

	if let Some(rest) = text.strip_prefix("```json") {
		text = rest;
	} else if let Some(rest) = text.strip_prefix("```") {
		text = rest;
	}
	if let Some(rest) = text.strip_suffix("```") {
		text = rest;
	}

	text.trim()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn completion(content: &str) -> Value {
		serde_json::json!({ "choices": [{ "message": { "content": content } }] })
	}

	#[test]
	fn parses_choice_content_json() {
		let parsed =
			parse_extractor_json(completion("{\"max_time\": 20}")).expect("parse failed");

		assert_eq!(parsed.get("max_time").and_then(Value::as_u64), Some(20));
	}

	#[test]
	fn strips_markdown_fences() {
		let parsed = parse_extractor_json(completion("```json\n{\"tags\": [\"desserts\"]}\n```"))
			.expect("parse failed");

		assert!(parsed.get("tags").is_some());
		assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
	}

	#[test]
	fn rejects_prose_and_non_objects() {
		assert!(parse_extractor_json(completion("Sure! Here are your filters.")).is_err());
		assert!(parse_extractor_json(completion("[1, 2]")).is_err());
		assert!(parse_extractor_json(serde_json::json!({ "tags": ["mains"] })).is_err());
	}

	#[test]
	fn prompt_ends_with_the_query() {
		let messages = build_filter_messages("vegan tacos");
		let user = messages[1].get("content").and_then(Value::as_str).expect("missing content");

		assert_eq!(messages.len(), 2);
		assert!(user.ends_with("vegan tacos"));
		assert!(user.contains("Query: chicken curry"));
	}
}
