//! Canonical search constraints and the rules for carrying them across conversation turns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type TagSet = BTreeSet<String>;

/// Structured constraints extracted from one utterance or accumulated over a conversation.
///
/// Every field is optional. `None` means "not mentioned", which is different from an empty set
/// or from an explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRecord {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dietary_tags: Option<TagSet>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<TagSet>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cuisine: Option<TagSet>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_time: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_time: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub difficulty: Option<TagSet>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recipe_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub main_protein: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exclude_tags: Option<TagSet>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ingredients: Option<TagSet>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub high_protein: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub low_fat: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub low_carb: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub low_calorie: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_rating: Option<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_rating_count: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result_limit: Option<u32>,
}
impl FilterRecord {
	/// Converts the loosely typed object returned by the filter extractor.
	///
	/// Never fails: non-objects become the empty record, unknown keys are ignored and values
	/// that cannot be read are dropped with a warning.
	pub fn from_value(raw: &Value) -> Self {
		let Some(object) = raw.as_object() else {
			if !raw.is_null() {
				tracing::warn!("Filter payload is not a JSON object. Using empty filters.");
			}

			return Self::default();
		};
		let mut record = Self::default();

		for (key, value) in object {
			if value.is_null() {
				continue;
			}

			let accepted = match key.as_str() {
				"dietary_tags" => assign(&mut record.dietary_tags, parse_set(value)),
				"tags" => assign(&mut record.tags, parse_set(value)),
				"cuisine" => assign(&mut record.cuisine, parse_set(value)),
				"max_time" => assign(&mut record.max_time, parse_u32(value)),
				"min_time" => assign(&mut record.min_time, parse_u32(value)),
				"difficulty" => assign(&mut record.difficulty, parse_set(value)),
				"recipe_name" => assign(&mut record.recipe_name, parse_text(value)),
				"main_protein" => assign(
					&mut record.main_protein,
					parse_text(value).map(|text| text.to_lowercase()),
				),
				"exclude_tags" => assign(&mut record.exclude_tags, parse_set(value)),
				"ingredients" => assign(&mut record.ingredients, parse_set(value)),
				"high_protein" => assign(&mut record.high_protein, parse_bool(value)),
				"low_fat" => assign(&mut record.low_fat, parse_bool(value)),
				"low_carb" => assign(&mut record.low_carb, parse_bool(value)),
				"low_calorie" => assign(&mut record.low_calorie, parse_bool(value)),
				"min_rating" => assign(&mut record.min_rating, parse_f32(value)),
				"min_rating_count" => assign(&mut record.min_rating_count, parse_u32(value)),
				"result_limit" => assign(&mut record.result_limit, parse_u32(value)),
				_ => {
					tracing::debug!(key = key.as_str(), "Ignoring unknown filter key.");

					true
				},
			};

			if !accepted {
				tracing::warn!(key = key.as_str(), %value, "Dropping unreadable filter value.");
			}
		}

		record
	}

	/// Combines carried-over filters with the filters of a newer utterance.
	///
	/// Tag, dietary and cuisine sets accumulate. Every other field present in `current` replaces
	/// the previous value. Neither input is modified.
	pub fn merge(previous: Option<&Self>, current: &Self) -> Self {
		let mut merged = previous.cloned().unwrap_or_default();

		union_into(&mut merged.dietary_tags, current.dietary_tags.as_ref());
		union_into(&mut merged.tags, current.tags.as_ref());
		union_into(&mut merged.cuisine, current.cuisine.as_ref());

		// A new protein comes with its own exclusion list; the old one is never unioned in.
		override_with(&mut merged.main_protein, &current.main_protein);
		override_with(&mut merged.exclude_tags, &current.exclude_tags);

		override_with(&mut merged.max_time, &current.max_time);
		override_with(&mut merged.min_time, &current.min_time);
		override_with(&mut merged.difficulty, &current.difficulty);
		override_with(&mut merged.recipe_name, &current.recipe_name);
		override_with(&mut merged.ingredients, &current.ingredients);
		override_with(&mut merged.high_protein, &current.high_protein);
		override_with(&mut merged.low_fat, &current.low_fat);
		override_with(&mut merged.low_carb, &current.low_carb);
		override_with(&mut merged.low_calorie, &current.low_calorie);
		override_with(&mut merged.min_rating, &current.min_rating);
		override_with(&mut merged.min_rating_count, &current.min_rating_count);
		override_with(&mut merged.result_limit, &current.result_limit);

		merged
	}

	/// Removes the requested result count, which is consumed per query and never carried over.
	pub fn take_result_limit(&mut self) -> Option<u32> {
		self.result_limit.take()
	}

	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}

fn assign<T>(slot: &mut Option<T>, parsed: Option<T>) -> bool {
	match parsed {
		Some(value) => {
			*slot = Some(value);

			true
		},
		None => false,
	}
}

fn union_into(slot: &mut Option<TagSet>, incoming: Option<&TagSet>) {
	let Some(incoming) = incoming else { return };

	slot.get_or_insert_with(TagSet::new).extend(incoming.iter().cloned());
}

fn override_with<T>(slot: &mut Option<T>, incoming: &Option<T>)
where
	T: Clone,
{
	if let Some(value) = incoming {
		*slot = Some(value.clone());
	}
}

fn parse_set(value: &Value) -> Option<TagSet> {
	match value {
		Value::String(text) => Some(normalize_label(text).into_iter().collect()),
		Value::Array(items) => Some(
			items.iter().filter_map(Value::as_str).filter_map(normalize_label).collect(),
		),
		_ => None,
	}
}

fn normalize_label(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_lowercase())
}

fn parse_text(value: &Value) -> Option<String> {
	let trimmed = value.as_str()?.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_string())
}

fn parse_number(value: &Value) -> Option<f64> {
	let number = match value {
		Value::Number(number) => number.as_f64()?,
		Value::String(text) => text.trim().parse::<f64>().ok()?,
		_ => return None,
	};

	number.is_finite().then_some(number)
}

fn parse_u32(value: &Value) -> Option<u32> {
	let number = parse_number(value)?;

	if number < 0.0 || number > f64::from(u32::MAX) {
		return None;
	}

	Some(number.trunc() as u32)
}

fn parse_f32(value: &Value) -> Option<f32> {
	let number = parse_number(value)?;

	(number >= 0.0).then_some(number as f32)
}

fn parse_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(flag) => Some(*flag),
		Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
			"true" => Some(true),
			"false" => Some(false),
			_ => None,
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tags(values: &[&str]) -> Option<TagSet> {
		Some(values.iter().map(|value| value.to_string()).collect())
	}

	#[test]
	fn reads_loosely_typed_values() {
		let raw = serde_json::json!({
			"dietary_tags": "Vegetarian ",
			"tags": ["mains", "", 3, "Soups"],
			"max_time": "30",
			"min_time": 10.7,
			"high_protein": "true",
			"low_fat": false,
			"main_protein": "Chicken",
			"result_limit": 5,
			"unknown": "ignored",
			"recipe_name": null,
		});
		let record = FilterRecord::from_value(&raw);

		assert_eq!(record.dietary_tags, tags(&["vegetarian"]));
		assert_eq!(record.tags, tags(&["mains", "soups"]));
		assert_eq!(record.max_time, Some(30));
		assert_eq!(record.min_time, Some(10));
		assert_eq!(record.high_protein, Some(true));
		assert_eq!(record.low_fat, Some(false));
		assert_eq!(record.main_protein.as_deref(), Some("chicken"));
		assert_eq!(record.result_limit, Some(5));
		assert_eq!(record.recipe_name, None);
	}

	#[test]
	fn drops_unreadable_values_without_failing() {
		let raw = serde_json::json!({
			"max_time": "soon",
			"low_carb": "maybe",
			"min_rating": -1.0,
			"cuisine": { "name": "thai" },
			"difficulty": ["easy"],
		});
		let record = FilterRecord::from_value(&raw);

		assert_eq!(record.max_time, None);
		assert_eq!(record.low_carb, None);
		assert_eq!(record.min_rating, None);
		assert_eq!(record.cuisine, None);
		assert_eq!(record.difficulty, tags(&["easy"]));
	}

	#[test]
	fn non_object_payload_is_empty() {
		assert!(FilterRecord::from_value(&serde_json::json!(["tags"])).is_empty());
		assert!(FilterRecord::from_value(&Value::Null).is_empty());
	}

	#[test]
	fn keeps_empty_set_distinct_from_absent() {
		let record = FilterRecord::from_value(&serde_json::json!({ "tags": [] }));

		assert_eq!(record.tags, Some(TagSet::new()));
		assert!(!record.is_empty());
	}

	#[test]
	fn take_result_limit_consumes_the_value() {
		let mut record = FilterRecord { result_limit: Some(3), ..Default::default() };

		assert_eq!(record.take_result_limit(), Some(3));
		assert_eq!(record.take_result_limit(), None);
		assert!(record.is_empty());
	}
}
