use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		dish_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn includes_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-goog-user-project".to_string(), Value::String("recipes".to_string()));

	let headers = dish_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("x-goog-user-project").expect("Missing default header."), "recipes");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	assert!(dish_providers::auth_headers("secret", &defaults).is_err());
}

#[test]
fn sends_json_content_type_and_trims_key() {
	let headers =
		dish_providers::auth_headers("  secret\n", &Map::new()).expect("Failed to build headers.");

	assert_eq!(headers.get(AUTHORIZATION).expect("Missing authorization header."), "Bearer secret");
	assert_eq!(
		headers.get(reqwest::header::CONTENT_TYPE).expect("Missing content type."),
		"application/json"
	);
}
