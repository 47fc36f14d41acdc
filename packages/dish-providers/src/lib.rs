pub mod embedding;
pub mod extractor;

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

/// Headers sent with every provider call: bearer auth, JSON content type and configured extras.
pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
		.map_err(|_| eyre::eyre!("Provider api_key contains characters not allowed in a header."))?;
	let mut headers = HeaderMap::from_iter([
		(AUTHORIZATION, bearer),
		(CONTENT_TYPE, HeaderValue::from_static("application/json")),
	]);

	for (name, value) in default_headers {
		let text = value
			.as_str()
			.ok_or_else(|| eyre::eyre!("Default header {name} must be a string, got {value}."))?;
		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|_| eyre::eyre!("Default header name {name} is not a valid header name."))?;
		let header_value = HeaderValue::from_str(text)
			.map_err(|_| eyre::eyre!("Default header {name} has an invalid value."))?;

		headers.insert(header_name, header_value);
	}

	Ok(headers)
}

/// One OpenAI-compatible endpoint with its client, URL and headers resolved up front.
pub(crate) struct JsonEndpoint {
	client: Client,
	url: String,
	headers: HeaderMap,
}
impl JsonEndpoint {
	pub(crate) fn new(
		api_base: &str,
		path: &str,
		api_key: &str,
		default_headers: &Map<String, Value>,
		timeout_ms: u64,
	) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;

		Ok(Self {
			client,
			url: format!("{}{}", api_base.trim_end_matches('/'), path),
			headers: auth_headers(api_key, default_headers)?,
		})
	}

	pub(crate) async fn post(&self, body: &Value) -> Result<Value> {
		let res = self.client.post(&self.url).headers(self.headers.clone()).json(body).send().await?;
		let status = res.status();

		if !status.is_success() {
			return Err(eyre::eyre!("{} answered with HTTP {status}.", self.url));
		}

		Ok(res.json().await?)
	}
}
