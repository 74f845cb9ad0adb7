pub mod completion;
pub mod search;
pub mod workflow;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

/// Authorization schemes used by the upstream services.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScheme {
	/// `Authorization: Bearer <key>`, used by the LLM endpoint.
	Bearer,
	/// `Authorization: ApiKey <key>`, used by the search cluster.
	ApiKey,
}
impl AuthScheme {
	fn prefix(self) -> &'static str {
		match self {
			Self::Bearer => "Bearer",
			Self::ApiKey => "ApiKey",
		}
	}
}

pub fn auth_headers(
	scheme: AuthScheme,
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(key) = api_key {
		headers.insert(AUTHORIZATION, format!("{} {key}", scheme.prefix()).parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) fn http_client(timeout_ms: u64) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?)
}
