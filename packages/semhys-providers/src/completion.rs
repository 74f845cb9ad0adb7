use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AuthScheme, Error, Result};

const TOP_P: f32 = 0.9;
const FREQUENCY_PENALTY: f32 = 0.1;
const PRESENCE_PENALTY: f32 = 0.1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}
impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system".to_string(), content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user".to_string(), content: content.into() }
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
	pub prompt_tokens: u32,
	pub completion_tokens: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
	pub content: String,
	pub usage: Option<Usage>,
}

pub async fn complete(
	cfg: &semhys_config::Llm,
	messages: &[ChatMessage],
	max_tokens: u32,
) -> Result<Completion> {
	let api_key = cfg.api_key.as_deref().ok_or_else(|| Error::InvalidConfig {
		message: "LLM api_key is not configured.".to_string(),
	})?;
	let client = crate::http_client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"max_tokens": max_tokens,
		"temperature": cfg.temperature,
		"top_p": TOP_P,
		"frequency_penalty": FREQUENCY_PENALTY,
		"presence_penalty": PRESENCE_PENALTY,
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(AuthScheme::Bearer, Some(api_key), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion(json)
}

/// Checks the key against the models listing. A missing key is simply invalid.
pub async fn validate_key(cfg: &semhys_config::Llm) -> Result<bool> {
	let Some(api_key) = cfg.api_key.as_deref() else {
		return Ok(false);
	};
	let client = crate::http_client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.models_path);
	let res = client
		.get(&url)
		.headers(crate::auth_headers(AuthScheme::Bearer, Some(api_key), &cfg.default_headers)?)
		.send()
		.await;

	match res {
		Ok(res) => Ok(res.status().is_success()),
		Err(err) => {
			tracing::warn!(error = %err, "LLM key validation request failed.");

			Ok(false)
		},
	}
}

fn parse_completion(json: Value) -> Result<Completion> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing message content.".to_string(),
		})?;
	let usage = json.get("usage").and_then(|usage| serde_json::from_value(usage.clone()).ok());

	Ok(Completion { content: content.to_string(), usage })
}
