use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, SemhysService};
use semhys_domain::chat::{self, Category, Classification, Language, Priority};

const CHAT_SOURCE: &str = "floating_chat";
const UNKNOWN_USER_AGENT: &str = "Unknown";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub language: Option<String>,
	#[serde(default)]
	pub timestamp: Option<String>,
	#[serde(default, alias = "sessionId")]
	pub session_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatResponse {
	pub success: bool,
	pub response: String,
	pub category: Category,
	pub priority: Priority,
}

impl SemhysService {
	/// Classifies a chat message, relays it to the workflow hook, and answers with either the
	/// hook's custom reply or a canned one.
	pub async fn chat(&self, req: ChatRequest, user_agent: Option<&str>) -> Result<ChatResponse> {
		let message = req.message.trim();

		if message.is_empty() {
			return Err(Error::invalid("message is required."));
		}

		let language = match req.language.as_deref().map(str::trim) {
			None | Some("") => return Err(Error::invalid("language is required.")),
			Some(code) => parse_language(code).ok_or_else(|| {
				Error::invalid(format!("Unsupported language {code:?}. Use en, es, or pt."))
			})?,
		};
		let classification = chat::classify_message(message, language);
		let mut response =
			chat::canned_response(message, classification.category, language).to_string();

		tracing::info!(
			language = language.as_str(),
			category = ?classification.category,
			priority = ?classification.priority,
			confidence = classification.confidence,
			"Chat message classified."
		);

		if let Some(url) = self.cfg.workflow.chat_url() {
			let payload = relay_payload(
				message,
				language,
				&classification,
				req.session_id.as_deref(),
				req.timestamp.clone().unwrap_or_else(crate::now_rfc3339),
				user_agent.unwrap_or(UNKNOWN_USER_AGENT),
			);

			match self.providers.workflow.notify(url, &payload, self.cfg.workflow.timeout_ms).await {
				Ok(Some(reply)) => {
					if let Some(custom) = reply.get("customResponse").and_then(Value::as_str) {
						response = custom.to_string();
					}
				},
				Ok(None) => {},
				Err(err) => {
					tracing::warn!(error = %err, "Chat relay to workflow webhook failed.");
				},
			}
		}

		Ok(ChatResponse {
			success: true,
			response,
			category: classification.category,
			priority: classification.priority,
		})
	}
}

fn parse_language(code: &str) -> Option<Language> {
	match code.to_ascii_lowercase().as_str() {
		"en" => Some(Language::En),
		"es" => Some(Language::Es),
		"pt" => Some(Language::Pt),
		_ => None,
	}
}

fn relay_payload(
	message: &str,
	language: Language,
	classification: &Classification,
	session_id: Option<&str>,
	timestamp: String,
	user_agent: &str,
) -> Value {
	serde_json::json!({
		"type": "chat_message",
		"message": message,
		"language": language,
		"category": classification.category,
		"priority": classification.priority,
		"confidence": classification.confidence,
		"sessionId": session_id,
		"timestamp": timestamp,
		"source": CHAT_SOURCE,
		"userAgent": user_agent,
	})
}
