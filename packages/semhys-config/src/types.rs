use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub search: Search,
	pub llm: Llm,
	#[serde(default)]
	pub workflow: Workflow,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Base URL of the search cluster, e.g. "https://example.es.io:443".
	pub node: String,
	/// Sent as `Authorization: ApiKey <key>`. Blank values are treated as absent.
	pub api_key: Option<String>,
	#[serde(default = "default_index")]
	pub index: String,
	pub timeout_ms: u64,
	#[serde(default = "default_size")]
	pub default_size: u32,
	#[serde(default = "default_technical_size")]
	pub technical_size: u32,
	#[serde(default = "default_research_size")]
	pub research_size: u32,
	#[serde(default = "default_true")]
	pub fuzzy: bool,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Llm {
	pub provider_id: String,
	pub api_base: String,
	/// Optional. Without a key the research pipeline skips AI analysis.
	pub api_key: Option<String>,
	pub path: String,
	#[serde(default = "default_models_path")]
	pub models_path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens_per_request: u32,
	pub max_monthly_cost: f64,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
	pub webhook_url: Option<String>,
	/// Optional. Chat relays fall back to `webhook_url` when unset.
	pub chat_webhook_url: Option<String>,
	#[serde(default = "default_workflow_timeout_ms")]
	pub timeout_ms: u64,
}
impl Workflow {
	pub fn chat_url(&self) -> Option<&str> {
		self.chat_webhook_url.as_deref().or(self.webhook_url.as_deref())
	}
}
impl Default for Workflow {
	fn default() -> Self {
		Self {
			webhook_url: None,
			chat_webhook_url: None,
			timeout_ms: default_workflow_timeout_ms(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Security {
	#[serde(default)]
	pub bind_localhost_only: bool,
}

fn default_index() -> String {
	"semhys-documents".to_string()
}

fn default_size() -> u32 {
	10
}

fn default_technical_size() -> u32 {
	15
}

fn default_research_size() -> u32 {
	20
}

fn default_true() -> bool {
	true
}

fn default_models_path() -> String {
	"/models".to_string()
}

fn default_workflow_timeout_ms() -> u64 {
	5_000
}
