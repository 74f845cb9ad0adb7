pub mod agent;
pub mod chat;
pub mod documents;
pub mod research;
pub mod webhook;

mod error;

pub use agent::{
	AgentSearchRequest, AgentSearchResponse, AgentSearchResult, AgentStatus, IndexStatsReport,
	ResultMetadata, SearchScope,
};
pub use chat::{ChatRequest, ChatResponse};
pub use documents::{
	EnsureIndexResponse, IndexDocumentResponse, IndexStatsResponse, NewDocument, TechnicalSpecs,
};
pub use error::{Error, Result};
pub use research::{
	AiAnalysis, AiIntegration, AiStatus, AnalysisTypeInfo, ResearchRequest, ResearchResponse,
	ResearchResult, ResearchStatus, TokenUsage,
};
pub use webhook::{WebhookInfo, WebhookPayload, WebhookResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use semhys_config::Config;
use semhys_providers::{
	completion::{self, ChatMessage, Completion},
	search::{self, IndexStats, SearchResponse},
	workflow,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type ProviderResult<T> = semhys_providers::Result<T>;

pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn ping<'a>(&'a self, cfg: &'a semhys_config::Search) -> BoxFuture<'a, ProviderResult<bool>>;

	fn search<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, ProviderResult<SearchResponse>>;

	fn ensure_index<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, ProviderResult<bool>>;

	fn index_document<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
		document: &'a Value,
	) -> BoxFuture<'a, ProviderResult<String>>;

	fn index_stats<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
	) -> BoxFuture<'a, ProviderResult<IndexStats>>;

	fn cluster_health<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
	) -> BoxFuture<'a, ProviderResult<String>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a semhys_config::Llm,
		messages: &'a [ChatMessage],
		max_tokens: u32,
	) -> BoxFuture<'a, ProviderResult<Completion>>;

	fn validate_key<'a>(&'a self, cfg: &'a semhys_config::Llm) -> BoxFuture<'a, ProviderResult<bool>>;
}

pub trait WorkflowNotifier
where
	Self: Send + Sync,
{
	fn notify<'a>(
		&'a self,
		url: &'a str,
		payload: &'a Value,
		timeout_ms: u64,
	) -> BoxFuture<'a, ProviderResult<Option<Value>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SearchBackend>,
	pub completion: Arc<dyn CompletionProvider>,
	pub workflow: Arc<dyn WorkflowNotifier>,
}
impl Providers {
	pub fn new(
		search: Arc<dyn SearchBackend>,
		completion: Arc<dyn CompletionProvider>,
		workflow: Arc<dyn WorkflowNotifier>,
	) -> Self {
		Self { search, completion, workflow }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { search: provider.clone(), completion: provider.clone(), workflow: provider }
	}
}

pub struct SemhysService {
	pub cfg: Config,
	pub providers: Providers,
}
impl SemhysService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}
}

struct DefaultProviders;

impl SearchBackend for DefaultProviders {
	fn ping<'a>(&'a self, cfg: &'a semhys_config::Search) -> BoxFuture<'a, ProviderResult<bool>> {
		Box::pin(search::ping(cfg))
	}

	fn search<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, ProviderResult<SearchResponse>> {
		Box::pin(search::search(cfg, index, body))
	}

	fn ensure_index<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, ProviderResult<bool>> {
		Box::pin(search::ensure_index(cfg, index, body))
	}

	fn index_document<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
		document: &'a Value,
	) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(search::index_document(cfg, index, document))
	}

	fn index_stats<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
		index: &'a str,
	) -> BoxFuture<'a, ProviderResult<IndexStats>> {
		Box::pin(search::index_stats(cfg, index))
	}

	fn cluster_health<'a>(
		&'a self,
		cfg: &'a semhys_config::Search,
	) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(search::cluster_health(cfg))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a semhys_config::Llm,
		messages: &'a [ChatMessage],
		max_tokens: u32,
	) -> BoxFuture<'a, ProviderResult<Completion>> {
		Box::pin(completion::complete(cfg, messages, max_tokens))
	}

	fn validate_key<'a>(&'a self, cfg: &'a semhys_config::Llm) -> BoxFuture<'a, ProviderResult<bool>> {
		Box::pin(completion::validate_key(cfg))
	}
}

impl WorkflowNotifier for DefaultProviders {
	fn notify<'a>(
		&'a self,
		url: &'a str,
		payload: &'a Value,
		timeout_ms: u64,
	) -> BoxFuture<'a, ProviderResult<Option<Value>>> {
		Box::pin(workflow::notify(url, payload, timeout_ms))
	}
}

pub(crate) fn now_rfc3339() -> String {
	OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

pub(crate) fn unix_millis() -> i128 {
	OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

/// Cuts `text` to at most `max_chars` characters. Returns whether anything was dropped.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
	match text.char_indices().nth(max_chars) {
		Some((byte_idx, _)) => (text[..byte_idx].to_string(), true),
		None => (text.to_string(), false),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncates_on_char_boundaries() {
		assert_eq!(truncate_chars("válvula", 2), ("vá".to_string(), true));
		assert_eq!(truncate_chars("pump", 4), ("pump".to_string(), false));
	}
}
