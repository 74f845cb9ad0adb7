use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::{Map, Value, json};

use semhys_config::{Config, Llm, Search, Security, Service, Workflow};
use semhys_domain::{
	chat::{Category, Priority},
	relevance::Relevance,
	research::ResearchType,
};
use semhys_providers::{
	completion::{ChatMessage, Completion, Usage},
	search::{IndexStats, SearchResponse},
};
use semhys_service::{
	AgentSearchRequest, AiStatus, BoxFuture, ChatRequest, CompletionProvider, Error, NewDocument,
	ProviderResult, Providers, ResearchRequest, SearchBackend, SearchScope, SemhysService,
	WorkflowNotifier,
};

struct FakeSearch {
	reachable: bool,
	response: Value,
	fail_search: bool,
	last_body: Mutex<Option<Value>>,
	last_document: Mutex<Option<Value>>,
}
impl FakeSearch {
	fn new(response: Value) -> Self {
		Self {
			reachable: true,
			response,
			fail_search: false,
			last_body: Mutex::new(None),
			last_document: Mutex::new(None),
		}
	}

	fn last_body(&self) -> Value {
		self.last_body.lock().expect("lock poisoned").clone().expect("No search was sent.")
	}
}
impl SearchBackend for FakeSearch {
	fn ping<'a>(&'a self, _cfg: &'a Search) -> BoxFuture<'a, ProviderResult<bool>> {
		let reachable = self.reachable;

		Box::pin(async move { Ok(reachable) })
	}

	fn search<'a>(
		&'a self,
		_cfg: &'a Search,
		_index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, ProviderResult<SearchResponse>> {
		*self.last_body.lock().expect("lock poisoned") = Some(body.clone());

		Box::pin(async move {
			if self.fail_search {
				return Err(semhys_providers::Error::InvalidResponse {
					message: "cluster rejected the query".to_string(),
				});
			}

			Ok(serde_json::from_value(self.response.clone())?)
		})
	}

	fn ensure_index<'a>(
		&'a self,
		_cfg: &'a Search,
		_index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, ProviderResult<bool>> {
		let has_mappings = body.get("mappings").is_some();

		Box::pin(async move { Ok(has_mappings) })
	}

	fn index_document<'a>(
		&'a self,
		_cfg: &'a Search,
		_index: &'a str,
		document: &'a Value,
	) -> BoxFuture<'a, ProviderResult<String>> {
		*self.last_document.lock().expect("lock poisoned") = Some(document.clone());

		Box::pin(async move { Ok("doc-1".to_string()) })
	}

	fn index_stats<'a>(
		&'a self,
		_cfg: &'a Search,
		_index: &'a str,
	) -> BoxFuture<'a, ProviderResult<IndexStats>> {
		Box::pin(async move {
			Ok(IndexStats { total_documents: 42, size_in_bytes: 3 * 1024 * 1024 })
		})
	}

	fn cluster_health<'a>(&'a self, _cfg: &'a Search) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(async move { Ok("yellow".to_string()) })
	}
}

struct FakeCompletion {
	content: Option<String>,
	calls: AtomicUsize,
}
impl FakeCompletion {
	fn replying(content: &str) -> Self {
		Self { content: Some(content.to_string()), calls: AtomicUsize::new(0) }
	}

	fn failing() -> Self {
		Self { content: None, calls: AtomicUsize::new(0) }
	}

	fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl CompletionProvider for FakeCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a Llm,
		messages: &'a [ChatMessage],
		_max_tokens: u32,
	) -> BoxFuture<'a, ProviderResult<Completion>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let roles: Vec<_> = messages.iter().map(|message| message.role.clone()).collect();

		Box::pin(async move {
			assert_eq!(roles, ["system", "user"]);

			match &self.content {
				Some(content) => Ok(Completion {
					content: content.clone(),
					usage: Some(Usage { prompt_tokens: 900, completion_tokens: 300 }),
				}),
				None => Err(semhys_providers::Error::InvalidResponse {
					message: "upstream timed out".to_string(),
				}),
			}
		})
	}

	fn validate_key<'a>(&'a self, cfg: &'a Llm) -> BoxFuture<'a, ProviderResult<bool>> {
		let valid = cfg.api_key.is_some();

		Box::pin(async move { Ok(valid) })
	}
}

struct FakeWorkflow {
	reply: Option<Value>,
	payloads: Arc<Mutex<Vec<(String, Value)>>>,
}
impl FakeWorkflow {
	fn new(reply: Option<Value>) -> Self {
		Self { reply, payloads: Arc::new(Mutex::new(Vec::new())) }
	}
}
impl WorkflowNotifier for FakeWorkflow {
	fn notify<'a>(
		&'a self,
		url: &'a str,
		payload: &'a Value,
		_timeout_ms: u64,
	) -> BoxFuture<'a, ProviderResult<Option<Value>>> {
		self.payloads.lock().expect("lock poisoned").push((url.to_string(), payload.clone()));

		let reply = self.reply.clone();

		Box::pin(async move { Ok(reply) })
	}
}

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8080".to_string(),
			admin_bind: "127.0.0.1:8081".to_string(),
			log_level: "info".to_string(),
		},
		search: Search {
			node: "http://127.0.0.1:9200".to_string(),
			api_key: None,
			index: "semhys-documents".to_string(),
			timeout_ms: 1_000,
			default_size: 10,
			technical_size: 15,
			research_size: 20,
			fuzzy: true,
			default_headers: Map::new(),
		},
		llm: Llm {
			provider_id: "test".to_string(),
			api_base: "http://127.0.0.1:1".to_string(),
			api_key: Some("llm-key".to_string()),
			path: "/chat/completions".to_string(),
			models_path: "/models".to_string(),
			model: "gpt-4o-mini".to_string(),
			temperature: 0.3,
			max_tokens_per_request: 2_000,
			max_monthly_cost: 10.0,
			timeout_ms: 1_000,
			default_headers: Map::new(),
		},
		workflow: Workflow {
			webhook_url: Some("http://127.0.0.1:5678/webhook/contact".to_string()),
			chat_webhook_url: None,
			timeout_ms: 1_000,
		},
		security: Security::default(),
	}
}

fn service_with(
	cfg: Config,
	search: Arc<FakeSearch>,
	completion: Arc<FakeCompletion>,
	workflow: Arc<FakeWorkflow>,
) -> SemhysService {
	SemhysService::with_providers(cfg, Providers::new(search, completion, workflow))
}

fn agent_hits() -> Value {
	json!({
		"took": 4,
		"hits": {
			"total": { "value": 2, "relation": "eq" },
			"max_score": 8.0,
			"hits": [
				{
					"_id": "a",
					"_score": 8.0,
					"_source": {
						"title": "Centrifugal pump datasheet",
						"content": "Pump curve and NPSH data.",
						"file_type": "pdf",
						"file_path": "/docs/pump.pdf",
						"category": "technical"
					},
					"highlight": { "content": ["<em>pump</em> curve"] }
				},
				{
					"_id": "b",
					"_score": 2.0,
					"_source": { "title": "", "file_name": "notes.txt", "content": "Misc notes." }
				}
			]
		},
		"aggregations": {
			"categories": { "buckets": [ { "key": "technical", "doc_count": 1 } ] },
			"file_types": { "buckets": [ { "key": "pdf", "doc_count": 1 } ] }
		}
	})
}

fn research_hits() -> Value {
	json!({
		"took": 9,
		"hits": {
			"total": { "value": 1, "relation": "eq" },
			"hits": [
				{
					"_id": "r1",
					"_score": 11.0,
					"_source": {
						"title": "Bombas centrífugas: informe de rendimiento",
						"content": "Ensayo de bombas centrífugas en planta.",
						"type": "pdf",
						"equipment_type": "bomba"
					}
				}
			]
		},
		"aggregations": {
			"by_equipment_type": { "buckets": [ { "key": "bomba", "doc_count": 1 } ] },
			"by_project_type": { "buckets": [] },
			"content_analysis": {
				"buckets": [ { "key": "npsh", "doc_count": 3 }, { "key": "impulsor", "doc_count": 2 } ]
			}
		}
	})
}

#[tokio::test]
async fn agent_search_buckets_relevance_against_top_score() {
	let search = Arc::new(FakeSearch::new(agent_hits()));
	let service = service_with(
		test_config(),
		search.clone(),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.agent_search(AgentSearchRequest {
			query: "Bomba centrífuga".to_string(),
			scope: SearchScope::All,
			equipment: None,
			filters: Default::default(),
			limit: Some(500),
		})
		.await
		.expect("Agent search failed.");

	assert!(response.success);
	assert_eq!(response.total_found, 2);
	assert_eq!(response.results[0].relevance, Relevance::High);
	assert_eq!(response.results[0].content, "<em>pump</em> curve");
	assert_eq!(response.results[0].source.as_deref(), Some("/docs/pump.pdf"));
	assert_eq!(response.results[1].relevance, Relevance::Low);
	assert_eq!(response.results[1].title, "notes.txt");
	assert_eq!(response.suggestions.as_ref().map(Vec::len), Some(3));
	assert!(response.enhanced_query.contains("impeller"));
	assert_eq!(response.category_breakdown[0].key_string(), "technical");
	assert_eq!(response.file_type_breakdown[0].doc_count, 1);

	let body = search.last_body();

	assert_eq!(body["size"], 100);
}

#[tokio::test]
async fn technical_scope_filters_on_category_and_equipment() {
	let search = Arc::new(FakeSearch::new(agent_hits()));
	let service = service_with(
		test_config(),
		search.clone(),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);

	service
		.agent_search(AgentSearchRequest {
			query: "valve actuator".to_string(),
			scope: SearchScope::Technical,
			equipment: Some("valve".to_string()),
			filters: Default::default(),
			limit: Some(3),
		})
		.await
		.expect("Agent search failed.");

	let body = search.last_body();
	let filters = body["query"]["bool"]["filter"].as_array().expect("filter clauses");

	assert_eq!(body["size"], 15);
	assert!(filters.contains(&json!({ "term": { "category": "technical" } })));
	assert!(filters.contains(&json!({ "term": { "technical_specs.equipment_type": "valve" } })));
}

#[tokio::test]
async fn agent_search_rejects_short_queries_and_offline_cluster() {
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(agent_hits())),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let err = service
		.agent_search(AgentSearchRequest {
			query: " a ".to_string(),
			scope: SearchScope::All,
			equipment: None,
			filters: Default::default(),
			limit: None,
		})
		.await
		.expect_err("Expected short query rejection.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let mut offline = FakeSearch::new(agent_hits());

	offline.reachable = false;

	let service = service_with(
		test_config(),
		Arc::new(offline),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let err = service
		.agent_search(AgentSearchRequest {
			query: "pump".to_string(),
			scope: SearchScope::All,
			equipment: None,
			filters: Default::default(),
			limit: None,
		})
		.await
		.expect_err("Expected unavailable search.");

	assert!(matches!(err, Error::SearchUnavailable));

	let status = service.agent_status().await.expect("Status failed.");

	assert_eq!(status.status, "offline");
	assert!(status.index_stats.is_none());
}

#[tokio::test]
async fn research_uses_ai_analysis_when_configured() {
	let completion = Arc::new(FakeCompletion::replying("**Executive summary**: pumps look fine."));
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(research_hits())),
		completion.clone(),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.research(ResearchRequest {
			query: "rendimiento de bombas centrífugas".to_string(),
			research_focus: None,
		})
		.await
		.expect("Research failed.");
	let ai = response.ai_analysis.expect("Missing AI analysis.");

	assert_eq!(completion.count(), 1);
	assert_eq!(ai.status, AiStatus::Completed);
	assert!(ai.enabled);
	assert_eq!(ai.tokens_used.input, 900);
	assert_eq!(ai.tokens_used.output, 300);
	assert!(ai.cost_estimate > 0.0);
	assert_eq!(response.research_summary, "**Executive summary**: pumps look fine.");
	assert_eq!(response.analysis_type, ResearchType::Performance);
	assert_eq!(response.technical_terms_detected.len(), 1);
	assert_eq!(response.results[0].rank, 1);
	assert_eq!(response.results[0].relevance_level, Relevance::High);
	assert_eq!(response.equipment_breakdown.len(), 1);
	// Four follow-ups plus three related terms at most; only two terms came back.
	assert_eq!(response.suggestions.len(), 6);
}

#[tokio::test]
async fn research_falls_back_to_deterministic_summary() {
	let mut cfg = test_config();

	cfg.llm.api_key = None;

	let completion = Arc::new(FakeCompletion::replying("unused"));
	let service = service_with(
		cfg,
		Arc::new(FakeSearch::new(research_hits())),
		completion.clone(),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.research(ResearchRequest {
			query: "bombas centrífugas".to_string(),
			research_focus: Some(ResearchType::Maintenance),
		})
		.await
		.expect("Research failed.");
	let ai = response.ai_analysis.as_ref().expect("Missing AI analysis.");

	assert_eq!(completion.count(), 0);
	assert_eq!(ai.status, AiStatus::NotConfigured);
	assert_eq!(ai.model_used, "none");
	assert_eq!(response.analysis_type, ResearchType::Maintenance);
	assert!(response.research_summary.contains("**Documents found**: 1"));
	assert!(response.research_summary.contains("bomba: 1 documents"));
}

#[tokio::test]
async fn research_failure_degrades_to_failed_analysis() {
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(research_hits())),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.research(ResearchRequest { query: "bomba".to_string(), research_focus: None })
		.await
		.expect("Research failed.");
	let ai = response.ai_analysis.expect("Missing AI analysis.");

	assert_eq!(ai.status, AiStatus::Failed);
	assert!(ai.analysis.contains("upstream timed out"));
	assert!(response.research_summary.contains("**SEMHYS research**"));
}

#[tokio::test]
async fn research_over_token_budget_skips_the_model() {
	let mut cfg = test_config();

	cfg.llm.max_tokens_per_request = 10;

	let completion = Arc::new(FakeCompletion::replying("unused"));
	let service = service_with(
		cfg,
		Arc::new(FakeSearch::new(research_hits())),
		completion.clone(),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.research(ResearchRequest { query: "bombas centrífugas".to_string(), research_focus: None })
		.await
		.expect("Research failed.");
	let ai = response.ai_analysis.expect("Missing AI analysis.");

	assert_eq!(completion.count(), 0);
	assert_eq!(ai.status, AiStatus::Failed);
	assert!(ai.analysis.contains("Limit: 10"));
	assert!(response.research_summary.contains("**SEMHYS research**"));
}

#[tokio::test]
async fn research_treats_blank_completion_as_failed() {
	let completion = Arc::new(FakeCompletion::replying("  "));
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(research_hits())),
		completion.clone(),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.research(ResearchRequest { query: "bombas centrífugas".to_string(), research_focus: None })
		.await
		.expect("Research failed.");
	let ai = response.ai_analysis.expect("Missing AI analysis.");

	assert_eq!(completion.count(), 1);
	assert_eq!(ai.status, AiStatus::Failed);
	assert!(response.research_summary.contains("**SEMHYS research**"));
}

#[tokio::test]
async fn research_without_hits_returns_guidance() {
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(json!({ "hits": { "total": { "value": 0 }, "hits": [] } }))),
		Arc::new(FakeCompletion::replying("unused")),
		Arc::new(FakeWorkflow::new(None)),
	);
	let response = service
		.research(ResearchRequest { query: "turbina".to_string(), research_focus: None })
		.await
		.expect("Research failed.");

	assert!(response.success);
	assert!(response.results.is_empty());
	assert!(response.ai_analysis.is_none());
	assert_eq!(response.suggestions.len(), 3);

	let err = service
		.research(ResearchRequest { query: "   ".to_string(), research_focus: None })
		.await
		.expect_err("Expected empty query rejection.");

	assert!(matches!(err, Error::InvalidRequest { suggestion: Some(_), .. }));
}

#[tokio::test]
async fn research_search_errors_surface() {
	let mut search = FakeSearch::new(research_hits());

	search.fail_search = true;

	let service = service_with(
		test_config(),
		Arc::new(search),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let err = service
		.research(ResearchRequest { query: "bomba".to_string(), research_focus: None })
		.await
		.expect_err("Expected search error.");

	assert!(matches!(err, Error::Search { .. }));
}

#[tokio::test]
async fn research_status_reports_integration_state() {
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(research_hits())),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let status = service.research_status().await.expect("Status failed.");

	assert_eq!(status.search_health, "yellow");
	assert_eq!(status.total_documents, 42);
	assert_eq!(status.index_size_mb, 3);
	assert_eq!(status.ai_integration.status, "active");
	assert_eq!(status.available_analysis_types.len(), 7);
	assert_eq!(status.technical_terms_catalog, 9);
}

#[tokio::test]
async fn chat_prefers_workflow_custom_response() {
	let reply = json!({ "customResponse": "An engineer will call." });
	let workflow = Arc::new(FakeWorkflow::new(Some(reply)));
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(agent_hits())),
		Arc::new(FakeCompletion::failing()),
		workflow.clone(),
	);
	let response = service
		.chat(
			ChatRequest {
				message: "Urgent: pump failure at the plant".to_string(),
				language: Some("en".to_string()),
				timestamp: None,
				session_id: Some("session-7".to_string()),
			},
			Some("Mozilla/5.0"),
		)
		.await
		.expect("Chat failed.");

	assert_eq!(response.response, "An engineer will call.");
	assert_eq!(response.category, Category::Technical);
	assert_eq!(response.priority, Priority::High);

	let payloads = workflow.payloads.lock().expect("lock poisoned");
	let (url, payload) = &payloads[0];

	assert_eq!(url, "http://127.0.0.1:5678/webhook/contact");
	assert_eq!(payload["sessionId"], "session-7");
	assert_eq!(payload["userAgent"], "Mozilla/5.0");
}

#[tokio::test]
async fn chat_keeps_canned_reply_and_validates_input() {
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(agent_hits())),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(Some(json!({ "ok": true })))),
	);
	let response = service
		.chat(
			ChatRequest {
				message: "Hola".to_string(),
				language: Some("es".to_string()),
				timestamp: None,
				session_id: None,
			},
			None,
		)
		.await
		.expect("Chat failed.");

	assert!(!response.response.is_empty());
	assert_eq!(response.category, Category::General);

	for (message, language) in [("", Some("en")), ("Hi", None), ("Hi", Some("fr"))] {
		let err = service
			.chat(
				ChatRequest {
					message: message.to_string(),
					language: language.map(str::to_string),
					timestamp: None,
					session_id: None,
				},
				None,
			)
			.await
			.expect_err("Expected invalid chat request.");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}
}

#[test]
fn webhook_distinguishes_unknown_and_malformed_payloads() {
	let service = service_with(
		test_config(),
		Arc::new(FakeSearch::new(agent_hits())),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);
	let err = service
		.handle_webhook(json!({ "type": "invoice", "data": {} }))
		.expect_err("Expected unknown type.");

	assert_eq!(err.to_string(), "Invalid request: Unknown webhook type.");

	let err = service
		.handle_webhook(json!({ "type": "project_update", "data": { "projectId": "p1" } }))
		.expect_err("Expected malformed payload.");

	assert!(err.to_string().contains("Invalid project_update payload"));

	let response = service
		.handle_webhook(json!({
			"type": "project_update",
			"data": {
				"projectId": "p1",
				"projectName": "Planta norte",
				"status": "in_progress",
				"progress": 40,
				"engineer": "Luis",
				"client": "Acme"
			}
		}))
		.expect("Webhook failed.");

	assert_eq!(response.data["projectId"], "p1");
	assert_eq!(response.data["status"], "updated");
	assert_eq!(service.webhook_info().supported_types.len(), 4);
}

#[tokio::test]
async fn document_admin_round_trip() {
	let search = Arc::new(FakeSearch::new(agent_hits()));
	let service = service_with(
		test_config(),
		search.clone(),
		Arc::new(FakeCompletion::failing()),
		Arc::new(FakeWorkflow::new(None)),
	);

	assert!(service.ensure_index().await.expect("Ensure failed.").created);

	let indexed = service
		.index_document(NewDocument {
			title: "Pump curve".to_string(),
			content: "Head versus flow for the booster set.".to_string(),
			file_type: "pdf".to_string(),
			file_name: "curve.pdf".to_string(),
			file_path: Some("/docs/curve.pdf".to_string()),
			file_size: None,
			category: Some("technical".to_string()),
			technical_specs: None,
			tags: Vec::new(),
			equipment_type: Some("bomba".to_string()),
			project_type: None,
			technical_summary: None,
		})
		.await
		.expect("Index failed.");

	assert_eq!(indexed.id, "doc-1");

	let document =
		search.last_document.lock().expect("lock poisoned").clone().expect("No document sent.");

	assert_eq!(document["type"], "pdf");
	assert!(document["created_at"].as_str().is_some_and(|value| !value.is_empty()));

	let stats = service.index_stats().await.expect("Stats failed.");

	assert_eq!(stats.total_documents, 42);
}
