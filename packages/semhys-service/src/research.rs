mod prompts;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, SemhysService};
use semhys_domain::{
	cost,
	relevance::Relevance,
	research::{self, Bucket, ResearchAnalysis, ResearchType, TechnicalTerm},
};
use semhys_providers::{
	completion::ChatMessage,
	search::{AggregationBucket, Hit},
};

const PREVIEW_CHARS: usize = 500;
const RELATED_TERMS: usize = 3;
const EMPTY_QUERY_SUGGESTION: &str = "Use specific technical terms such as \"bombas centrífugas \
rendimiento\", \"sistema presión RCI\", or \"mantenimiento equipos\".";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResearchRequest {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub research_focus: Option<ResearchType>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResearchResult {
	pub id: String,
	pub rank: usize,
	pub title: Option<String>,
	pub content_preview: String,
	pub highlighted_content: Vec<String>,
	pub highlighted_title: Option<String>,
	pub document_type: Option<String>,
	pub category: Option<String>,
	pub equipment_type: Option<String>,
	pub project_type: Option<String>,
	pub technical_summary: Option<String>,
	pub filename: Option<String>,
	pub file_size: Option<u64>,
	pub path: Option<String>,
	pub timestamp: Option<String>,
	pub relevance_score: f64,
	pub relevance_level: Relevance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStatus {
	Completed,
	NotConfigured,
	Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
	pub input: u32,
	pub output: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct AiAnalysis {
	pub enabled: bool,
	pub status: AiStatus,
	pub analysis: String,
	pub model_used: String,
	pub cost_estimate: f64,
	pub tokens_used: TokenUsage,
	pub confidence_score: f64,
	pub suggestions: Vec<String>,
}
impl AiAnalysis {
	fn not_configured() -> Self {
		Self {
			enabled: false,
			status: AiStatus::NotConfigured,
			analysis: "**LLM API key required**\n\nSet `llm.api_key` in the service config to enable \
			           AI analysis. Search results are available in the meantime."
				.to_string(),
			model_used: "none".to_string(),
			cost_estimate: 0.0,
			tokens_used: TokenUsage::default(),
			confidence_score: 0.0,
			suggestions: vec![
				"Configure the LLM API key to enable AI analysis".to_string(),
				"Use the basic search in the meantime".to_string(),
				"Consider gpt-4o-mini for minimal cost".to_string(),
			],
		}
	}

	fn failed(message: &str) -> Self {
		Self {
			enabled: false,
			status: AiStatus::Failed,
			analysis: format!(
				"**AI analysis failed**\n\n{message}\n\nSearch results are still available."
			),
			model_used: "error".to_string(),
			cost_estimate: 0.0,
			tokens_used: TokenUsage::default(),
			confidence_score: 0.0,
			suggestions: vec![
				"Check the LLM API key configuration".to_string(),
				"Try a shorter query".to_string(),
				"Use the basic search while this is resolved".to_string(),
			],
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ResearchResponse {
	pub success: bool,
	pub results: Vec<ResearchResult>,
	pub total_found: u64,
	pub research_summary: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ai_analysis: Option<AiAnalysis>,
	pub analysis_type: ResearchType,
	pub technical_terms_detected: Vec<TechnicalTerm>,
	pub suggestions: Vec<String>,
	pub search_time_ms: u64,
	pub equipment_breakdown: Vec<AggregationBucket>,
	pub project_breakdown: Vec<AggregationBucket>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AiIntegration {
	pub status: String,
	pub current_model: String,
	pub available_models: Vec<String>,
	pub monthly_cost_limit: f64,
	pub api_configured: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisTypeInfo {
	#[serde(rename = "type")]
	pub research_type: ResearchType,
	pub description: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResearchStatus {
	pub agent_status: String,
	pub search_health: String,
	pub total_documents: u64,
	pub index_size_mb: u64,
	pub ai_integration: AiIntegration,
	pub available_analysis_types: Vec<AnalysisTypeInfo>,
	pub technical_terms_catalog: usize,
	pub last_updated: String,
}

impl SemhysService {
	pub async fn research(&self, req: ResearchRequest) -> Result<ResearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest {
				message: "A research query is required.".to_string(),
				suggestion: Some(EMPTY_QUERY_SUGGESTION.to_string()),
			});
		}

		let mut analysis = research::analyze_research_query(query);

		if let Some(focus) = req.research_focus {
			analysis.research_type = focus;
		}

		tracing::info!(
			query = %query,
			research_type = analysis.research_type.as_str(),
			technical_terms = analysis.technical_terms.len(),
			"Research query analysed."
		);

		let search_cfg = &self.cfg.search;
		let started = Instant::now();
		let body = research_query(query, &analysis, search_cfg.research_size, search_cfg.fuzzy);
		let response = self
			.providers
			.search
			.search(search_cfg, &search_cfg.index, &body)
			.await
			.map_err(Error::search)?;
		let search_time_ms = started.elapsed().as_millis() as u64;
		let total_found = response.total();

		if total_found == 0 || response.hits.hits.is_empty() {
			return Ok(ResearchResponse {
				success: true,
				results: Vec::new(),
				total_found: 0,
				research_summary: research::no_results_summary(query),
				ai_analysis: None,
				analysis_type: analysis.research_type,
				technical_terms_detected: analysis.technical_terms,
				suggestions: research::no_results_suggestions(),
				search_time_ms,
				equipment_breakdown: Vec::new(),
				project_breakdown: Vec::new(),
			});
		}

		let equipment_breakdown = response.buckets("by_equipment_type");
		let project_breakdown = response.buckets("by_project_type");
		let significant_terms = response.buckets("content_analysis");
		let results: Vec<_> = response
			.hits
			.hits
			.into_iter()
			.enumerate()
			.map(|(idx, hit)| to_research_result(idx + 1, hit))
			.collect();
		let ai = self.analyze_with_ai(query, &results, analysis.research_type).await;
		let research_summary = if ai.status == AiStatus::Completed {
			ai.analysis.clone()
		} else {
			let buckets: Vec<_> = equipment_breakdown
				.iter()
				.map(|bucket| Bucket { key: bucket.key_string(), doc_count: bucket.doc_count })
				.collect();

			research::summarize(query, &analysis, total_found, &buckets)
		};
		let mut suggestions = ai.suggestions.clone();

		suggestions.extend(significant_terms.iter().take(RELATED_TERMS).map(|bucket| {
			format!("Related term \"{}\" ({} documents)", bucket.key_string(), bucket.doc_count)
		}));

		Ok(ResearchResponse {
			success: true,
			results,
			total_found,
			research_summary,
			ai_analysis: Some(ai),
			analysis_type: analysis.research_type,
			technical_terms_detected: analysis.technical_terms,
			suggestions,
			search_time_ms,
			equipment_breakdown,
			project_breakdown,
		})
	}

	/// Summarizes the top results with the hosted LLM. Never fails: problems come back as a
	/// `Failed` or `NotConfigured` analysis.
	pub async fn analyze_with_ai(
		&self,
		query: &str,
		results: &[ResearchResult],
		research_type: ResearchType,
	) -> AiAnalysis {
		let llm = &self.cfg.llm;

		if llm.api_key.is_none() {
			return AiAnalysis::not_configured();
		}

		let system = prompts::system_prompt(research_type);
		let user = prompts::user_prompt(query, results, research_type);
		let estimated_input = cost::estimate_tokens(&format!("{system}\n{user}"));

		if estimated_input > llm.max_tokens_per_request {
			tracing::warn!(
				estimated_input,
				limit = llm.max_tokens_per_request,
				"Research context exceeds the per-request token limit."
			);

			return AiAnalysis::failed(&format!(
				"Query context too large ({estimated_input} tokens). Limit: {}.",
				llm.max_tokens_per_request
			));
		}

		let messages = [ChatMessage::system(system), ChatMessage::user(user)];
		let max_tokens = llm.max_tokens_per_request.min(cost::MAX_COMPLETION_TOKENS);
		let completion = match self.providers.completion.complete(llm, &messages, max_tokens).await
		{
			Ok(completion) => completion,
			Err(err) => {
				tracing::warn!(
					error = %err,
					provider = %llm.provider_id,
					model = %llm.model,
					"AI analysis failed."
				);

				return AiAnalysis::failed(&err.to_string());
			},
		};

		if completion.content.trim().is_empty() {
			tracing::warn!(
				provider = %llm.provider_id,
				model = %llm.model,
				"AI analysis returned empty content."
			);

			return AiAnalysis::failed("The model returned no analysis.");
		}

		let tokens_used = match completion.usage {
			Some(usage) =>
				TokenUsage { input: usage.prompt_tokens, output: usage.completion_tokens },
			None => TokenUsage {
				input: estimated_input,
				output: cost::estimate_tokens(&completion.content),
			},
		};
		let cost_estimate = cost::estimate_cost(tokens_used.input, tokens_used.output, &llm.model);
		let high = results.iter().filter(|result| result.relevance_level == Relevance::High).count();

		tracing::info!(
			provider = %llm.provider_id,
			model = %llm.model,
			input_tokens = tokens_used.input,
			output_tokens = tokens_used.output,
			cost_estimate,
			"AI analysis completed."
		);

		AiAnalysis {
			enabled: true,
			status: AiStatus::Completed,
			analysis: completion.content,
			model_used: llm.model.clone(),
			cost_estimate,
			tokens_used,
			confidence_score: cost::confidence_score(results.len(), high),
			suggestions: follow_up_suggestions(query),
		}
	}

	pub async fn research_status(&self) -> Result<ResearchStatus> {
		let search_cfg = &self.cfg.search;
		let llm = &self.cfg.llm;
		let stats = self
			.providers
			.search
			.index_stats(search_cfg, &search_cfg.index)
			.await
			.map_err(Error::search)?;
		let search_health =
			self.providers.search.cluster_health(search_cfg).await.map_err(Error::search)?;
		let api_configured = match self.providers.completion.validate_key(llm).await {
			Ok(valid) => valid,
			Err(err) => {
				tracing::warn!(error = %err, "LLM key validation failed.");

				false
			},
		};

		Ok(ResearchStatus {
			agent_status: "active".to_string(),
			search_health,
			total_documents: stats.total_documents,
			index_size_mb: (stats.size_in_bytes as f64 / 1024.0 / 1024.0).round() as u64,
			ai_integration: AiIntegration {
				status: if api_configured { "active" } else { "needs_configuration" }.to_string(),
				current_model: llm.model.clone(),
				available_models: cost::available_models()
					.into_iter()
					.map(str::to_string)
					.collect(),
				monthly_cost_limit: llm.max_monthly_cost,
				api_configured,
			},
			available_analysis_types: ResearchType::ALL
				.iter()
				.map(|research_type| AnalysisTypeInfo {
					research_type: *research_type,
					description: research_type.description().to_string(),
				})
				.collect(),
			technical_terms_catalog: research::TECHNICAL_TERMS.len(),
			last_updated: crate::now_rfc3339(),
		})
	}
}

/// Builds the research search body: phrase and fuzzy passes, per-term boosts, file-type and
/// content-length filters, and the breakdown aggregations.
pub fn research_query(query: &str, analysis: &ResearchAnalysis, size: u32, fuzzy: bool) -> Value {
	let mut should = vec![
		serde_json::json!({
			"multi_match": {
				"query": query,
				"fields": [
					"title^4.0",
					"equipment_type^3.5",
					"specifications^3.0",
					"technical_summary^2.8"
				],
				"type": "phrase",
				"boost": 4
			}
		}),
		serde_json::json!({
			"multi_match": {
				"query": query,
				"fields": [
					"content^2.0",
					"technical_data^2.5",
					"analysis_results^2.2",
					"conclusions^1.8"
				],
				"type": "best_fields",
				"fuzziness": if fuzzy { "AUTO" } else { "0" },
				"boost": 2
			}
		}),
	];

	should.extend(analysis.technical_terms.iter().map(|term| {
		serde_json::json!({
			"match": { "content": { "query": term.term, "boost": term.weight } }
		})
	}));

	serde_json::json!({
		"query": {
			"bool": {
				"should": should,
				"filter": [
					{ "terms": { "type": research::RESEARCH_FILE_TYPES } },
					{ "range": { "content_length": { "gte": research::MIN_CONTENT_LENGTH } } }
				],
				"minimum_should_match": 1
			}
		},
		"highlight": {
			"fields": {
				"content": {
					"fragment_size": 300,
					"number_of_fragments": 8,
					"pre_tags": ["<mark class=\"highlight\">"],
					"post_tags": ["</mark>"],
					"order": "score"
				},
				"title": {
					"pre_tags": ["<strong class=\"title-match\">"],
					"post_tags": ["</strong>"]
				}
			}
		},
		"aggregations": {
			"by_equipment_type": { "terms": { "field": "equipment_type.keyword", "size": 15 } },
			"by_project_type": { "terms": { "field": "project_type.keyword", "size": 10 } },
			"by_technical_category": { "terms": { "field": "category.keyword", "size": 20 } },
			"content_analysis": {
				"significant_text": { "field": "content", "size": 10, "min_doc_count": 2 }
			}
		},
		"size": size,
		"sort": [ { "_score": { "order": "desc" } } ]
	})
}

fn to_research_result(rank: usize, mut hit: Hit) -> ResearchResult {
	let score = hit.score.unwrap_or(0.0);
	let owned = |hit: &Hit, field: &str| {
		hit.source_str(field).filter(|value| !value.trim().is_empty()).map(str::to_string)
	};
	let title = owned(&hit, "title").or_else(|| owned(&hit, "filename"));
	let (mut content_preview, truncated) =
		crate::truncate_chars(hit.source_str("content").unwrap_or_default(), PREVIEW_CHARS);

	if truncated {
		content_preview.push_str("...");
	}

	let highlighted_title = hit
		.highlight
		.get("title")
		.and_then(|fragments| fragments.first())
		.cloned()
		.or_else(|| title.clone());

	ResearchResult {
		rank,
		content_preview,
		highlighted_content: hit.highlight.remove("content").unwrap_or_default(),
		highlighted_title,
		document_type: owned(&hit, "type"),
		category: owned(&hit, "category"),
		equipment_type: owned(&hit, "equipment_type"),
		project_type: owned(&hit, "project_type"),
		technical_summary: owned(&hit, "technical_summary"),
		filename: owned(&hit, "filename"),
		file_size: hit.source.get("size").and_then(Value::as_u64),
		path: owned(&hit, "path"),
		timestamp: owned(&hit, "@timestamp"),
		relevance_score: score,
		relevance_level: Relevance::from_absolute(score),
		title,
		id: hit.id,
	}
}

fn follow_up_suggestions(query: &str) -> Vec<String> {
	let lead = query.split_whitespace().next().unwrap_or(query);

	vec![
		format!("Analyze similar projects mentioning \"{lead}\""),
		"Look for related technical specifications".to_string(),
		"Review preventive maintenance for this equipment".to_string(),
		"Compare performance with earlier projects".to_string(),
	]
}
