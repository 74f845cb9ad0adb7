use std::{collections::BTreeMap, time::Instant};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result, SemhysService};
use semhys_domain::{
	query,
	relevance::{self, Relevance},
};
use semhys_providers::search::{AggregationBucket, Hit};

pub const AGENT_VERSION: &str = "1.0.0";
pub const CAPABILITIES: [&str; 5] = [
	"technical_search",
	"equipment_search",
	"document_analysis",
	"relevance_scoring",
	"smart_suggestions",
];

const MIN_QUERY_CHARS: usize = 2;
const MAX_LIMIT: u32 = 100;
const CONTENT_PREVIEW_CHARS: usize = 300;
const SOURCE_FIELDS: [&str; 10] = [
	"title",
	"content",
	"file_type",
	"file_name",
	"file_path",
	"category",
	"technical_specs",
	"tags",
	"created_at",
	"updated_at",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
	Technical,
	General,
	#[default]
	All,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSearchRequest {
	#[serde(default)]
	pub query: String,
	#[serde(rename = "type", default)]
	pub scope: SearchScope,
	#[serde(default)]
	pub equipment: Option<String>,
	#[serde(default)]
	pub filters: BTreeMap<String, String>,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResultMetadata {
	pub category: Option<Value>,
	pub technical_specs: Option<Value>,
	pub highlights: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentSearchResult {
	pub id: String,
	pub title: String,
	pub content: String,
	#[serde(rename = "type")]
	pub document_type: String,
	pub score: f64,
	pub source: Option<String>,
	pub metadata: ResultMetadata,
	pub relevance: Relevance,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentSearchResponse {
	pub success: bool,
	pub results: Vec<AgentSearchResult>,
	pub total_found: usize,
	pub search_time_ms: u64,
	pub enhanced_query: String,
	pub category_breakdown: Vec<AggregationBucket>,
	pub file_type_breakdown: Vec<AggregationBucket>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suggestions: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexStatsReport {
	pub total_documents: u64,
	pub index_size: u64,
	pub status: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentStatus {
	pub success: bool,
	pub status: String,
	pub search_connected: bool,
	pub index_stats: Option<IndexStatsReport>,
	pub agent_version: String,
	pub capabilities: Vec<String>,
}

impl SemhysService {
	pub async fn agent_search(&self, req: AgentSearchRequest) -> Result<AgentSearchResponse> {
		let query = req.query.trim();

		if query.chars().count() < MIN_QUERY_CHARS {
			return Err(Error::invalid("query must be at least 2 characters."));
		}

		let search_cfg = &self.cfg.search;

		if !self.providers.search.ping(search_cfg).await.map_err(Error::search)? {
			return Err(Error::SearchUnavailable);
		}

		let started = Instant::now();
		let enhanced = query::enhance_query(query);
		let equipment = req.equipment.as_deref().map(str::trim).filter(|value| !value.is_empty());
		let (filters, size) = match req.scope {
			SearchScope::Technical => {
				let mut filters = BTreeMap::new();

				filters.insert("category".to_string(), "technical".to_string());

				if let Some(equipment) = equipment {
					filters.insert(
						"technical_specs.equipment_type".to_string(),
						equipment.to_string(),
					);
				}

				(filters, search_cfg.technical_size)
			},
			SearchScope::General | SearchScope::All => {
				let mut filters = req.filters;

				if let Some(equipment) = equipment {
					filters.insert(
						"technical_specs.equipment_type".to_string(),
						equipment.to_string(),
					);
				}

				let size = req.limit.unwrap_or(search_cfg.default_size).clamp(1, MAX_LIMIT);

				(filters, size)
			},
		};
		let body = document_query(&enhanced.text, &filters, size, search_cfg.fuzzy);
		let response = self
			.providers
			.search
			.search(search_cfg, &search_cfg.index, &body)
			.await
			.map_err(Error::search)?;
		let category_breakdown = response.buckets("categories");
		let file_type_breakdown = response.buckets("file_types");
		let max_score =
			relevance::max_score(response.hits.hits.iter().map(|hit| hit.score.unwrap_or(0.0)));
		let results: Vec<_> =
			response.hits.hits.into_iter().map(|hit| to_agent_result(hit, max_score)).collect();
		let search_time_ms = started.elapsed().as_millis() as u64;
		let suggestions = (results.len() < 3).then(refinement_tips);

		tracing::info!(
			query = %query,
			scope = ?req.scope,
			expanded_groups = ?enhanced.expanded_groups,
			results = results.len(),
			search_time_ms,
			"Agent search completed."
		);

		Ok(AgentSearchResponse {
			success: true,
			total_found: results.len(),
			results,
			search_time_ms,
			enhanced_query: enhanced.text,
			category_breakdown,
			file_type_breakdown,
			suggestions,
		})
	}

	pub async fn agent_status(&self) -> Result<AgentStatus> {
		let search_cfg = &self.cfg.search;
		let search_connected = match self.providers.search.ping(search_cfg).await {
			Ok(connected) => connected,
			Err(err) => {
				tracing::warn!(error = %err, "Search ping failed.");

				false
			},
		};
		let index_stats = if search_connected {
			match self.providers.search.index_stats(search_cfg, &search_cfg.index).await {
				Ok(stats) => Some(IndexStatsReport {
					total_documents: stats.total_documents,
					index_size: stats.size_in_bytes,
					status: "active".to_string(),
				}),
				Err(err) => {
					tracing::warn!(
						error = %err,
						index = %search_cfg.index,
						"Index stats unavailable."
					);

					None
				},
			}
		} else {
			None
		};

		Ok(AgentStatus {
			success: true,
			status: if search_connected { "online" } else { "offline" }.to_string(),
			search_connected,
			index_stats,
			agent_version: AGENT_VERSION.to_string(),
			capabilities: CAPABILITIES.iter().map(|capability| capability.to_string()).collect(),
		})
	}
}

/// Builds the boosted multi-field query used by the document agent.
pub fn document_query(
	text: &str,
	filters: &BTreeMap<String, String>,
	size: u32,
	fuzzy: bool,
) -> Value {
	let term_filters: Vec<Value> = filters
		.iter()
		.map(|(field, value)| {
			let mut term = Map::new();

			term.insert(field.clone(), Value::String(value.clone()));

			serde_json::json!({ "term": term })
		})
		.collect();

	serde_json::json!({
		"query": {
			"bool": {
				"must": [
					{
						"multi_match": {
							"query": text,
							"fields": [
								"title^3",
								"content^2",
								"technical_specs.specifications^2",
								"tags",
								"category"
							],
							"type": "best_fields",
							"fuzziness": if fuzzy { "AUTO" } else { "0" },
							"operator": "or"
						}
					}
				],
				"filter": term_filters
			}
		},
		"highlight": {
			"fields": {
				"content": { "fragment_size": 150, "number_of_fragments": 3 },
				"technical_specs.specifications": { "fragment_size": 100, "number_of_fragments": 2 }
			}
		},
		"aggregations": {
			"categories": { "terms": { "field": "category", "size": 10 } },
			"file_types": { "terms": { "field": "file_type", "size": 10 } }
		},
		"_source": SOURCE_FIELDS,
		"size": size
	})
}

fn to_agent_result(mut hit: Hit, max_score: f64) -> AgentSearchResult {
	let score = hit.score.unwrap_or(0.0);
	let title = non_empty(hit.source_str("title"))
		.or_else(|| non_empty(hit.source_str("file_name")))
		.unwrap_or("Untitled")
		.to_string();
	let content = match hit.highlight.get("content").and_then(|fragments| fragments.first()) {
		Some(fragment) => fragment.clone(),
		None => {
			let content = hit.source_str("content").unwrap_or_default();

			crate::truncate_chars(content, CONTENT_PREVIEW_CHARS).0
		},
	};
	let document_type = hit.source_str("file_type").unwrap_or("unknown").to_string();
	let source = hit.source_str("file_path").map(str::to_string);

	AgentSearchResult {
		id: hit.id,
		title,
		content,
		document_type,
		score,
		source,
		metadata: ResultMetadata {
			category: hit.source.remove("category"),
			technical_specs: hit.source.remove("technical_specs"),
			highlights: hit.highlight,
		},
		relevance: Relevance::from_normalized(score, max_score),
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}

fn refinement_tips() -> Vec<String> {
	vec![
		"Try more specific technical terms".to_string(),
		"Include the equipment type or brand".to_string(),
		"Search by category: technical, project, or maintenance".to_string(),
	]
}
