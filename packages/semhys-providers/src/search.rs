//! REST client for the managed search cluster.
//!
//! Only the handful of endpoints the service needs are wrapped here. Query bodies are built by the
//! caller and passed through as JSON.

use std::collections::BTreeMap;

use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AuthScheme, Error, Result};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchResponse {
	#[serde(default)]
	pub took: u64,
	#[serde(default)]
	pub hits: Hits,
	#[serde(default)]
	pub aggregations: Option<Value>,
}
impl SearchResponse {
	/// Total matching documents as reported by the cluster, falling back to the page length.
	pub fn total(&self) -> u64 {
		match self.hits.total {
			Some(TotalHits::Count(value)) | Some(TotalHits::Object { value }) => value,
			None => self.hits.hits.len() as u64,
		}
	}

	/// Terms buckets of a named aggregation. Missing aggregations yield an empty list.
	pub fn buckets(&self, name: &str) -> Vec<AggregationBucket> {
		self.aggregations
			.as_ref()
			.and_then(|aggs| aggs.get(name))
			.and_then(|agg| agg.get("buckets"))
			.and_then(|buckets| serde_json::from_value(buckets.clone()).ok())
			.unwrap_or_default()
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Hits {
	#[serde(default)]
	pub total: Option<TotalHits>,
	#[serde(default)]
	pub max_score: Option<f64>,
	#[serde(default)]
	pub hits: Vec<Hit>,
}

/// Clusters report totals either as a bare number or as `{ "value": n, "relation": "eq" }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
	Count(u64),
	Object { value: u64 },
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Hit {
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(rename = "_score", default)]
	pub score: Option<f64>,
	#[serde(rename = "_source", default)]
	pub source: Map<String, Value>,
	#[serde(default)]
	pub highlight: BTreeMap<String, Vec<String>>,
}
impl Hit {
	pub fn source_str(&self, field: &str) -> Option<&str> {
		self.source.get(field).and_then(Value::as_str)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationBucket {
	pub key: Value,
	pub doc_count: u64,
}
impl AggregationBucket {
	pub fn key_string(&self) -> String {
		match &self.key {
			Value::String(key) => key.clone(),
			other => other.to_string(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
	pub total_documents: u64,
	pub size_in_bytes: u64,
}

/// Returns whether the cluster answered. Transport failures count as unreachable.
pub async fn ping(cfg: &semhys_config::Search) -> Result<bool> {
	let builder = request(cfg, reqwest::Method::GET, "/")?;

	match builder.send().await {
		Ok(res) => Ok(res.status().is_success()),
		Err(err) => {
			tracing::warn!(error = %err, node = %cfg.node, "Search cluster ping failed.");

			Ok(false)
		},
	}
}

pub async fn search(
	cfg: &semhys_config::Search,
	index: &str,
	body: &Value,
) -> Result<SearchResponse> {
	let res = request(cfg, reqwest::Method::POST, &format!("/{index}/_search"))?
		.json(body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(serde_json::from_value(json)?)
}

/// Creates the index when it does not exist. Returns true when it was created.
pub async fn ensure_index(cfg: &semhys_config::Search, index: &str, body: &Value) -> Result<bool> {
	let path = format!("/{index}");
	let res = request(cfg, reqwest::Method::HEAD, &path)?.send().await?;

	match res.status() {
		status if status.is_success() => return Ok(false),
		StatusCode::NOT_FOUND => {},
		_ => {
			res.error_for_status()?;

			return Ok(false);
		},
	}

	request(cfg, reqwest::Method::PUT, &path)?.json(body).send().await?.error_for_status()?;

	tracing::info!(index, "Search index created.");

	Ok(true)
}

pub async fn index_document(
	cfg: &semhys_config::Search,
	index: &str,
	document: &Value,
) -> Result<String> {
	let res = request(cfg, reqwest::Method::POST, &format!("/{index}/_doc"))?
		.json(document)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_document_id(&json)
}

pub async fn index_stats(cfg: &semhys_config::Search, index: &str) -> Result<IndexStats> {
	let count: Value = request(cfg, reqwest::Method::GET, &format!("/{index}/_count"))?
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;
	let stats: Value = request(cfg, reqwest::Method::GET, &format!("/{index}/_stats"))?
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	parse_index_stats(index, &count, &stats)
}

pub async fn cluster_health(cfg: &semhys_config::Search) -> Result<String> {
	let json: Value = request(cfg, reqwest::Method::GET, "/_cluster/health")?
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	json.get("status").and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
		Error::InvalidResponse { message: "Cluster health response is missing status.".to_string() }
	})
}

fn request(
	cfg: &semhys_config::Search,
	method: reqwest::Method,
	path: &str,
) -> Result<RequestBuilder> {
	let client = crate::http_client(cfg.timeout_ms)?;
	let headers =
		crate::auth_headers(AuthScheme::ApiKey, cfg.api_key.as_deref(), &cfg.default_headers)?;

	Ok(client.request(method, format!("{}{path}", cfg.node)).headers(headers))
}

fn parse_document_id(json: &Value) -> Result<String> {
	json.get("_id").and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
		Error::InvalidResponse { message: "Index response is missing _id.".to_string() }
	})
}

fn parse_index_stats(index: &str, count: &Value, stats: &Value) -> Result<IndexStats> {
	let total_documents = count.get("count").and_then(Value::as_u64).ok_or_else(|| {
		Error::InvalidResponse { message: "Count response is missing count.".to_string() }
	})?;
	let size_in_bytes = stats
		.get("indices")
		.and_then(|indices| indices.get(index))
		.or_else(|| stats.get("_all"))
		.and_then(|entry| entry.pointer("/total/store/size_in_bytes"))
		.and_then(Value::as_u64)
		.unwrap_or(0);

	Ok(IndexStats { total_documents, size_in_bytes })
}
