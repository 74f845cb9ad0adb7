use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, SemhysService};

pub const VECTOR_DIMS: u32 = 768;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TechnicalSpecs {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub equipment_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub specifications: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub manufacturer: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub model: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewDocument {
	pub title: String,
	pub content: String,
	pub file_type: String,
	pub file_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_path: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_size: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub technical_specs: Option<TechnicalSpecs>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub equipment_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub technical_summary: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnsureIndexResponse {
	pub index: String,
	pub created: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexDocumentResponse {
	pub id: String,
	pub index: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexStatsResponse {
	pub index: String,
	pub total_documents: u64,
	pub size_in_bytes: u64,
}

impl SemhysService {
	pub async fn ensure_index(&self) -> Result<EnsureIndexResponse> {
		let search_cfg = &self.cfg.search;
		let created = self
			.providers
			.search
			.ensure_index(search_cfg, &search_cfg.index, &index_body())
			.await
			.map_err(Error::search)?;

		tracing::info!(index = %search_cfg.index, created, "Document index ensured.");

		Ok(EnsureIndexResponse { index: search_cfg.index.clone(), created })
	}

	pub async fn index_document(&self, doc: NewDocument) -> Result<IndexDocumentResponse> {
		for (field, value) in [
			("title", &doc.title),
			("content", &doc.content),
			("file_name", &doc.file_name),
			("file_type", &doc.file_type),
		] {
			if value.trim().is_empty() {
				return Err(Error::invalid(format!("{field} must not be empty.")));
			}
		}

		let search_cfg = &self.cfg.search;
		let document = document_source(&doc, &crate::now_rfc3339())?;
		let id = self
			.providers
			.search
			.index_document(search_cfg, &search_cfg.index, &document)
			.await
			.map_err(Error::search)?;

		tracing::info!(
			index = %search_cfg.index,
			id = %id,
			file_name = %doc.file_name,
			"Document indexed."
		);

		Ok(IndexDocumentResponse { id, index: search_cfg.index.clone() })
	}

	pub async fn index_stats(&self) -> Result<IndexStatsResponse> {
		let search_cfg = &self.cfg.search;
		let stats = self
			.providers
			.search
			.index_stats(search_cfg, &search_cfg.index)
			.await
			.map_err(Error::search)?;

		Ok(IndexStatsResponse {
			index: search_cfg.index.clone(),
			total_documents: stats.total_documents,
			size_in_bytes: stats.size_in_bytes,
		})
	}
}

/// Mapping and analysis settings for the document index.
pub fn index_body() -> Value {
	serde_json::json!({
		"mappings": {
			"properties": {
				"title": {
					"type": "text",
					"analyzer": "standard",
					"fields": { "keyword": { "type": "keyword" } }
				},
				"content": { "type": "text", "analyzer": "standard" },
				"content_length": { "type": "integer" },
				"type": { "type": "keyword" },
				"file_type": { "type": "keyword" },
				"file_name": { "type": "keyword" },
				"file_path": { "type": "keyword" },
				"file_size": { "type": "long" },
				"created_at": { "type": "date" },
				"updated_at": { "type": "date" },
				"tags": { "type": "keyword" },
				"category": {
					"type": "keyword",
					"fields": {
						"keyword": { "type": "keyword" },
						"text": { "type": "text" }
					}
				},
				"equipment_type": {
					"type": "keyword",
					"fields": { "keyword": { "type": "keyword" } }
				},
				"project_type": {
					"type": "keyword",
					"fields": { "keyword": { "type": "keyword" } }
				},
				"technical_summary": { "type": "text" },
				"technical_specs": {
					"type": "object",
					"properties": {
						"equipment_type": { "type": "keyword" },
						"specifications": { "type": "text" },
						"manufacturer": { "type": "keyword" },
						"model": { "type": "keyword" }
					}
				},
				"vector_content": { "type": "dense_vector", "dims": VECTOR_DIMS }
			}
		},
		"settings": {
			"analysis": {
				"analyzer": {
					"semhys_analyzer": {
						"type": "custom",
						"tokenizer": "standard",
						"filter": ["lowercase", "stop", "snowball"]
					}
				}
			}
		}
	})
}

// The research pipeline filters on `type` and `content_length`, so both are derived here.
fn document_source(doc: &NewDocument, now: &str) -> Result<Value> {
	let mut source = serde_json::to_value(doc)
		.map_err(|err| Error::invalid(format!("Document is not serializable: {err}.")))?;

	if let Some(fields) = source.as_object_mut() {
		fields.insert("type".to_string(), Value::from(doc.file_type.to_lowercase()));
		fields.insert("content_length".to_string(), Value::from(doc.content.chars().count()));
		fields.insert("created_at".to_string(), Value::from(now));
		fields.insert("updated_at".to_string(), Value::from(now));
	}

	Ok(source)
}
