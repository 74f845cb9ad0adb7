use axum::{
	Json, Router,
	extract::State,
	http::{HeaderMap, StatusCode, header::USER_AGENT},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use semhys_service::{
	AgentSearchRequest, AgentSearchResponse, AgentStatus, ChatRequest, ChatResponse,
	EnsureIndexResponse, Error, IndexDocumentResponse, IndexStatsResponse, NewDocument,
	ResearchRequest, ResearchResponse, ResearchStatus, WebhookInfo, WebhookResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/agent", post(agent_search).get(agent_status))
		.route("/api/research", post(research).get(research_status))
		.route("/api/chat", post(chat))
		.route("/api/webhook", post(webhook).get(webhook_info))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/index", post(ensure_index))
		.route("/v1/admin/documents", post(index_document))
		.route("/v1/admin/stats", get(index_stats))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn agent_search(
	State(state): State<AppState>,
	Json(payload): Json<AgentSearchRequest>,
) -> Result<Json<AgentSearchResponse>, ApiError> {
	let response = state.service.agent_search(payload).await?;

	Ok(Json(response))
}

async fn agent_status(State(state): State<AppState>) -> Result<Json<AgentStatus>, ApiError> {
	let response = state.service.agent_status().await?;

	Ok(Json(response))
}

async fn research(
	State(state): State<AppState>,
	Json(payload): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, ApiError> {
	let response = state.service.research(payload).await?;

	Ok(Json(response))
}

async fn research_status(State(state): State<AppState>) -> Result<Json<ResearchStatus>, ApiError> {
	let response = state.service.research_status().await?;

	Ok(Json(response))
}

async fn chat(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let user_agent = headers.get(USER_AGENT).and_then(|value| value.to_str().ok());
	let response = state.service.chat(payload, user_agent).await?;

	Ok(Json(response))
}

async fn webhook(
	State(state): State<AppState>,
	Json(payload): Json<Value>,
) -> Result<Json<WebhookResponse>, ApiError> {
	let response = state.service.handle_webhook(payload)?;

	Ok(Json(response))
}

async fn webhook_info(State(state): State<AppState>) -> Json<WebhookInfo> {
	Json(state.service.webhook_info())
}

async fn ensure_index(
	State(state): State<AppState>,
) -> Result<Json<EnsureIndexResponse>, ApiError> {
	let response = state.service.ensure_index().await?;

	Ok(Json(response))
}

async fn index_document(
	State(state): State<AppState>,
	Json(payload): Json<NewDocument>,
) -> Result<Json<IndexDocumentResponse>, ApiError> {
	let response = state.service.index_document(payload).await?;

	Ok(Json(response))
}

async fn index_stats(State(state): State<AppState>) -> Result<Json<IndexStatsResponse>, ApiError> {
	let response = state.service.index_stats().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	success: bool,
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	suggestion: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	suggestion: Option<String>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		suggestion: Option<String>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), suggestion }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, suggestion } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, suggestion),
			Error::SearchUnavailable => ApiError::new(
				StatusCode::SERVICE_UNAVAILABLE,
				"SEARCH_UNAVAILABLE",
				"Search service is unavailable.",
				Some("Try again in a few minutes.".to_string()),
			),
			Error::Search { message } => {
				tracing::error!(error = %message, "Search request failed.");

				ApiError::new(
					StatusCode::BAD_GATEWAY,
					"SEARCH_ERROR",
					"The search service returned an error.",
					Some("Rephrase the query or contact support.".to_string()),
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			success: false,
			error_code: self.error_code,
			message: self.message,
			suggestion: self.suggestion,
		};

		(self.status, Json(body)).into_response()
	}
}
