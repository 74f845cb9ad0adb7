use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, SemhysService};
use semhys_domain::chat::Language;

pub const SUPPORTED_TYPES: [&str; 4] =
	["contact_form", "project_update", "lead_notification", "analytics_report"];
pub const WEBHOOK_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WebhookPayload {
	ContactForm(ContactFormData),
	ProjectUpdate(ProjectUpdateData),
	LeadNotification(LeadNotificationData),
	AnalyticsReport(AnalyticsReportData),
}
impl WebhookPayload {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::ContactForm(_) => "contact_form",
			Self::ProjectUpdate(_) => "project_update",
			Self::LeadNotification(_) => "lead_notification",
			Self::AnalyticsReport(_) => "analytics_report",
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
	pub name: String,
	pub email: String,
	#[serde(default)]
	pub company: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	pub message: String,
	#[serde(default)]
	pub services: Vec<String>,
	#[serde(default)]
	pub language: Option<Language>,
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default)]
	pub timestamp: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
	Planning,
	InProgress,
	Testing,
	Completed,
	OnHold,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateData {
	pub project_id: String,
	pub project_name: String,
	pub status: ProjectStatus,
	pub progress: f64,
	pub engineer: String,
	pub client: String,
	#[serde(default)]
	pub milestone: Option<String>,
	#[serde(default)]
	pub notes: Option<String>,
	#[serde(default)]
	pub next_steps: Vec<String>,
	#[serde(default)]
	pub estimated_completion: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
	Website,
	Referral,
	SocialMedia,
	Email,
	Phone,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadPriority {
	Low,
	#[default]
	Medium,
	High,
	Urgent,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContactInfo {
	pub name: String,
	pub email: String,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub company: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadNotificationData {
	pub lead_id: String,
	pub source: LeadSource,
	pub contact_info: ContactInfo,
	#[serde(default)]
	pub service_interest: Vec<String>,
	#[serde(default)]
	pub budget: Option<String>,
	#[serde(default)]
	pub timeline: Option<String>,
	#[serde(default)]
	pub priority: Option<LeadPriority>,
	pub location: String,
	pub language: Language,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
	Daily,
	Weekly,
	Monthly,
	Custom,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DateRange {
	pub start: String,
	pub end: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
	pub website_visits: u64,
	pub contact_forms: u64,
	pub new_leads: u64,
	pub projects_completed: u64,
	#[serde(default)]
	pub revenue: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Conversions {
	pub rate: f64,
	pub total: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReportData {
	pub report_type: ReportType,
	pub date_range: DateRange,
	pub metrics: ReportMetrics,
	#[serde(default)]
	pub top_services: Vec<String>,
	#[serde(default)]
	pub top_pages: Vec<String>,
	#[serde(default)]
	pub traffic_sources: BTreeMap<String, u64>,
	pub conversions: Conversions,
}

#[derive(Clone, Debug, Serialize)]
pub struct WebhookResponse {
	pub success: bool,
	pub message: String,
	pub data: Value,
}

#[derive(Clone, Debug, Serialize)]
pub struct WebhookInfo {
	pub service: String,
	pub status: String,
	pub version: String,
	pub supported_types: Vec<String>,
	pub endpoint: String,
	pub method: String,
}

impl SemhysService {
	/// Acknowledges an inbound workflow event. The raw body is checked for a known `type` before
	/// the data is decoded so unknown events and malformed ones get different errors.
	pub fn handle_webhook(&self, body: Value) -> Result<WebhookResponse> {
		let kind = body.get("type").and_then(Value::as_str).unwrap_or_default();

		if !SUPPORTED_TYPES.contains(&kind) {
			tracing::warn!(kind, "Rejected webhook with unknown type.");

			return Err(Error::invalid("Unknown webhook type."));
		}

		let kind = kind.to_string();
		let payload: WebhookPayload = serde_json::from_value(body)
			.map_err(|err| Error::invalid(format!("Invalid {kind} payload: {err}.")))?;

		Ok(acknowledge(payload))
	}

	pub fn webhook_info(&self) -> WebhookInfo {
		WebhookInfo {
			service: "SEMHYS workflow webhook endpoint".to_string(),
			status: "active".to_string(),
			version: WEBHOOK_VERSION.to_string(),
			supported_types: SUPPORTED_TYPES.iter().map(|kind| kind.to_string()).collect(),
			endpoint: "/api/webhook".to_string(),
			method: "POST".to_string(),
		}
	}
}

fn acknowledge(payload: WebhookPayload) -> WebhookResponse {
	let millis = crate::unix_millis();

	match payload {
		WebhookPayload::ContactForm(data) => {
			tracing::info!(
				name = %data.name,
				email = %data.email,
				company = ?data.company,
				services = data.services.len(),
				language = ?data.language,
				"Contact form webhook processed."
			);

			WebhookResponse {
				success: true,
				message: "Contact form processed successfully".to_string(),
				data: serde_json::json!({
					"contactId": format!("contact_{millis}"),
					"processed": true,
					"notifications": ["email_sent", "whatsapp_sent", "crm_updated"],
				}),
			}
		},
		WebhookPayload::ProjectUpdate(data) => {
			tracing::info!(
				project_id = %data.project_id,
				project_name = %data.project_name,
				status = ?data.status,
				progress = data.progress,
				engineer = %data.engineer,
				"Project update webhook processed."
			);

			WebhookResponse {
				success: true,
				message: "Project update processed".to_string(),
				data: serde_json::json!({
					"projectId": data.project_id,
					"status": "updated",
					"notifications_sent": true,
				}),
			}
		},
		WebhookPayload::LeadNotification(data) => {
			let priority = data.priority.unwrap_or_default();

			tracing::info!(
				lead_id = %data.lead_id,
				source = ?data.source,
				contact = %data.contact_info.email,
				priority = ?priority,
				location = %data.location,
				"Lead notification webhook processed."
			);

			WebhookResponse {
				success: true,
				message: "Lead notification processed".to_string(),
				data: serde_json::json!({
					"leadId": data.lead_id,
					"assigned_to": "auto_assign",
					"priority": priority,
				}),
			}
		},
		WebhookPayload::AnalyticsReport(data) => {
			tracing::info!(
				report_type = ?data.report_type,
				start = %data.date_range.start,
				end = %data.date_range.end,
				website_visits = data.metrics.website_visits,
				new_leads = data.metrics.new_leads,
				conversion_rate = data.conversions.rate,
				"Analytics report webhook processed."
			);

			WebhookResponse {
				success: true,
				message: "Analytics report processed".to_string(),
				data: serde_json::json!({
					"reportId": format!("analytics_{millis}"),
					"metrics_processed": true,
					"report_generated": true,
				}),
			}
		},
	}
}
