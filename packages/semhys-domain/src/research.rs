use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Weighted technical vocabulary. Matching terms become boosted `match` clauses on content.
pub const TECHNICAL_TERMS: [(&str, f32); 9] = [
	("sistemas hidráulicos", 3.0),
	("bombas centrífugas", 2.8),
	("presión diferencial", 2.6),
	("caudal volumétrico", 2.4),
	("eficiencia energética", 2.2),
	("automatización industrial", 2.0),
	("válvulas de control", 1.8),
	("instrumentación", 1.6),
	("mantenimiento predictivo", 1.4),
];

pub const DOCUMENT_CATEGORIES: [&str; 8] = [
	"hydraulic_systems",
	"pump_analysis",
	"flow_measurement",
	"pressure_control",
	"automation",
	"electrical_systems",
	"maintenance_reports",
	"technical_specifications",
];

pub const RESEARCH_FILE_TYPES: [&str; 5] = ["pdf", "docx", "xlsx", "txt", "doc"];

/// Documents shorter than this are treated as stubs and filtered out of research queries.
pub const MIN_CONTENT_LENGTH: u32 = 100;

const TYPE_RULES: [(&[&str], ResearchType); 6] = [
	(&["bomba", "pump"], ResearchType::Equipment),
	(&["eficiencia", "rendimiento"], ResearchType::Performance),
	(&["mantenimiento", "diagnóstico"], ResearchType::Maintenance),
	(&["especificación", "datasheet"], ResearchType::Specifications),
	(&["comparar", "diferencia"], ResearchType::Comparative),
	(&["proyecto", "anterior"], ResearchType::History),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchType {
	#[default]
	General,
	Equipment,
	Performance,
	Maintenance,
	Specifications,
	Comparative,
	History,
}
impl ResearchType {
	pub const ALL: [Self; 7] = [
		Self::General,
		Self::Equipment,
		Self::Performance,
		Self::Maintenance,
		Self::Specifications,
		Self::Comparative,
		Self::History,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::General => "general",
			Self::Equipment => "equipment",
			Self::Performance => "performance",
			Self::Maintenance => "maintenance",
			Self::Specifications => "specifications",
			Self::Comparative => "comparative",
			Self::History => "history",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Self::General => "General technical analysis",
			Self::Equipment => "Equipment and component analysis",
			Self::Performance => "Performance and efficiency analysis",
			Self::Maintenance => "Maintenance and diagnostics analysis",
			Self::Specifications => "Technical specification lookup",
			Self::Comparative => "Comparative analysis between systems",
			Self::History => "History of similar projects",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TechnicalTerm {
	pub term: String,
	pub weight: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResearchAnalysis {
	pub research_type: ResearchType,
	pub technical_terms: Vec<TechnicalTerm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
	pub key: String,
	pub doc_count: u64,
}

/// Detects the research type and the weighted technical terms a query mentions.
///
/// Type rules are checked in order and the last one that matches wins, so "pump maintenance"
/// is a maintenance query.
pub fn analyze_research_query(query: &str) -> ResearchAnalysis {
	let lowered = query.to_lowercase();
	let mut research_type = ResearchType::General;

	for (keywords, candidate) in TYPE_RULES {
		if keywords.iter().any(|keyword| lowered.contains(keyword)) {
			research_type = candidate;
		}
	}

	let technical_terms = TECHNICAL_TERMS
		.iter()
		.filter(|(term, _)| lowered.contains(term))
		.map(|(term, weight)| TechnicalTerm { term: (*term).to_string(), weight: *weight })
		.collect();

	ResearchAnalysis { research_type, technical_terms }
}

/// Markdown summary built from the search response alone. Used when no AI analysis is available.
pub fn summarize(
	query: &str,
	analysis: &ResearchAnalysis,
	total_documents: u64,
	equipment_buckets: &[Bucket],
) -> String {
	let mut out = String::new();

	let _ = writeln!(out, "**SEMHYS research**: {}", analysis.research_type.description());
	let _ = writeln!(out, "**Documents found**: {total_documents}");
	let _ = writeln!(out, "**Query**: \"{query}\"");

	out.push('\n');

	if !analysis.technical_terms.is_empty() {
		out.push_str("**Technical terms detected**:\n");

		for term in &analysis.technical_terms {
			let _ = writeln!(out, "- {} (weight: {})", term.term, term.weight);
		}

		out.push('\n');
	}
	if !equipment_buckets.is_empty() {
		out.push_str("**Equipment types found**:\n");

		for bucket in equipment_buckets.iter().take(5) {
			let _ = writeln!(out, "- {}: {} documents", bucket.key, bucket.doc_count);
		}

		out.push('\n');
	}

	out
}

pub fn no_results_summary(query: &str) -> String {
	format!(
		"**No technical documents found** for \"{query}\"\n\n**Suggestions**:\n- Try more specific terms\n- Check technical spelling\n- Use synonyms for equipment or processes"
	)
}

pub fn no_results_suggestions() -> Vec<String> {
	vec![
		"Try terms such as \"bomba\", \"presión\", \"caudal\", or \"RCI\"".to_string(),
		"Include specific project names".to_string(),
		"Search by equipment type or brand".to_string(),
	]
}
