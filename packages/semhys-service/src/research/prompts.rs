use std::fmt::Write as _;

use semhys_domain::research::ResearchType;

use crate::research::ResearchResult;

const CONTEXT_RESULTS: usize = 5;

const EQUIPMENT_ENGINEER: &str = "You are a specialist engineer at SEMHYS, a firm focused on \
hydraulic systems, industrial automation, and energy efficiency.

Specialties:
- Centrifugal pumps and pressure systems
- PLC and SCADA automation
- Energy efficiency analysis
- Predictive maintenance
- Instrumentation and control
- RCI (Remote Control Intelligence) systems

Response style:
- Technical but clear and direct
- Grounded in SEMHYS project experience
- Specific, measurable data
- Practical solutions with concrete recommendations

Format:
- Clear headings
- Specific technical parameters
- Next steps when appropriate";

const ANALYSIS_EXPERT: &str = "You are the lead technical analyst at SEMHYS. You analyze \
technical documents and extract useful insights.

Capabilities:
- Equipment performance analysis
- Monitoring data interpretation
- Technical fault diagnosis
- Comparison between similar systems
- Improvement opportunities

Method:
- Look for patterns and trends
- Relate information across sources
- Quantify potential benefits and savings
- Identify risks and critical points
- Propose evidence-based solutions";

const RESEARCH_ASSISTANT: &str = "You are the technical research assistant at SEMHYS. You help \
find specific information in the document base.

Role:
- Interpret complex technical queries
- Relate information spread across documents
- Write executive summaries
- Identify the most relevant documents
- Suggest related searches

Relevance criteria:
- Technical proximity to the query
- Projects with similar characteristics
- Equipment of the same type or manufacturer
- Comparable performance analyses
- Applicable lessons learned";

pub(crate) fn system_prompt(research_type: ResearchType) -> &'static str {
	match research_type {
		ResearchType::Equipment => EQUIPMENT_ENGINEER,
		ResearchType::Performance => ANALYSIS_EXPERT,
		_ => RESEARCH_ASSISTANT,
	}
}

fn focus(research_type: ResearchType) -> &'static str {
	match research_type {
		ResearchType::Equipment => "Equipment and component analysis",
		ResearchType::Performance => "Optimization and efficiency",
		_ => "Comprehensive technical research",
	}
}

pub(crate) fn user_prompt(
	query: &str,
	results: &[ResearchResult],
	research_type: ResearchType,
) -> String {
	let mut out = String::new();

	let _ = writeln!(out, "TECHNICAL QUERY: \"{query}\"\n");

	out.push_str("DOCUMENTS FOUND:\n");

	for result in results.iter().take(CONTEXT_RESULTS) {
		let _ = writeln!(
			out,
			"**{}** ({})\n{}\n---",
			result.title.as_deref().unwrap_or("Untitled"),
			result.document_type.as_deref().unwrap_or("unknown"),
			result.content_preview
		);
	}

	out.push_str(
		"\nREQUIRED ANALYSIS:\nAs a SEMHYS expert, analyze the information found and provide:\n\n\
		1. **Executive summary**: the most relevant findings\n\
		2. **Technical analysis**: specialist interpretation of the data\n\
		3. **Key insights**: patterns, trends, and opportunities\n\
		4. **Recommendations**: concrete actions backed by the evidence\n\
		5. **Next steps**: how to take the research further\n\n",
	);

	let _ = writeln!(out, "FOCUS: {}", focus(research_type));
	let _ = writeln!(out, "Documents matched for this query: {}.", results.len());

	out.push_str("Answer in the language of the query.");

	out
}
