/// Synonym groups used to widen technical queries. Keywords mix Spanish and English because the
/// document corpus does.
pub const SYNONYM_GROUPS: [(&str, &[&str]); 5] = [
	("pumps", &["bomba", "pump", "impeller", "volute", "casing"]),
	("motors", &["motor", "engine", "rotor", "stator", "winding"]),
	("valves", &["válvula", "valve", "actuator", "stem", "seat"]),
	("sensors", &["sensor", "transmitter", "probe", "detector"]),
	("automation", &["plc", "scada", "hmi", "control", "automation"]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnhancedQuery {
	pub text: String,
	pub expanded_groups: Vec<&'static str>,
}

/// Lowercases the query and appends every keyword of each synonym group that the query touches.
///
/// Matching is by substring against the original query, so "controller" expands the automation
/// group. A group is appended at most once no matter how many of its keywords match.
pub fn enhance_query(query: &str) -> EnhancedQuery {
	let lowered = query.trim().to_lowercase();
	let mut text = lowered.clone();
	let mut expanded_groups = Vec::new();

	for (group, keywords) in SYNONYM_GROUPS {
		if !keywords.iter().any(|keyword| lowered.contains(keyword)) {
			continue;
		}

		for keyword in keywords {
			text.push(' ');
			text.push_str(keyword);
		}

		expanded_groups.push(group);
	}

	EnhancedQuery { text, expanded_groups }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn leaves_plain_queries_untouched() {
		let enhanced = enhance_query("  Informe Anual ");

		assert_eq!(enhanced.text, "informe anual");
		assert!(enhanced.expanded_groups.is_empty());
	}

	#[test]
	fn expands_each_group_once() {
		let enhanced = enhance_query("Bomba pump");

		assert_eq!(enhanced.text, "bomba pump bomba pump impeller volute casing");
		assert_eq!(enhanced.expanded_groups, vec!["pumps"]);
	}
}
