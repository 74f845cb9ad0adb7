use serde::{Deserialize, Serialize};

const NORMALIZED_HIGH: f64 = 0.7;
const NORMALIZED_MEDIUM: f64 = 0.4;
const ABSOLUTE_HIGH: f64 = 10.0;
const ABSOLUTE_MEDIUM: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
	High,
	Medium,
	Low,
}
impl Relevance {
	/// Buckets a score relative to the best score in the same result set.
	pub fn from_normalized(score: f64, max_score: f64) -> Self {
		if !max_score.is_finite() || max_score <= 0.0 {
			return Self::Low;
		}

		let ratio = score / max_score;

		if ratio > NORMALIZED_HIGH {
			Self::High
		} else if ratio > NORMALIZED_MEDIUM {
			Self::Medium
		} else {
			Self::Low
		}
	}

	/// Buckets a raw search score. Used where results are not compared against each other.
	pub fn from_absolute(score: f64) -> Self {
		if score > ABSOLUTE_HIGH {
			Self::High
		} else if score > ABSOLUTE_MEDIUM {
			Self::Medium
		} else {
			Self::Low
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::High => "high",
			Self::Medium => "medium",
			Self::Low => "low",
		}
	}
}

/// Highest score in a result set, or zero when the set is empty.
pub fn max_score(scores: impl IntoIterator<Item = f64>) -> f64 {
	scores.into_iter().filter(|score| score.is_finite()).fold(0.0, f64::max)
}
