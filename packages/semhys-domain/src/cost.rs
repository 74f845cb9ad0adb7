use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ModelPricing {
	pub model: &'static str,
	pub name: &'static str,
	/// USD per million input tokens.
	pub input_cost_per_1m: f64,
	/// USD per million output tokens.
	pub output_cost_per_1m: f64,
	pub max_tokens: u32,
}

pub const MODEL_PRICING: [ModelPricing; 2] = [
	ModelPricing {
		model: "gpt-4o-mini",
		name: "GPT-4o Mini",
		input_cost_per_1m: 0.15,
		output_cost_per_1m: 0.60,
		max_tokens: 16_384,
	},
	ModelPricing {
		model: "gpt-4o",
		name: "GPT-4o",
		input_cost_per_1m: 2.50,
		output_cost_per_1m: 10.00,
		max_tokens: 8_192,
	},
];

/// Hard ceiling on completion tokens regardless of configuration.
pub const MAX_COMPLETION_TOKENS: u32 = 2_000;

const TOKENS_PER_WORD: f64 = 1.33;
const MAX_CONFIDENCE: f64 = 0.95;

pub fn pricing(model: &str) -> Option<&'static ModelPricing> {
	MODEL_PRICING.iter().find(|pricing| pricing.model == model)
}

pub fn available_models() -> Vec<&'static str> {
	MODEL_PRICING.iter().map(|pricing| pricing.model).collect()
}

/// Rough token count for prompt budgeting. Over-estimates English slightly, which is the safe
/// direction for a request ceiling.
pub fn estimate_tokens(text: &str) -> u32 {
	let words = text.split_whitespace().count();

	(words as f64 * TOKENS_PER_WORD).ceil() as u32
}

/// Cost in USD. Models missing from the pricing table cost nothing.
pub fn estimate_cost(input_tokens: u32, output_tokens: u32, model: &str) -> f64 {
	let Some(pricing) = pricing(model) else {
		return 0.0;
	};

	(input_tokens as f64 / 1_000_000.0) * pricing.input_cost_per_1m
		+ (output_tokens as f64 / 1_000_000.0) * pricing.output_cost_per_1m
}

/// Confidence in an AI analysis from how many results backed it and how many were strong.
pub fn confidence_score(total_results: usize, high_relevance: usize) -> f64 {
	if total_results == 0 {
		return 0.0;
	}

	let volume = (total_results as f64 / 10.0) * 0.6;
	let quality = (high_relevance as f64 / total_results as f64) * 0.4;

	(volume + quality).min(MAX_CONFIDENCE)
}
