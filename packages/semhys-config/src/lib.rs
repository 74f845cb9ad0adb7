mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Llm, Search, Security, Service, Workflow};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("search.node", &cfg.search.node),
		("llm.api_base", &cfg.llm.api_base),
		("llm.model", &cfg.llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}
	for (label, url) in [
		("search.node", Some(cfg.search.node.as_str())),
		("llm.api_base", Some(cfg.llm.api_base.as_str())),
		("workflow.webhook_url", cfg.workflow.webhook_url.as_deref()),
		("workflow.chat_webhook_url", cfg.workflow.chat_webhook_url.as_deref()),
	] {
		if let Some(url) = url
			&& !is_http_url(url)
		{
			return Err(Error::Validation {
				message: format!("{label} must be an http or https URL."),
			});
		}
	}

	let index = cfg.search.index.as_str();

	if index.is_empty() {
		return Err(Error::Validation { message: "search.index must be non-empty.".to_string() });
	}
	if index.chars().any(|ch| ch.is_uppercase() || ch.is_whitespace()) {
		return Err(Error::Validation {
			message: "search.index must be lowercase without whitespace.".to_string(),
		});
	}

	for (label, size) in [
		("search.default_size", cfg.search.default_size),
		("search.technical_size", cfg.search.technical_size),
		("search.research_size", cfg.search.research_size),
	] {
		if size == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}
	for (label, timeout) in [
		("search.timeout_ms", cfg.search.timeout_ms),
		("llm.timeout_ms", cfg.llm.timeout_ms),
		("workflow.timeout_ms", cfg.workflow.timeout_ms),
	] {
		if timeout == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if !cfg.llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&cfg.llm.temperature) {
		return Err(Error::Validation {
			message: "llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.llm.max_tokens_per_request == 0 {
		return Err(Error::Validation {
			message: "llm.max_tokens_per_request must be greater than zero.".to_string(),
		});
	}
	if !cfg.llm.max_monthly_cost.is_finite() {
		return Err(Error::Validation {
			message: "llm.max_monthly_cost must be a finite number.".to_string(),
		});
	}
	if cfg.llm.max_monthly_cost < 0.0 {
		return Err(Error::Validation {
			message: "llm.max_monthly_cost must be zero or greater.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for slot in [
		&mut cfg.search.api_key,
		&mut cfg.llm.api_key,
		&mut cfg.workflow.webhook_url,
		&mut cfg.workflow.chat_webhook_url,
	] {
		if slot.as_deref().map(|value| value.trim().is_empty()).unwrap_or(false) {
			*slot = None;
		}
	}

	cfg.search.node = cfg.search.node.trim_end_matches('/').to_string();
	cfg.llm.api_base = cfg.llm.api_base.trim_end_matches('/').to_string();
}

fn is_http_url(url: &str) -> bool {
	url.starts_with("http://") || url.starts_with("https://")
}
