use serde_json::Value;

/// Posts a JSON payload to a workflow webhook.
///
/// Returns the reply body when the hook answered 2xx with JSON. Any other reply yields `None`;
/// only transport failures are errors.
pub async fn notify(url: &str, payload: &Value, timeout_ms: u64) -> crate::Result<Option<Value>> {
	let client = crate::http_client(timeout_ms)?;
	let res = client.post(url).json(payload).send().await?;
	let status = res.status();

	tracing::debug!(%status, url, "Workflow webhook answered.");

	if !status.is_success() {
		return Ok(None);
	}

	let body = res.bytes().await?;

	Ok(serde_json::from_slice(&body).ok())
}
