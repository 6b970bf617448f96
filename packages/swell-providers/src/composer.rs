use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

use swell_config::LlmProviderConfig;

/// Asks the chat model for a short personalized blurb and returns its text.
pub async fn compose(cfg: &LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_message_content(json)
}

fn parse_message_content(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| eyre::eyre!("Composer response is missing message content."))?;
	let trimmed = content.trim().trim_matches('"').trim();

	if trimmed.is_empty() {
		return Err(eyre::eyre!("Composer response content is empty."));
	}

	Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_trimmed_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "  \"데님으로 완성한 편안한 주말 룩!\"\n" } }
			]
		});
		let parsed = parse_message_content(json).expect("parse failed");
		assert_eq!(parsed, "데님으로 완성한 편안한 주말 룩!");
	}

	#[test]
	fn blank_content_is_an_error() {
		let json = serde_json::json!({
			"choices": [{ "message": { "content": "   " } }]
		});
		assert!(parse_message_content(json).is_err());
	}

	#[test]
	fn missing_choices_is_an_error() {
		assert!(parse_message_content(serde_json::json!({ "id": "x" })).is_err());
	}
}
