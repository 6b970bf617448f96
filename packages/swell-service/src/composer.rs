use std::time::Duration;

use futures::{StreamExt, stream};
use serde_json::Value;

use crate::{MessageProvider, RankedCoordi};
use swell_config::Config;
use swell_domain::Gender;

const SYSTEM_PROMPT: &str = "\
You write one short, friendly sentence in Korean recommending a fashion outfit to a user. \
Mention why it fits them. Do not use hashtags, emojis or quotation marks. \
Answer with the sentence only.";

/// Builds the chat messages describing one recommended outfit.
pub fn build_messages(item: &RankedCoordi, gender: Option<Gender>) -> Vec<Value> {
	let audience = gender.map(Gender::as_str).unwrap_or("any");
	let user_prompt = format!(
		"Outfit: {description}\nOutfit gender: {outfit_gender}\nUser gender: {audience}\n\
		 Hashtag ids: {hashtags:?}\nWhy it was picked: it {reason}.",
		description = item.coordi.description,
		outfit_gender = item.coordi.gender.as_str(),
		hashtags = item.coordi.hashtag_ids,
		reason = item.reason.describe(),
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

/// Produces one message per item, in item order.
///
/// Calls run concurrently up to `composer.max_concurrency`, each bounded by
/// `composer.timeout_ms`. A failed or timed-out call yields `composer.fallback_message` for that
/// item only. Dropping the returned future cancels the calls still in flight.
pub async fn compose_messages(
	cfg: &Config,
	provider: &dyn MessageProvider,
	gender: Option<Gender>,
	items: &[RankedCoordi],
) -> Vec<String> {
	let composer = &cfg.composer;

	if !composer.enabled {
		return vec![composer.fallback_message.clone(); items.len()];
	}

	let timeout = Duration::from_millis(composer.timeout_ms);
	let concurrency = (composer.max_concurrency as usize).max(1);

	let calls: Vec<_> = items
		.iter()
		.map(|item| async move {
			let messages = build_messages(item, gender);
			let call = provider.compose(&cfg.providers.composer, &messages);

			match tokio::time::timeout(timeout, call).await {
				Ok(Ok(message)) => message,
				Ok(Err(err)) => {
					tracing::warn!(
						error = %err,
						coordi_id = item.coordi.coordi_id,
						"Message composer failed. Using fallback message."
					);

					composer.fallback_message.clone()
				},
				Err(_) => {
					tracing::warn!(
						coordi_id = item.coordi.coordi_id,
						timeout_ms = composer.timeout_ms,
						"Message composer timed out. Using fallback message."
					);

					composer.fallback_message.clone()
				},
			}
		})
		.collect();

	stream::iter(calls)
		.buffered(concurrency)
		.collect()
		.await
}
