use punctum_core::candidate::ModelCandidate;
use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::super::runtime_config::OrchestratorConfig;
use super::outcome::{self, AttemptOutcome};

fn send_chat_request(
    client: &Client,
    config: &OrchestratorConfig,
    model: &str,
    messages: &Value,
) -> Result<reqwest::blocking::Response, reqwest::Error> {
    let url = format!("{}/chat/completions", config.provider_base_url);
    let mut builder = client
        .post(url)
        .header("Content-Type", "application/json")
        // Referer/title headers are cosmetic provider attribution, not auth.
        .header("HTTP-Referer", config.site_url.as_str())
        .header("X-Title", config.site_name.as_str());
    if let Some(key) = config.provider_api_key.as_deref() {
        builder = builder.bearer_auth(key);
    }
    builder
        .json(&json!({ "model": model, "messages": messages }))
        .send()
}

/// One network attempt against one candidate, folded into a classified
/// outcome. Retry-or-move-on is not decided here.
pub(crate) fn execute_attempt(
    client: &Client,
    config: &OrchestratorConfig,
    candidate: &ModelCandidate,
    messages: &Value,
) -> AttemptOutcome {
    match send_chat_request(client, config, &candidate.id, messages) {
        Ok(response) => outcome::classify_http_response(response, &candidate.id),
        Err(err) => outcome::classify_transport_error(&err, config.call_timeout.as_secs()),
    }
}
