use std::collections::HashMap;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::super::runtime_config::{env_opt_string, env_string_or};

const DEFAULT_FALLBACK_URL: &str =
    "https://router.huggingface.co/hf-inference/models/SamLowe/roberta-base-go_emotions";
const DEFAULT_FALLBACK_MODEL_LABEL: &str = "SamLowe/roberta-base-go_emotions";

const ENV_FALLBACK_URL: &str = "PUNCTUM_EMOTION_FALLBACK_URL";
const ENV_FALLBACK_KEY: &str = "PUNCTUM_EMOTION_FALLBACK_KEY";

/// Only the most recent comments go to the classifier; it is a latency and
/// rate-limit budget, not a quality knob.
const MAX_CLASSIFIER_INPUTS: usize = 10;
const TOP_LABEL_COUNT: usize = 3;

/// A different inference backend entirely: a hosted emotion classifier with
/// its own credential. Last line of defense before the sentinel payload.
pub(crate) struct VendorFallbackConfig {
    pub(crate) endpoint: String,
    pub(crate) api_key: Option<String>,
    pub(crate) model_label: String,
}

impl VendorFallbackConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            endpoint: env_string_or(ENV_FALLBACK_URL, DEFAULT_FALLBACK_URL),
            api_key: env_opt_string(ENV_FALLBACK_KEY),
            model_label: DEFAULT_FALLBACK_MODEL_LABEL.to_string(),
        }
    }
}

/// Sum classifier scores per label across all comments, skip `neutral`, and
/// keep the strongest labels as keywords.
pub(crate) fn aggregate_label_scores(result: &Value) -> Vec<String> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    if let Some(per_comment) = result.as_array() {
        for comment_result in per_comment.iter().filter_map(Value::as_array) {
            for entry in comment_result {
                let Some(label) = entry.get("label").and_then(Value::as_str) else {
                    continue;
                };
                if label == "neutral" {
                    continue;
                }
                let score = entry.get("score").and_then(Value::as_f64).unwrap_or(0.0);
                *scores.entry(label.to_string()).or_insert(0.0) += score;
            }
        }
    }
    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    // 分数相同按标签名排序，保证结果可复现。
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(TOP_LABEL_COUNT)
        .map(|(label, _)| label)
        .collect()
}

pub(crate) fn classify_comments(
    client: &Client,
    config: &VendorFallbackConfig,
    comments: &[String],
) -> Result<Vec<String>, String> {
    let Some(key) = config.api_key.as_deref() else {
        return Err("missing classifier credential".to_string());
    };
    let start = comments.len().saturating_sub(MAX_CLASSIFIER_INPUTS);
    let inputs = &comments[start..];

    let response = client
        .post(&config.endpoint)
        .bearer_auth(key)
        .header("Content-Type", "application/json")
        .json(&json!({ "inputs": inputs }))
        .send()
        .map_err(|err| format!("classifier request failed: {err}"))?;

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let body = response.text().unwrap_or_default();
        return Err(format!("classifier error: status {status}: {body}"));
    }
    let result = response
        .json::<Value>()
        .map_err(|err| format!("classifier returned non-JSON body: {err}"))?;

    let keywords = aggregate_label_scores(&result);
    if keywords.is_empty() {
        return Err("classifier returned no usable labels".to_string());
    }
    Ok(keywords)
}
