use punctum_core::candidate::RoutingMode;
use serde_json::Value;

/// Request rejected before any provider was contacted. The only errors the
/// HTTP layer surfaces as non-200; everything past validation degrades to a
/// sentinel payload instead.
#[derive(Debug)]
pub(super) struct LocalValidationError {
    pub(super) status_code: u16,
    pub(super) message: String,
}

impl LocalValidationError {
    pub(super) fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }
}

#[derive(Debug)]
pub(super) struct KeywordRequest {
    pub(super) comments: Vec<String>,
    pub(super) mode: RoutingMode,
}

#[derive(Debug)]
pub(super) struct VisionRequest {
    pub(super) image_url: String,
    pub(super) user_context: Option<String>,
    pub(super) mode: RoutingMode,
}

#[derive(Debug)]
pub(super) struct ConsensusRequest {
    pub(super) ai_analysis: Value,
    pub(super) human_comments: Vec<String>,
    pub(super) mode: RoutingMode,
}

fn parse_body(body: &[u8]) -> Result<Value, LocalValidationError> {
    serde_json::from_slice(body)
        .map_err(|_| LocalValidationError::bad_request("request body must be valid JSON"))
}

fn parse_mode(payload: &Value) -> RoutingMode {
    RoutingMode::parse(payload.get("mode").and_then(Value::as_str))
}

/// 兼容 camelCase 和 snake_case 两种键名。
fn field<'a>(payload: &'a Value, snake: &str, camel: &str) -> Option<&'a Value> {
    payload.get(snake).or_else(|| payload.get(camel))
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

pub(super) fn parse_keyword_request(body: &[u8]) -> Result<KeywordRequest, LocalValidationError> {
    let payload = parse_body(body)?;
    let comments = payload
        .get("comments")
        .and_then(string_array)
        .ok_or_else(|| LocalValidationError::bad_request("'comments' must be an array of strings"))?;
    Ok(KeywordRequest {
        comments,
        mode: parse_mode(&payload),
    })
}

pub(super) fn parse_vision_request(body: &[u8]) -> Result<VisionRequest, LocalValidationError> {
    let payload = parse_body(body)?;
    let image_url = field(&payload, "image_url", "imageUrl")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| LocalValidationError::bad_request("Image URL is required"))?;
    let user_context = field(&payload, "user_context", "userContext")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Ok(VisionRequest {
        image_url,
        user_context,
        mode: parse_mode(&payload),
    })
}

pub(super) fn parse_consensus_request(
    body: &[u8],
) -> Result<ConsensusRequest, LocalValidationError> {
    let payload = parse_body(body)?;
    let ai_analysis = field(&payload, "ai_analysis", "aiAnalysis")
        .filter(|value| !value.is_null())
        .cloned()
        .ok_or_else(|| LocalValidationError::bad_request("'ai_analysis' is required"))?;
    let human_comments = field(&payload, "human_comments", "humanComments")
        .and_then(string_array)
        .ok_or_else(|| {
            LocalValidationError::bad_request("'human_comments' must be an array of strings")
        })?;
    Ok(ConsensusRequest {
        ai_analysis,
        human_comments,
        mode: parse_mode(&payload),
    })
}
