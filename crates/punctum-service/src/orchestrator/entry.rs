use punctum_core::candidate::{RoutingMode, TaskKind};
use punctum_core::coerce;
use serde_json::{json, Map, Value};
use tiny_http::{Header, Request, Response};

use super::execution_context::RunContext;
use super::local_validation::{
    self, ConsensusRequest, KeywordRequest, LocalValidationError, VisionRequest,
};
use super::upstream::cascade::{self, CascadeOutcome};

const SENTINEL_KEYWORDS: [&str; 3] = ["Signal", "Lost", "Entropy"];
const SENTINEL_MODEL: &str = "Fallback System";
const EXHAUSTED_ERROR: &str = "All providers and fallbacks exhausted";

fn read_body(request: &mut Request) -> Vec<u8> {
    let mut body = Vec::new();
    let _ = request.as_reader().read_to_end(&mut body);
    body
}

fn respond_json(request: Request, status: u16, payload: &Value) {
    let mut response = Response::from_string(payload.to_string()).with_status_code(status);
    if let Ok(header) =
        Header::from_bytes(b"Content-Type".as_slice(), b"application/json".as_slice())
    {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}

fn respond_validation_error(request: Request, err: LocalValidationError) {
    respond_json(request, err.status_code, &json!({ "error": err.message }));
}

pub(crate) fn handle_extract_emotions(mut request: Request) {
    let body = read_body(&mut request);
    let KeywordRequest { comments, mode } = match local_validation::parse_keyword_request(&body) {
        Ok(parsed) => parsed,
        Err(err) => return respond_validation_error(request, err),
    };

    // 没有评论就没有可分析的内容；不打任何上游调用。
    if comments.iter().all(|comment| comment.trim().is_empty()) {
        return respond_json(
            request,
            200,
            &json!({ "keywords": [], "model_used": "None" }),
        );
    }

    let prompt = punctum_core::shape::keyword_prompt(&comments);
    let messages = punctum_core::shape::keyword_messages(&prompt);
    let mut ctx = RunContext::new(TaskKind::Keywords, mode, comments.len());

    let payload = match cascade::run_inference(
        mode,
        TaskKind::Keywords,
        &messages,
        Some(&comments),
        &mut ctx,
    ) {
        CascadeOutcome::Routed { content, model } => {
            ctx.finish(&model, "success");
            json!({
                "keywords": coerce::keywords_from_content(&content),
                "model_used": model,
                "execution_log": ctx.into_lines(),
                "prompt": prompt,
            })
        }
        CascadeOutcome::VendorKeywords { keywords, model } => {
            ctx.finish(&model, "vendor");
            json!({
                "keywords": keywords,
                "model_used": model,
                "execution_log": ctx.into_lines(),
                "prompt": prompt,
            })
        }
        CascadeOutcome::Exhausted => {
            ctx.finish(SENTINEL_MODEL, "exhausted");
            json!({
                "keywords": SENTINEL_KEYWORDS,
                "model_used": SENTINEL_MODEL,
                "error": EXHAUSTED_ERROR,
                "execution_log": ctx.into_lines(),
                "prompt": prompt,
            })
        }
    };
    // 降级也是正常业务结果，统一回 200，前端靠 model_used 区分。
    respond_json(request, 200, &payload);
}

/// Merge the coerced model object with the routing envelope. Envelope keys
/// overwrite colliding model keys.
fn analysis_payload(parsed: Value, model: String, log: Vec<String>) -> Value {
    let mut merged = match parsed {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("analysis".to_string(), other);
            map
        }
    };
    merged.insert("success".to_string(), Value::Bool(true));
    merged.insert("model_used".to_string(), Value::String(model));
    merged.insert("execution_log".to_string(), json!(log));
    Value::Object(merged)
}

fn degraded_payload(error: String, log: Vec<String>) -> Value {
    json!({
        "success": false,
        "error": error,
        "model_used": SENTINEL_MODEL,
        "execution_log": log,
    })
}

fn run_analysis(
    request: Request,
    kind: TaskKind,
    mode: RoutingMode,
    messages: Value,
    input_count: usize,
) {
    let mut ctx = RunContext::new(kind, mode, input_count);
    let payload = match cascade::run_inference(mode, kind, &messages, None, &mut ctx) {
        CascadeOutcome::Routed { content, model } => match coerce::coerce_json(&content) {
            Ok(parsed) => {
                ctx.finish(&model, "success");
                analysis_payload(parsed, model, ctx.into_lines())
            }
            Err(err) => {
                // 路由已经成功，解析失败不再重新路由，回降级负载。
                ctx.finish(&model, "parse_error");
                degraded_payload(err.to_string(), ctx.into_lines())
            }
        },
        CascadeOutcome::VendorKeywords { .. } | CascadeOutcome::Exhausted => {
            ctx.finish(SENTINEL_MODEL, "exhausted");
            degraded_payload(EXHAUSTED_ERROR.to_string(), ctx.into_lines())
        }
    };
    respond_json(request, 200, &payload);
}

pub(crate) fn handle_analyze_vision(mut request: Request) {
    let body = read_body(&mut request);
    let VisionRequest {
        image_url,
        user_context,
        mode,
    } = match local_validation::parse_vision_request(&body) {
        Ok(parsed) => parsed,
        Err(err) => return respond_validation_error(request, err),
    };
    let messages = punctum_core::shape::vision_messages(&image_url, user_context.as_deref());
    run_analysis(request, TaskKind::Vision, mode, messages, 1);
}

pub(crate) fn handle_analyze_consensus(mut request: Request) {
    let body = read_body(&mut request);
    let ConsensusRequest {
        ai_analysis,
        human_comments,
        mode,
    } = match local_validation::parse_consensus_request(&body) {
        Ok(parsed) => parsed,
        Err(err) => return respond_validation_error(request, err),
    };
    let messages = punctum_core::shape::consensus_messages(&ai_analysis, &human_comments);
    run_analysis(
        request,
        TaskKind::Consensus,
        mode,
        messages,
        human_comments.len(),
    );
}
