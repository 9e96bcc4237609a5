use serde_json::Value;

/// Classified result of one provider call. `Fatal` only rules out the
/// current candidate; the run moves on to the next one in the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AttemptOutcome {
    Success { content: String, model: String },
    Retryable { detail: String },
    Fatal { detail: String },
}

impl AttemptOutcome {
    pub(crate) fn retryable(detail: impl Into<String>) -> Self {
        AttemptOutcome::Retryable {
            detail: detail.into(),
        }
    }

    pub(crate) fn fatal(detail: impl Into<String>) -> Self {
        AttemptOutcome::Fatal {
            detail: detail.into(),
        }
    }
}

/// 429 和 5xx 多为限流或冷启动抖动，短暂退避后常能自愈；其余非 2xx 是
/// 鉴权或校验类错误，重试只会烧掉超时预算。
pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

/// Pull the assistant message text (and the provider-reported model id, if
/// any) out of a chat-completion body.
pub(crate) fn extract_message_content(value: &Value) -> Option<(String, Option<String>)> {
    let content = value
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
        .filter(|text| !text.is_empty())?;
    let model = value
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some((content, model))
}

fn error_detail_from_body(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|err| err.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "AI Grid Error".to_string());
    format!("Status {status} ({message})")
}

pub(crate) fn classify_http_response(
    response: reqwest::blocking::Response,
    requested_model: &str,
) -> AttemptOutcome {
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let body = response.text().unwrap_or_default();
        let detail = error_detail_from_body(status, &body);
        if is_retryable_status(status) {
            return AttemptOutcome::retryable(detail);
        }
        return AttemptOutcome::fatal(detail);
    }

    let value = match response.json::<Value>() {
        Ok(value) => value,
        Err(err) => {
            // 2xx 但响应体不是 JSON，按瞬时故障处理而不是立刻判死。
            return AttemptOutcome::retryable(format!("unreadable response body: {err}"));
        }
    };
    match extract_message_content(&value) {
        Some((content, model)) => AttemptOutcome::Success {
            content,
            model: model.unwrap_or_else(|| requested_model.to_string()),
        },
        None => AttemptOutcome::retryable("unexpected response shape (missing choices/content)"),
    }
}

pub(crate) fn classify_transport_error(err: &reqwest::Error, timeout_secs: u64) -> AttemptOutcome {
    if err.is_timeout() {
        return AttemptOutcome::retryable(format!("Timeout ({timeout_secs}s limit)"));
    }
    AttemptOutcome::retryable(format!("network error: {err}"))
}
