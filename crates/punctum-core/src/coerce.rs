use std::fmt;

use serde_json::Value;

/// Downstream UI always renders exactly three keyword slots.
pub const KEYWORD_ARITY: usize = 3;
/// Tokens at or past this length are model rambling, not keywords.
pub const MAX_KEYWORD_CHARS: usize = 50;
/// Filler for short keyword lists so the caller never sees a ragged result.
pub const PLACEHOLDER_KEYWORD: &str = "Undefined";

/// No JSON-shaped substring could be recovered from the model output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub detail: String,
}

impl ParseError {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not coerce model output: {}", self.detail)
    }
}

impl std::error::Error for ParseError {}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 中文注释：```json / ```JSON 之类的语言标签只到行尾，剥掉它再找结尾围栏。
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn first_braced_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Best-effort recovery of a JSON object from loosely formatted model text.
/// Strips code fences, tries a direct parse, then falls back to the first
/// `{...}`-delimited substring. Fails only when no braces exist at all.
pub fn coerce_json(raw: &str) -> Result<Value, ParseError> {
    let stripped = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return Ok(value);
    }
    let Some(braced) = first_braced_slice(stripped) else {
        return Err(ParseError::new("no JSON object found in response"));
    };
    serde_json::from_str::<Value>(braced)
        .map_err(|err| ParseError::new(format!("embedded object did not parse: {err}")))
}

/// Keyword-list variant: split a comma-separated line, trim quote/period
/// noise, drop empty and over-length tokens, and pad to a fixed arity so the
/// UI never receives a short list. Deliberately never fails.
pub fn keywords_from_content(content: &str) -> Vec<String> {
    let cleaned: String = content
        .chars()
        .filter(|ch| *ch != '"' && *ch != '\u{201c}' && *ch != '\u{201d}' && *ch != '.')
        .collect();
    let mut keywords: Vec<String> = cleaned
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.chars().count() < MAX_KEYWORD_CHARS)
        .take(KEYWORD_ARITY)
        .map(str::to_string)
        .collect();
    while keywords.len() < KEYWORD_ARITY {
        keywords.push(PLACEHOLDER_KEYWORD.to_string());
    }
    keywords
}
