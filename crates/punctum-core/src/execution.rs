use serde::Serialize;

/// Ordered, append-only trace of one orchestration run. Returned verbatim to
/// the caller; the line order is the true chronological order of attempts
/// and cascade switches, so nothing here may be reordered or deduplicated.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ExecutionLog {
    lines: Vec<String>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
