use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

static TRACE_FILE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static TRACE_SEQ: AtomicU64 = AtomicU64::new(1);

fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|v| v.as_secs() as i64)
        .unwrap_or(0)
}

fn trace_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("PUNCTUM_TRACE_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from("orchestrator-trace.log")
}

fn sanitize_text(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn append_trace_line(line: &str) {
    let lock = TRACE_FILE_LOCK.get_or_init(|| Mutex::new(()));
    let Ok(_guard) = lock.lock() else {
        return;
    };
    let file_path = trace_file_path();
    let mut file = match OpenOptions::new().create(true).append(true).open(&file_path) {
        Ok(file) => file,
        Err(err) => {
            log::warn!(
                "orchestrator trace open failed: path={}, err={}",
                file_path.display(),
                err
            );
            return;
        }
    };
    if let Err(err) = writeln!(file, "{line}") {
        log::warn!(
            "orchestrator trace write failed: path={}, err={}",
            file_path.display(),
            err
        );
    }
}

pub(super) fn next_trace_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|v| v.as_millis())
        .unwrap_or(0);
    let seq = TRACE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("trc_{millis}_{seq:x}")
}

pub(super) fn log_request_start(trace_id: &str, task: &str, mode: &str, input_count: usize) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=REQUEST_START trace_id={} task={} mode={} inputs={}",
        sanitize_text(trace_id),
        sanitize_text(task),
        sanitize_text(mode),
        input_count,
    );
    append_trace_line(&line);
}

pub(super) fn log_candidate_start(
    trace_id: &str,
    idx: usize,
    total: usize,
    model: &str,
    retry: u32,
) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=CANDIDATE_START trace_id={} candidate={}/{} model={} retry={}",
        sanitize_text(trace_id),
        idx + 1,
        total,
        sanitize_text(model),
        retry,
    );
    append_trace_line(&line);
}

pub(super) fn log_attempt_result(trace_id: &str, model: &str, outcome: &str, detail: &str) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=ATTEMPT_RESULT trace_id={} model={} outcome={} detail={}",
        sanitize_text(trace_id),
        sanitize_text(model),
        sanitize_text(outcome),
        sanitize_text(detail),
    );
    append_trace_line(&line);
}

pub(super) fn log_strategy_switch(trace_id: &str, from: &str, to: &str) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=STRATEGY_SWITCH trace_id={} from={} to={}",
        sanitize_text(trace_id),
        sanitize_text(from),
        sanitize_text(to),
    );
    append_trace_line(&line);
}

pub(super) fn log_vendor_fallback(trace_id: &str, endpoint: &str) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=VENDOR_FALLBACK trace_id={} endpoint={}",
        sanitize_text(trace_id),
        sanitize_text(endpoint),
    );
    append_trace_line(&line);
}

pub(super) fn log_request_final(trace_id: &str, model: &str, outcome: &str, elapsed_ms: u128) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=REQUEST_FINAL trace_id={} model={} outcome={} elapsed_ms={}",
        sanitize_text(trace_id),
        sanitize_text(model),
        sanitize_text(outcome),
        elapsed_ms,
    );
    append_trace_line(&line);
}
