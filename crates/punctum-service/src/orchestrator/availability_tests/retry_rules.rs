use super::*;

#[test]
fn transient_failures_retry_on_the_same_candidate() {
    let candidates = free_candidates(&["model-a"]);
    let mut script = ScriptedAttempts::new(vec![
        rate_limited(),
        rate_limited(),
        success("model-a"),
    ]);
    let mut ctx = test_ctx();
    let mut pauses = Vec::new();

    let routed = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |delay| pauses.push(delay),
    )
    .expect("third attempt succeeds");

    assert_eq!(routed.model, "model-a");
    assert_eq!(
        script.seen,
        vec![
            ("model-a".to_string(), 0),
            ("model-a".to_string(), 1),
            ("model-a".to_string(), 2),
        ]
    );
    assert_eq!(pauses.len(), 2);
    let healing = ctx
        .lines()
        .iter()
        .filter(|line| line.starts_with("Self-healing"))
        .count();
    assert_eq!(healing, 2);
}

#[test]
fn retry_budget_is_per_candidate_not_per_run() {
    let candidates = free_candidates(&["model-a", "model-b"]);
    // model-a 烧完 1+cap 次后换 model-b，model-b 仍然有完整的重试额度。
    let mut script = ScriptedAttempts::new(vec![
        rate_limited(),
        rate_limited(),
        rate_limited(),
        rate_limited(),
        success("model-b"),
    ]);
    let mut ctx = test_ctx();

    let routed = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
    )
    .expect("second candidate succeeds");

    assert_eq!(routed.model, "model-b");
    assert_eq!(script.seen[0..3], [
        ("model-a".to_string(), 0),
        ("model-a".to_string(), 1),
        ("model-a".to_string(), 2),
    ]);
    // 换候选后 retry 计数归零。
    assert_eq!(script.seen[3], ("model-b".to_string(), 0));
}

#[test]
fn fatal_outcome_skips_remaining_retry_budget() {
    let candidates = free_candidates(&["model-a", "model-b"]);
    let mut script = ScriptedAttempts::new(vec![bad_key(), success("model-b")]);
    let mut ctx = test_ctx();
    let mut pauses = Vec::new();

    let routed = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |delay| pauses.push(delay),
    )
    .expect("fallback succeeds");

    assert_eq!(routed.model, "model-b");
    assert_eq!(script.seen.len(), 2);
    assert!(pauses.is_empty(), "fatal outcomes never wait");
    assert!(ctx
        .lines()
        .iter()
        .any(|line| line == "Switching to fallback model..."));
}

#[test]
fn exhausted_candidate_caps_attempts_at_one_plus_retry_cap() {
    let candidates = free_candidates(&["model-a"]);
    let mut script = ScriptedAttempts::new(vec![
        rate_limited(),
        rate_limited(),
        rate_limited(),
    ]);
    let mut ctx = test_ctx();

    let err = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
    )
    .expect_err("single candidate exhausts");

    assert_eq!(err.total, 1);
    assert_eq!(script.seen.len(), 3);
}
