use super::*;

#[test]
fn first_success_wins_and_later_candidates_stay_cold() {
    let candidates = free_candidates(&["model-a", "model-b", "model-c"]);
    let mut script = ScriptedAttempts::new(vec![success("model-a")]);
    let mut ctx = test_ctx();

    let routed = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
    )
    .expect("first candidate succeeds");

    assert_eq!(routed.model, "model-a");
    assert_eq!(routed.content, "Fractured, Solitude, Decay");
    assert_eq!(script.seen.len(), 1, "model-b and model-c were never called");
}

#[test]
fn model_used_names_the_candidate_that_answered() {
    let candidates = free_candidates(&["model-a", "model-b"]);
    let mut script = ScriptedAttempts::new(vec![bad_key(), success("model-b")]);
    let mut ctx = test_ctx();

    let routed = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
    )
    .expect("second candidate succeeds");

    // 归因必须是实际产出响应的模型，而不是列表第一个。
    assert_eq!(routed.model, "model-b");
    assert!(ctx.lines().iter().any(|line| line == "Success with model-b!"));
}

#[test]
fn execution_log_keeps_chronological_attempt_order() {
    let candidates = free_candidates(&["model-a", "model-b"]);
    let mut script = ScriptedAttempts::new(vec![rate_limited(), bad_key(), success("model-b")]);
    let mut ctx = test_ctx();

    run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
    )
    .expect("second candidate succeeds");

    let lines = ctx.lines();
    assert_eq!(lines[0], "Attempting model 1/2: model-a");
    assert!(lines[1].starts_with("[FAILURE] model-a: Status 429"));
    assert!(lines[2].starts_with("Self-healing: Retrying model-a"));
    assert_eq!(lines[3], "Attempting model 1/2: model-a (Retry 1)");
    assert!(lines[4].starts_with("[FAILURE] model-a: Status 401"));
    assert_eq!(lines[5], "Switching to fallback model...");
    assert_eq!(lines[6], "Attempting model 2/2: model-b");
    assert_eq!(lines[7], "Success with model-b!");
}

#[test]
fn exhausted_list_reports_the_total() {
    let candidates = free_candidates(&["model-a", "model-b"]);
    let mut script = ScriptedAttempts::new(vec![bad_key(), bad_key()]);
    let mut ctx = test_ctx();

    let err = run_candidate_list(
        &candidates,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
    )
    .expect_err("every candidate fails");

    assert_eq!(err.total, 2);
    assert!(ctx
        .lines()
        .iter()
        .any(|line| line == "[Error] All 2 models exhausted."));
}
