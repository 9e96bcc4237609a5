use super::*;

fn no_vendor(_: &mut RunContext) -> Option<(Vec<String>, String)> {
    None
}

#[test]
fn free_mode_escalates_free_then_auto_then_paid() {
    assert_eq!(
        cascade_strategies(RoutingMode::Free),
        [Strategy::Free, Strategy::Auto, Strategy::Paid]
    );
    assert_eq!(
        cascade_strategies(RoutingMode::Paid),
        [Strategy::Auto, Strategy::Paid]
    );
}

#[test]
fn cascade_walks_tiers_in_order_until_one_answers() {
    let sets = sets(&["free-a"], &["auto-a"], &["paid-a"]);
    let mut script = ScriptedAttempts::new(vec![bad_key(), bad_key(), success("paid-a")]);
    let mut ctx = test_ctx();

    let outcome = run_cascade_with(
        RoutingMode::Free,
        TaskKind::Keywords,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut no_vendor,
    );

    let CascadeOutcome::Routed { model, .. } = outcome else {
        panic!("expected a routed response");
    };
    assert_eq!(model, "paid-a");
    let tried: Vec<&str> = script.seen.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(tried, ["free-a", "auto-a", "paid-a"]);
    let switches: Vec<&String> = ctx
        .lines()
        .iter()
        .filter(|line| line.starts_with("[Cascade] Strategy"))
        .collect();
    assert_eq!(switches.len(), 2);
    assert!(switches[0].contains("'free' exhausted; switching to 'auto'"));
    assert!(switches[1].contains("'auto' exhausted; switching to 'paid'"));
}

#[test]
fn paid_mode_never_touches_free_lists() {
    let sets = sets(&["free-a"], &["auto-a"], &["paid-a"]);
    let mut script = ScriptedAttempts::new(vec![success("auto-a")]);
    let mut ctx = RunContext::new(TaskKind::Keywords, RoutingMode::Paid, 1);

    let outcome = run_cascade_with(
        RoutingMode::Paid,
        TaskKind::Keywords,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut no_vendor,
    );

    assert!(matches!(outcome, CascadeOutcome::Routed { .. }));
    let tried: Vec<&str> = script.seen.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(tried, ["auto-a"]);
}

#[test]
fn empty_tiers_are_skipped_without_a_switch_line() {
    let sets = sets(&["free-a"], &[], &["paid-a"]);
    let mut script = ScriptedAttempts::new(vec![bad_key(), success("paid-a")]);
    let mut ctx = test_ctx();

    let outcome = run_cascade_with(
        RoutingMode::Free,
        TaskKind::Keywords,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut no_vendor,
    );

    assert!(matches!(outcome, CascadeOutcome::Routed { .. }));
    let switches = ctx
        .lines()
        .iter()
        .filter(|line| line.starts_with("[Cascade] Strategy"))
        .count();
    assert_eq!(switches, 1, "empty auto tier produces no switch of its own");
}

#[test]
fn vision_tasks_route_through_the_vision_free_list() {
    let mut sets = sets(&["text-free"], &[], &[]);
    sets.vision_free = free_candidates(&["vision-free"]);
    let mut script = ScriptedAttempts::new(vec![success("vision-free")]);
    let mut ctx = RunContext::new(TaskKind::Vision, RoutingMode::Free, 1);

    run_cascade_with(
        RoutingMode::Free,
        TaskKind::Vision,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut no_vendor,
    );

    assert_eq!(script.seen[0].0, "vision-free");
}

#[test]
fn keyword_exhaustion_falls_back_to_the_vendor_classifier() {
    let sets = sets(&["free-a"], &[], &[]);
    let mut script = ScriptedAttempts::new(vec![bad_key()]);
    let mut ctx = test_ctx();
    let mut vendor_calls = 0u32;

    let outcome = run_cascade_with(
        RoutingMode::Free,
        TaskKind::Keywords,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut |_: &mut RunContext| {
            vendor_calls += 1;
            Some((
                vec!["grief".to_string(), "awe".to_string(), "calm".to_string()],
                "SamLowe/roberta-base-go_emotions".to_string(),
            ))
        },
    );

    assert_eq!(vendor_calls, 1);
    let CascadeOutcome::VendorKeywords { keywords, model } = outcome else {
        panic!("expected vendor keywords");
    };
    assert_eq!(keywords.len(), 3);
    assert_eq!(model, "SamLowe/roberta-base-go_emotions");
}

#[test]
fn vendor_failure_leaves_the_run_exhausted() {
    let sets = sets(&["free-a"], &[], &[]);
    let mut script = ScriptedAttempts::new(vec![bad_key()]);
    let mut ctx = test_ctx();

    let outcome = run_cascade_with(
        RoutingMode::Free,
        TaskKind::Keywords,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut no_vendor,
    );

    assert!(matches!(outcome, CascadeOutcome::Exhausted));
}

#[test]
fn non_keyword_tasks_skip_the_vendor_classifier() {
    let sets = sets(&["free-a"], &[], &[]);
    let mut script = ScriptedAttempts::new(vec![bad_key()]);
    let mut ctx = RunContext::new(TaskKind::Consensus, RoutingMode::Free, 1);
    let mut vendor_calls = 0u32;

    let outcome = run_cascade_with(
        RoutingMode::Free,
        TaskKind::Consensus,
        &sets,
        &mut ctx,
        &quick_tuning(),
        &mut |candidate, retry| script.attempt(candidate, retry),
        &mut |_| {},
        &mut |_: &mut RunContext| {
            vendor_calls += 1;
            None
        },
    );

    assert_eq!(vendor_calls, 0);
    assert!(matches!(outcome, CascadeOutcome::Exhausted));
}
