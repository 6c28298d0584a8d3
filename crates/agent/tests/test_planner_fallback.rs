//! Tests for the ordered provider fallback

mod common;

use common::{identity, plan_json, ScriptedProvider};
use mapra_agent::{PlanError, Planner, ProviderSlot};

#[tokio::test]
async fn test_primary_success_never_touches_fallback() {
    let primary = ScriptedProvider::new("primary", vec![Ok(plan_json("FINAL_ANSWER", "42"))]);
    let fallback = ScriptedProvider::new("fallback", vec![Ok(plan_json("FINAL_ANSWER", "no"))]);

    let planner = Planner::new(vec![
        ProviderSlot::new(primary.clone(), "model-a"),
        ProviderSlot::new(fallback.clone(), "model-b"),
    ]);

    let plan = planner
        .plan_once(&identity(4), &[], "question", "")
        .await
        .unwrap();

    assert_eq!(plan.action_input, "42");
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn test_primary_failure_falls_back() {
    let primary = ScriptedProvider::new("primary", vec![Err("quota".to_string())]);
    let fallback = ScriptedProvider::new("fallback", vec![Ok(plan_json("FINAL_ANSWER", "42"))]);

    let planner = Planner::new(vec![
        ProviderSlot::new(primary.clone(), "model-a"),
        ProviderSlot::new(fallback.clone(), "model-b"),
    ]);

    let plan = planner
        .plan_once(&identity(4), &[], "question", "")
        .await
        .unwrap();

    // the primary's failure is recovered, not surfaced
    assert_eq!(plan.action_input, "42");
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn test_both_failing_surfaces_last_failure() {
    let primary = ScriptedProvider::new("primary", vec![Err("primary down".to_string())]);
    let fallback = ScriptedProvider::new("fallback", vec![Err("fallback down".to_string())]);

    let planner = Planner::new(vec![
        ProviderSlot::new(primary.clone(), "model-a"),
        ProviderSlot::new(fallback.clone(), "model-b"),
    ]);

    let err = planner
        .plan_once(&identity(4), &[], "question", "")
        .await
        .unwrap_err();

    match err {
        PlanError::Provider { provider, message } => {
            assert_eq!(provider, "fallback");
            assert!(message.contains("fallback down"));
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_parse_error_is_not_retried_on_fallback() {
    // the primary answered, just not with JSON: that is a parse failure,
    // not an adapter failure, so the fallback stays untouched
    let primary = ScriptedProvider::new("primary", vec![Ok("no json at all".to_string())]);
    let fallback = ScriptedProvider::new("fallback", vec![Ok(plan_json("FINAL_ANSWER", "42"))]);

    let planner = Planner::new(vec![
        ProviderSlot::new(primary.clone(), "model-a"),
        ProviderSlot::new(fallback.clone(), "model-b"),
    ]);

    let err = planner
        .plan_once(&identity(4), &[], "question", "")
        .await
        .unwrap_err();

    assert!(matches!(err, PlanError::Parse(_)));
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn test_catalog_lines_appear_in_prompt() {
    let primary = ScriptedProvider::new("primary", vec![Ok(plan_json("FINAL_ANSWER", "ok"))]);
    let planner = Planner::new(vec![ProviderSlot::new(primary.clone(), "model-a")]);

    let catalog = vec![
        "web_search: Search the web and return short snippets".to_string(),
        "summarize: Summarize the given text into 3-6 bullets".to_string(),
    ];
    planner
        .plan_once(&identity(4), &catalog, "question", "")
        .await
        .unwrap();

    let prompt = &primary.prompts()[0];
    assert!(prompt.contains("web_search: Search the web"));
    assert!(prompt.contains("summarize: Summarize the given text"));
}
