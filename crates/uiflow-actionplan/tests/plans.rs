//! Action plans parsed from synthesized methods.

use serde_json::json;
use uiflow_actionplan::{
    Action, ActionPlan, ActionPlans, AppActionPlans, MatchMode, Matcher, MatcherType, merge_plan,
    parse_action_line, parse_action_plan,
};
use uiflow_espresso::convert_statement;

fn converted(stmt: &str) -> String {
    convert_statement(stmt)
        .expect("statement accepted")
        .statement()
        .expect("statement rewritten")
        .to_string()
}

mod scenarios {
    use super::*;

    #[test]
    fn click_by_resource_id() {
        let line = converted("onView(withId(R.id.button)).perform(click());");
        assert_eq!(line, r#"performClick(findNode(withId("button")));"#);

        let step = parse_action_line(&line).unwrap();
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({
                "action": "click",
                "matchers": [{"type": "id", "value": "button", "mode": "equalsIgnoreCase"}],
                "text": null,
                "millis": null,
                "node_query": "withId(\"button\")"
            })
        );
    }

    #[test]
    fn root_swipe_has_no_target() {
        let line = converted("onView(isRoot()).perform(swipeLeft());");
        let step = parse_action_line(&line).unwrap();
        assert_eq!(step.action, Action::SwipeLeft);
        assert!(step.matchers.is_empty());
        assert_eq!(step.node_query, None);
    }

    #[test]
    fn structural_input() {
        let step = parse_action_line(
            r#"performInput(findNode(withId("AmountEditText"), withParent(withId("Amount"))), "20");"#,
        )
        .unwrap();
        assert_eq!(step.action, Action::Input);
        assert_eq!(step.text.as_deref(), Some("20"));
        assert!(step.matchers.is_empty());
        assert_eq!(
            step.node_query.as_deref(),
            Some(r#"withId("AmountEditText"), withParent(withId("Amount"))"#)
        );
    }

    #[test]
    fn sleep() {
        let step = parse_action_line("Thread.sleep(1500);").unwrap();
        assert_eq!(step.action, Action::Sleep);
        assert_eq!(step.millis, Some(1500));
        assert!(step.matchers.is_empty());
    }
}

#[test]
fn structural_lookups_never_carry_matchers() {
    for query in [
        r#"withText("Row"), withChild(withText("x"))"#,
        r#"hasDescendant(withId("icon"))"#,
        r#"withId("a"), withParent(withId("b"), hasDescendant(withId("c")))"#,
    ] {
        let step = parse_action_line(&format!("performClick(findNode({query}));")).unwrap();
        assert!(step.matchers.is_empty(), "{query}");
        assert_eq!(step.node_query.as_deref(), Some(query));
    }
}

#[test]
fn matchers_follow_argument_order() {
    let step = parse_action_line(
        r#"performSwipeRightOnNode(findNode(withClassName(containsStringIgnoringCase("Card")), withText(startsWithIgnoreCase("Jan")), withContentDescription("Month, current"), withId("pager")));"#,
    )
    .unwrap();
    assert_eq!(step.action, Action::SwipeRightOnNode);
    assert_eq!(
        step.matchers,
        vec![
            Matcher {
                kind: MatcherType::ClassName,
                value: "Card".into(),
                mode: MatchMode::ContainsIgnoreCase,
            },
            Matcher {
                kind: MatcherType::Text,
                value: "Jan".into(),
                mode: MatchMode::StartsWithIgnoreCase,
            },
            Matcher {
                kind: MatcherType::ContentDescription,
                value: "Month, current".into(),
                mode: MatchMode::ContainsIgnoreCase,
            },
            Matcher {
                kind: MatcherType::Id,
                value: "pager".into(),
                mode: MatchMode::EqualsIgnoreCase,
            },
        ]
    );
}

#[test]
fn whole_method() {
    let plan = parse_action_plan(
        r#"public void addExpense() {
    performClick(findNode(withId("fab")));
    performInput(findNode(withId("amount")), "20");
    closeSoftKeyboard();
    someHelper();
    performScrollDown();
    swipeRight50Percent();
    pressBack();
}"#,
    );
    assert_eq!(plan.method_name, "addExpense");
    let actions: Vec<Action> = plan.steps.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::Click,
            Action::Input,
            Action::CloseSoftKeyboard,
            Action::ScrollDown,
            Action::SwipeRight50Percent,
            Action::PressBack,
        ]
    );
}

#[test]
fn kotlin_method() {
    let plan = parse_action_plan(
        "fun toggleDarkMode() {\n    performClick(findNode(withId(\"dark\")));\n    pressBack()\n}",
    );
    assert_eq!(plan.method_name, "toggleDarkMode");
    assert_eq!(plan.steps.len(), 2);
}

#[test]
fn document_round_trip() {
    let mut doc = AppActionPlans::new("com.example.expenses");
    for source in [
        "public void a() {\n    performClick(findNode(withText(\"OK\")));\n}",
        "public void b() {\n    Thread.sleep(10);\n    performSwipeLeft();\n}",
    ] {
        merge_plan(&mut doc.action_plans, parse_action_plan(source));
    }

    let text = serde_json::to_string_pretty(&doc).unwrap();
    let back: AppActionPlans = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["action_plans"]["b"]["steps"][0]["millis"], json!(10));
    assert_eq!(value["action_plans"]["a"]["steps"][0]["matchers"][0]["mode"], json!("containsIgnoreCase"));
}

#[test]
fn later_plan_wins() {
    let mut plans = ActionPlans::new();
    let first: ActionPlan = parse_action_plan("public void save() {\n    pressBack();\n}");
    let second: ActionPlan = parse_action_plan("public void save() {\n}");
    assert!(merge_plan(&mut plans, first).is_none());
    let displaced = merge_plan(&mut plans, second).unwrap();
    assert_eq!(displaced.steps.len(), 1);
    assert!(plans["save"].steps.is_empty());
}
