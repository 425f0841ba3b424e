//! Whole-workspace runs: test classes in, plan document out.

use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;
use uiflow::{AppLayout, DuplicatePolicy, convert_app, plan_app, run_app};
use uiflow_actionplan::{Action, load_app_plans};

const APP_ID: &str = "com.example.expenses";

const EXPENSE_TEST_JAVA: &str = r#"package com.example.expenses;

public class AddExpenseTest {

    @Test
    public void addExpenseTest() {
        onView(withId(R.id.fab)).perform(click());
        onView(allOf(withId(R.id.AmountEditText), withParent(withId(R.id.Amount))))
                .perform(typeText("20"));
        closeSoftKeyboard();
        onView(withId(R.id.list)).check(matches(isDisplayed()));
    }

    @Test
    public void swipeBetweenMonthsTest() {
        onView(isRoot()).perform(swipeLeft());
        Thread.sleep(1500);
        onView(isRoot()).perform(swipeRight());
    }
}
"#;

const SETTINGS_TEST_KT: &str = r#"class SettingsTest {
    @Test
    fun changeCurrencyTest() {
        onView(withContentDescription("Settings")).perform(click())
        onView(withText("EUR")).perform(longClick())
        pressBack()
    }
}
"#;

fn workspace() -> (TempDir, AppLayout) {
    let dir = TempDir::new().unwrap();
    let layout = AppLayout::new(dir.path(), APP_ID);
    let input = layout.input_dir();
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("AddExpenseTest.java"), EXPENSE_TEST_JAVA).unwrap();
    std::fs::write(input.join("SettingsTest.kt"), SETTINGS_TEST_KT).unwrap();
    std::fs::write(input.join("app_introduction.txt"), "Tracks expenses.").unwrap();
    (dir, layout)
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn convert_writes_slices_and_methods() {
    let (_dir, layout) = workspace();
    let report = convert_app(&layout).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(
        report.methods,
        vec!["addExpense", "swipeBetweenMonths", "changeCurrency"]
    );
    assert!(report.failed.is_empty());

    let slice = read(&layout.extracted_dir().join("addExpenseTest.java"));
    assert!(slice.trim_start().starts_with("@Test"));
    assert!(slice.contains("public void addExpenseTest() {"));
    assert!(slice.contains(".check(matches(isDisplayed()));"));

    let method = read(&layout.methods_dir().join("swipeBetweenMonths.java"));
    assert_eq!(
        method,
        [
            "    public void swipeBetweenMonths() {",
            "        performSwipeLeft();",
            "        Thread.sleep(1500);",
            "        performSwipeRight();",
            "    }",
            "",
        ]
        .join("\n")
    );

    assert!(layout.methods_dir().join("changeCurrency.kt").is_file());
    assert!(layout.extracted_dir().join("changeCurrencyTest.kt").is_file());
}

#[test]
fn plan_document_on_disk() {
    let (dir, layout) = workspace();
    convert_app(&layout).unwrap();
    let report = plan_app(&layout, DuplicatePolicy::Overwrite).unwrap();
    assert_eq!(report.path, layout.action_plan_path());
    assert!(report.overwritten.is_empty());

    let doc: Value = serde_json::from_str(&read(&report.path)).unwrap();
    assert_eq!(doc["app_id"], json!(APP_ID));

    let plans = doc["action_plans"].as_object().unwrap();
    let names: Vec<&str> = plans.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["addExpense", "changeCurrency", "swipeBetweenMonths"]);

    let input = &doc["action_plans"]["addExpense"]["steps"][1];
    assert_eq!(input["action"], json!("input"));
    assert_eq!(input["text"], json!("20"));
    assert_eq!(input["matchers"], json!([]));
    assert_eq!(
        input["node_query"],
        json!(r#"withId("AmountEditText"), withParent(withId("Amount"))"#)
    );

    let loaded = load_app_plans(dir.path(), APP_ID).unwrap();
    assert_eq!(loaded, report.document);

    let swipes: Vec<Action> = loaded.action_plans["swipeBetweenMonths"]
        .steps
        .iter()
        .map(|s| s.action)
        .collect();
    assert_eq!(swipes, vec![Action::SwipeLeft, Action::Sleep, Action::SwipeRight]);

    let settings: Vec<Action> = loaded.action_plans["changeCurrency"]
        .steps
        .iter()
        .map(|s| s.action)
        .collect();
    assert_eq!(settings, vec![Action::Click, Action::PressBack]);
}

#[test]
fn rerun_produces_identical_output() {
    let (_dir, layout) = workspace();
    let (_, first) = run_app(&layout, DuplicatePolicy::Fail).unwrap();
    let first_json = read(&first.path);

    let (_, second) = run_app(&layout, DuplicatePolicy::Fail).unwrap();
    assert_eq!(read(&second.path), first_json);
    assert_eq!(first.document, second.document);
}
