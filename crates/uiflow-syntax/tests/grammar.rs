//! Snapshot tests for the statement grammar.
//!
//! Each test parses a statement and snapshots its canonical rendering, so
//! formatting differences in the source collapse to one form.

use uiflow_syntax::{Expr, parse_statement, split_top_level};

fn canonical(src: &str) -> String {
    parse_statement(src).expect("parse failed").to_string()
}

mod canonical_form {
    use super::*;

    #[test]
    fn whitespace_collapses() {
        insta::assert_snapshot!(
            canonical("onView( withId( R.id.button ) ) .perform( click() ) ;"),
            @"onView(withId(R.id.button)).perform(click())"
        );
    }

    #[test]
    fn nested_matchers() {
        insta::assert_snapshot!(
            canonical(r#"onView(allOf(withId(R.id.a),withParent(withText("Total, net")))).perform(scrollTo(),click());"#),
            @r#"onView(allOf(withId(R.id.a), withParent(withText("Total, net")))).perform(scrollTo(), click())"#
        );
    }

    #[test]
    fn arithmetic_in_arguments() {
        insta::assert_snapshot!(canonical("Thread.sleep(2 * 1000);"), @"Thread.sleep(2 * 1000)");
    }

    #[test]
    fn escaped_string() {
        insta::assert_snapshot!(
            canonical(r#"performInput(findNode(withId("q")), "a \"b\"");"#),
            @r#"performInput(findNode(withId("q")), "a \"b\"")"#
        );
    }
}

mod structure {
    use super::*;

    #[test]
    fn call_names_in_source_order() {
        let expr =
            parse_statement("onView(allOf(withId(R.id.a), isDisplayed())).perform(typeText(\"x\"));")
                .unwrap();
        assert_eq!(
            expr.call_names(),
            vec!["onView", "allOf", "withId", "isDisplayed", "perform", "typeText"]
        );
    }

    #[test]
    fn rendered_args_split_back() {
        let expr = parse_statement(
            r#"performInput(findNode(withId("Amount"), withParent(withId("Row"))), "20");"#,
        )
        .unwrap();
        let Expr::Call { args, .. } = &expr else {
            panic!("expected call");
        };
        let rendered = args.iter().map(Expr::to_string).collect::<Vec<_>>().join(", ");
        assert_eq!(split_top_level(&rendered).len(), args.len());
    }
}
