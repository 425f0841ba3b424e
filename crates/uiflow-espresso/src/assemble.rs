//! Synthesizing internal methods from `@Test` method blocks.

use std::fmt;

use regex::Regex;
use uiflow_syntax::{balanced_block, code_text, has_code_char, strip_line_comment};

use crate::collect::{Collected, Collector, Feed};
use crate::convert::{Rewrite, StatementError, convert_statement, validate_helper_statement};
use crate::split::TestMethodBlock;
use crate::traits::{Language, rename_header_with, strip_test_suffix};
use crate::vocab;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("no method header found in test `{method}`")]
    MissingHeader { method: String },
}

/// Why a body statement did not make it into the synthesized method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Rejected(StatementError),
    Malformed,
    Assertion,
    Unterminated,
    Unrecognized,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Rejected(err) => write!(f, "{err}"),
            SkipReason::Malformed => f.write_str("malformed statement"),
            SkipReason::Assertion => f.write_str("assertion"),
            SkipReason::Unterminated => f.write_str("statement never closed"),
            SkipReason::Unrecognized => f.write_str("not a UI statement"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStatement {
    pub statement: String,
    pub reason: SkipReason,
}

/// A synthesized method in internal statement form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledMethod {
    /// Method name with the `Test` suffix removed.
    pub name: String,
    pub language: Language,
    pub source: String,
    pub skipped: Vec<SkippedStatement>,
}

struct Body {
    indent: String,
    lines: Vec<String>,
    skipped: Vec<SkippedStatement>,
}

impl Body {
    fn emit(&mut self, statement: &str) {
        self.lines.push(format!("{}{}", self.indent, statement));
    }

    fn skip(&mut self, statement: impl Into<String>, reason: SkipReason) {
        let statement = statement.into();
        tracing::debug!(statement = %statement, reason = %reason, "dropping statement");
        self.skipped.push(SkippedStatement { statement, reason });
    }

    fn collected(&mut self, collected: Collected) {
        match collected {
            Collected::Action(call) => match convert_statement(call.as_str()) {
                Ok(Rewrite::Statement(stmt)) => self.emit(&stmt),
                Ok(Rewrite::Malformed { statement }) => self.skip(statement, SkipReason::Malformed),
                Err(err) => self.skip(call.into_string(), SkipReason::Rejected(err)),
            },
            Collected::Discarded(text) => self.skip(text, SkipReason::Assertion),
        }
    }
}

/// Only braces and whitespace, e.g. the close of a nested block.
fn is_structural(line: &str) -> bool {
    code_text(line)
        .chars()
        .all(|c| c == '{' || c == '}' || c.is_whitespace())
}

/// Turn a test method into its internal counterpart.
///
/// Annotations are dropped, the name loses its `Test` suffix, and each body
/// statement is converted, kept (helpers such as `pressBack()`) or dropped
/// (assertions, rejected statements, anything unrecognized), in order.
pub fn assemble_method(
    block: &TestMethodBlock,
    header: &Regex,
    requires_terminator: bool,
) -> Result<AssembledMethod, AssembleError> {
    let lines: Vec<&str> = block
        .lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.trim_start().starts_with('@'))
        .collect();

    let missing = || AssembleError::MissingHeader {
        method: block.name.clone(),
    };
    let header_idx = lines
        .iter()
        .position(|l| header.is_match(l))
        .ok_or_else(missing)?;
    let header_line = lines[header_idx];
    let caps = header.captures(header_line).ok_or_else(missing)?;
    let name = strip_test_suffix(&caps[2]).to_string();

    let mut out_header = rename_header_with(header, header_line)
        .unwrap_or_else(|| header_line.to_string())
        .trim_end()
        .to_string();
    if !has_code_char(&out_header, '{') {
        out_header.push_str(" {");
    }

    let indent: String = header_line
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    let mut body = Body {
        indent: format!("{indent}    "),
        lines: vec![out_header],
        skipped: Vec::new(),
    };

    let body_lines = match balanced_block(&lines, header_idx) {
        Some(span) => &lines[span.inner()],
        None => &[][..],
    };

    let mut collector = Collector::new(requires_terminator);
    for line in body_lines {
        match collector.feed(line) {
            Feed::Complete(collected) => body.collected(collected),
            Feed::Pending => {}
            Feed::Idle => {
                let stripped = strip_line_comment(line).trim();
                if is_structural(stripped) {
                    continue;
                }
                if vocab::is_assertion_line(stripped) {
                    body.skip(stripped, SkipReason::Assertion);
                } else if validate_helper_statement(stripped) {
                    body.emit(stripped);
                } else {
                    body.skip(stripped, SkipReason::Unrecognized);
                }
            }
        }
    }
    if let Some(open) = collector.finish() {
        body.skip(open, SkipReason::Unterminated);
    }

    body.lines.push(format!("{indent}}}"));

    Ok(AssembledMethod {
        name,
        language: block.language,
        source: body.lines.join("\n"),
        skipped: body.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{JAVA_DIALECT, KOTLIN_DIALECT};
    use crate::traits::Dialect;

    fn block(language: Language, source: &str) -> TestMethodBlock {
        TestMethodBlock {
            name: "sampleTest".into(),
            language,
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_assemble_java() {
        let block = block(
            Language::Java,
            r#"@Test
public void addExpenseTest() throws Exception {
    onView(withId(R.id.add)).perform(click());
    onView(allOf(withId(R.id.amount),
            isDisplayed())).perform(typeText("20"));
    closeSoftKeyboard();
    onView(withId(R.id.total)).check(matches(withText("20")));
    Thread.sleep(1500);
    onView(withId(R.id.add)).perform(doubleClick());
    int unused = 3;
    onView(isRoot()).perform(swipeLeft());
}"#,
        );
        let method = JAVA_DIALECT.assemble(&block).unwrap();
        assert_eq!(method.name, "addExpense");
        insta::assert_snapshot!(method.source, @r#"
        public void addExpense() throws Exception {
            performClick(findNode(withId("add")));
            performInput(findNode(withId("amount")), "20");
            closeSoftKeyboard();
            Thread.sleep(1500);
            performSwipeLeft();
        }
        "#);

        let reasons: Vec<String> = method.skipped.iter().map(|s| s.reason.to_string()).collect();
        assert_eq!(
            reasons,
            vec![
                "assertion".to_string(),
                "unsupported action(s): doubleClick".to_string(),
                "not a UI statement".to_string(),
            ]
        );
    }

    #[test]
    fn test_assemble_kotlin() {
        let block = block(
            Language::Kotlin,
            r#"@Test
fun toggleDarkModeTest()
{
    onView(withId(R.id.dark))
        .perform(click())
    onView(withId(R.id.dark))
        .check(matches(isChecked()))
    pressBack()
}"#,
        );
        let method = KOTLIN_DIALECT.assemble(&block).unwrap();
        assert_eq!(method.name, "toggleDarkMode");
        assert_eq!(
            method.source,
            "fun toggleDarkMode() {\n    performClick(findNode(withId(\"dark\")));\n    pressBack()\n}"
        );
        assert_eq!(method.skipped.len(), 1);
        assert_eq!(method.skipped[0].reason, SkipReason::Assertion);
    }

    #[test]
    fn test_helpers_with_trailing_comments() {
        let block = block(
            Language::Java,
            "@Test\npublic void leaveTest() {\n    pressBack(); // leave\n    Thread.sleep(500); // wait\n    // closeSoftKeyboard();\n}",
        );
        let method = JAVA_DIALECT.assemble(&block).unwrap();
        assert_eq!(
            method.source,
            "public void leave() {\n    pressBack();\n    Thread.sleep(500);\n}"
        );
        assert!(method.skipped.is_empty());
    }

    #[test]
    fn test_missing_header() {
        let block = block(Language::Java, "@Test\nint x = 1;");
        assert_eq!(
            JAVA_DIALECT.assemble(&block),
            Err(AssembleError::MissingHeader {
                method: "sampleTest".into()
            })
        );
    }
}
