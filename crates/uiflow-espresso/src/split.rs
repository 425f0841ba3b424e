//! Splitting test classes into their `@Test` methods.

use regex::Regex;
use uiflow_syntax::balanced_block;

use crate::traits::Language;

/// Source slice of one `@Test` method, annotation through closing brace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMethodBlock {
    pub name: String,
    pub language: Language,
    pub lines: Vec<String>,
}

impl TestMethodBlock {
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }
}

fn is_test_marker(line: &str) -> bool {
    let line = line.trim();
    line == "@Test" || line.starts_with("@Test(")
}

/// Every `@Test` method in `source`, in source order.
///
/// After the marker, blank lines and further annotations are skipped to the
/// header. Markers whose header does not match `header` are skipped.
pub fn split_test_methods(source: &str, language: Language, header: &Regex) -> Vec<TestMethodBlock> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !is_test_marker(lines[i]) {
            i += 1;
            continue;
        }

        let Some(header_idx) = (i + 1..lines.len()).find(|&j| {
            let line = lines[j].trim();
            !line.is_empty() && !line.starts_with('@')
        }) else {
            break;
        };

        let Some(caps) = header.captures(lines[header_idx]) else {
            tracing::debug!(line = lines[header_idx], "@Test not followed by a {language} method header");
            i = header_idx + 1;
            continue;
        };
        let name = caps[2].to_string();

        let Some(span) = balanced_block(&lines, header_idx) else {
            break;
        };

        blocks.push(TestMethodBlock {
            name,
            language,
            lines: lines[i..=span.close].iter().map(|l| l.to_string()).collect(),
        });
        i = span.close + 1;
    }

    blocks
}
