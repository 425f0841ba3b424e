//! Test dialects and the trait each one implements.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::assemble::{AssembleError, AssembledMethod, assemble_method};
use crate::collect::{NormalizedCall, extract_calls};
use crate::split::{TestMethodBlock, split_test_methods};

/// Source language of a UI test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Java,
    Kotlin,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kt",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "java" => Some(Language::Java),
            "kt" => Some(Language::Kotlin),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "kotlin" | "kt" => Ok(Language::Kotlin),
            other => Err(format!("unknown test language: {other}")),
        }
    }
}

/// A test dialect: how one language spells method headers and statements.
///
/// Readers differ only in the header pattern and in whether a statement must
/// end with a terminator; everything else is shared.
pub trait Dialect: Send + Sync {
    fn language(&self) -> Language;

    /// File extensions this dialect handles (e.g., `&["kt"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Method header pattern. Group 2 is the method name; groups 1 and 3
    /// are the text immediately around it.
    fn header(&self) -> &Regex;

    /// Whether a collected statement must end with `);` to be complete.
    fn requires_terminator(&self) -> bool;

    /// Method name declared on `line`, if it is a header.
    fn method_name(&self, line: &str) -> Option<String> {
        self.header().captures(line).map(|caps| caps[2].to_string())
    }

    /// `line` with its declared method name stripped of a trailing `Test`.
    fn rename_header(&self, line: &str) -> Option<String> {
        rename_header_with(self.header(), line)
    }

    fn extract_calls(&self, source: &str) -> Vec<NormalizedCall> {
        extract_calls(source, self.requires_terminator())
    }

    fn split_tests(&self, source: &str) -> Vec<TestMethodBlock> {
        split_test_methods(source, self.language(), self.header())
    }

    fn assemble(&self, block: &TestMethodBlock) -> Result<AssembledMethod, AssembleError> {
        assemble_method(block, self.header(), self.requires_terminator())
    }
}

pub(crate) fn rename_header_with(header: &Regex, line: &str) -> Option<String> {
    let caps = header.captures(line)?;
    let whole = caps.get(0)?;
    Some(format!(
        "{}{}{}{}{}",
        &line[..whole.start()],
        &caps[1],
        strip_test_suffix(&caps[2]),
        &caps[3],
        &line[whole.end()..]
    ))
}

/// Method name with one trailing `Test` removed, unless that would leave
/// nothing.
pub fn strip_test_suffix(name: &str) -> &str {
    match name.strip_suffix("Test") {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}
