//! Java Espresso tests.

use std::sync::LazyLock;

use regex::Regex;

use crate::split::TestMethodBlock;
use crate::traits::{Dialect, Language};

/// Static instance of the Java dialect for registry.
pub static JAVA_DIALECT: JavaDialect = JavaDialect;

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\bvoid\s+)(\w+)(\s*\()").unwrap());

/// Java tests: `void name(` headers, statements terminated by `;`.
pub struct JavaDialect;

impl Dialect for JavaDialect {
    fn language(&self) -> Language {
        Language::Java
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn header(&self) -> &Regex {
        &HEADER
    }

    fn requires_terminator(&self) -> bool {
        true
    }
}

/// Split Java source into its `@Test` methods.
pub fn split_java_tests(source: &str) -> Vec<TestMethodBlock> {
    JAVA_DIALECT.split_tests(source)
}
