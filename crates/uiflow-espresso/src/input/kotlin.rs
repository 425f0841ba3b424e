//! Kotlin Espresso tests.

use std::sync::LazyLock;

use regex::Regex;

use crate::split::TestMethodBlock;
use crate::traits::{Dialect, Language};

/// Static instance of the Kotlin dialect for registry.
pub static KOTLIN_DIALECT: KotlinDialect = KotlinDialect;

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\bfun\s+)(\w+)(\s*\()").unwrap());

/// Kotlin tests: `fun name(` headers, no statement terminator.
pub struct KotlinDialect;

impl Dialect for KotlinDialect {
    fn language(&self) -> Language {
        Language::Kotlin
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["kt"]
    }

    fn header(&self) -> &Regex {
        &HEADER
    }

    fn requires_terminator(&self) -> bool {
        false
    }
}

/// Split Kotlin source into its `@Test` methods.
pub fn split_kotlin_tests(source: &str) -> Vec<TestMethodBlock> {
    KOTLIN_DIALECT.split_tests(source)
}
