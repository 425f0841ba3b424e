//! Dialect readers for test source files.

pub mod java;
pub mod kotlin;

pub use java::{JAVA_DIALECT, JavaDialect, split_java_tests};
pub use kotlin::{KOTLIN_DIALECT, KotlinDialect, split_kotlin_tests};
