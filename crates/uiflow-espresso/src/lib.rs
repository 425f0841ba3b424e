//! Espresso UI tests to internal UI statements.
//!
//! This crate turns Java/Kotlin Espresso test classes into synthesized
//! methods written in the internal statement form consumed by
//! `uiflow-actionplan`.
//!
//! # Architecture
//!
//! ```text
//! test class ──> split (one block per @Test method)
//!                  │
//!                  v
//!              assemble ──> collect (join multi-line statements)
//!                  │           │
//!                  │           v
//!                  │        convert (validate vocabulary, rewrite)
//!                  v
//!              synthesized method text
//! ```
//!
//! Java and Kotlin differ only in their [`Dialect`]: method header pattern
//! and whether statements need a `;` terminator.
//!
//! # Example
//!
//! ```
//! use uiflow_espresso::convert_statement;
//!
//! let rewrite = convert_statement("onView(withId(R.id.button)).perform(click());").unwrap();
//! assert_eq!(
//!     rewrite.statement(),
//!     Some(r#"performClick(findNode(withId("button")));"#)
//! );
//! ```

pub mod assemble;
pub mod collect;
pub mod convert;
pub mod input;
pub mod registry;
pub mod split;
pub mod traits;
pub mod vocab;

pub use assemble::{AssembleError, AssembledMethod, SkipReason, SkippedStatement, assemble_method};
pub use collect::{Collected, Collector, Feed, NormalizedCall, extract_calls, normalize_call};
pub use convert::{
    Rewrite, StatementError, convert_statement, flatten_all_of, rewrite_statement,
    validate_helper_statement, validate_statement,
};
pub use input::{JAVA_DIALECT, KOTLIN_DIALECT};
pub use registry::{dialect_for_extension, dialect_for_language, dialects, register_dialect};
pub use split::{TestMethodBlock, split_test_methods};
pub use traits::{Dialect, Language, strip_test_suffix};
