//! Surface syntax for fluent UI-test call chains.
//!
//! `uiflow-syntax` understands just enough of Java/Kotlin expression syntax
//! to work with Espresso-style statements such as
//! `onView(allOf(withId(R.id.ok), withText("OK"))).perform(click());` and
//! with the internal statements they are rewritten into.
//!
//! # Architecture
//!
//! ```text
//! statement text ──> lexer ──> parser ──> Expr tree ──> Display (canonical text)
//!
//! raw lines ──> scan (quote-aware parens/braces, top-level comma split,
//!                     balanced brace blocks)
//! ```
//!
//! The parser is a restricted grammar, not a host-language parser: calls,
//! method chains, dotted paths, literals and the four arithmetic operators.
//! Anything else (lambdas, generics, blocks) is a [`ParseError`].

pub mod ir;
pub mod lexer;
pub mod parser;
pub mod scan;

pub use ir::{BinaryOp, Expr, simple_name, unquote};
pub use parser::{ParseError, parse_expr, parse_statement};
pub use scan::{
    BlockSpan, ScanState, Scanner, balanced_block, brace_balance, code_text, find_top_level,
    has_code_char, is_balanced, paren_balance, split_top_level, strip_line_comment,
};
