//! Line collector that joins multi-line Espresso statements.
//!
//! A statement starts on a line containing an entry token (`onView(`,
//! `onData(`, `onWebView(`) and keeps absorbing lines until its parentheses
//! balance and its `.perform(` chain is complete. Java additionally requires
//! the statement to end with `);`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use uiflow_syntax::{code_text, paren_balance, strip_line_comment};

use crate::vocab;

static PERFORM_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)\s*\.perform\s*\(").unwrap());

/// One Espresso statement on a single line: `entry(...).perform(...);`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCall(String);

impl NormalizedCall {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join collected text into its single-line form: whitespace collapsed,
/// `) .perform (` tightened, one trailing `;`.
pub fn normalize_call(text: &str) -> NormalizedCall {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = PERFORM_SPACING
        .replace_all(&collapsed, ").perform(")
        .trim()
        .to_string();
    if !out.ends_with(';') {
        out.push(';');
    }
    NormalizedCall(out)
}

/// A statement the collector finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    /// A `.perform(` statement.
    Action(NormalizedCall),
    /// A complete statement without an action, usually a `.check(` assertion.
    Discarded(String),
}

/// Result of feeding one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// Not collecting and the line does not start a statement.
    Idle,
    /// Line absorbed; the statement is still open.
    Pending,
    Complete(Collected),
}

#[derive(Debug, Clone)]
pub struct Collector {
    requires_terminator: bool,
    buffer: Vec<String>,
    balance: i32,
}

impl Collector {
    pub fn new(requires_terminator: bool) -> Self {
        Self {
            requires_terminator,
            buffer: Vec::new(),
            balance: 0,
        }
    }

    pub fn is_collecting(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn feed(&mut self, line: &str) -> Feed {
        let line = strip_line_comment(line).trim();
        if !self.is_collecting() && !vocab::is_entry_line(line) {
            return Feed::Idle;
        }
        if line.is_empty() {
            return Feed::Pending;
        }

        self.buffer.push(line.to_string());
        self.balance += paren_balance(line);
        if self.balance > 0 {
            return Feed::Pending;
        }

        let joined = self.buffer.join(" ");
        let code = code_text(&normalize_call(&joined).into_string());
        let terminated = joined.trim_end().ends_with(';');

        if code.contains(".perform(") {
            if self.requires_terminator && !joined.trim_end().ends_with(");") {
                return Feed::Pending;
            }
            let call = normalize_call(&joined);
            self.reset();
            return Feed::Complete(Collected::Action(call));
        }

        let finished = if self.requires_terminator {
            terminated
        } else {
            terminated || code.contains(".check(")
        };
        if finished {
            let text = normalize_call(&joined).into_string();
            self.reset();
            return Feed::Complete(Collected::Discarded(text));
        }

        Feed::Pending
    }

    /// Text of a statement left open at end of input.
    pub fn finish(&mut self) -> Option<String> {
        if !self.is_collecting() {
            return None;
        }
        let text = self.buffer.join(" ");
        self.reset();
        Some(text)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.balance = 0;
    }
}

/// Every complete `.perform(` statement in `source`, in order.
pub fn extract_calls(source: &str, requires_terminator: bool) -> Vec<NormalizedCall> {
    let mut collector = Collector::new(requires_terminator);
    let mut calls = Vec::new();

    for line in source.lines() {
        match collector.feed(line) {
            Feed::Complete(Collected::Action(call)) => calls.push(call),
            Feed::Complete(Collected::Discarded(text)) => {
                tracing::debug!(statement = %text, "skipping statement without action");
            }
            Feed::Idle | Feed::Pending => {}
        }
    }

    if let Some(open) = collector.finish() {
        tracing::debug!(statement = %open, "dropping unterminated statement");
    }
    calls
}
