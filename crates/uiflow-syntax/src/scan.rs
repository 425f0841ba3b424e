//! Quote-aware scanning over raw source lines.
//!
//! Everything that counts delimiters in this workspace goes through
//! [`Scanner`], so parentheses, braces and commas inside string or char
//! literals are never mistaken for structure.

use std::ops::Range;

/// Literal state of a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Outside,
    InString,
    InStringEscaped,
    InChar,
    InCharEscaped,
}

/// Character-at-a-time state machine tracking literal state and paren depth.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    state: ScanState,
    depth: i32,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current parenthesis depth (may go negative on unbalanced input).
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Advance over `ch`.
    ///
    /// Returns `true` when `ch` is code: outside every literal and not itself
    /// a literal delimiter.
    pub fn step(&mut self, ch: char) -> bool {
        match self.state {
            ScanState::Outside => match ch {
                '"' => {
                    self.state = ScanState::InString;
                    false
                }
                '\'' => {
                    self.state = ScanState::InChar;
                    false
                }
                '(' => {
                    self.depth += 1;
                    true
                }
                ')' => {
                    self.depth -= 1;
                    true
                }
                _ => true,
            },
            ScanState::InString => {
                match ch {
                    '\\' => self.state = ScanState::InStringEscaped,
                    '"' => self.state = ScanState::Outside,
                    _ => {}
                }
                false
            }
            ScanState::InStringEscaped => {
                self.state = ScanState::InString;
                false
            }
            ScanState::InChar => {
                match ch {
                    '\\' => self.state = ScanState::InCharEscaped,
                    '\'' => self.state = ScanState::Outside,
                    _ => {}
                }
                false
            }
            ScanState::InCharEscaped => {
                self.state = ScanState::InChar;
                false
            }
        }
    }
}

/// The code characters of one line: literal contents and delimiters are
/// dropped, and scanning stops at a `//` comment.
pub fn code_text(line: &str) -> String {
    let mut scanner = Scanner::new();
    let mut out = String::with_capacity(line.len());
    let mut after_slash = false;
    for ch in line.chars() {
        if !scanner.step(ch) {
            after_slash = false;
            continue;
        }
        if ch == '/' && after_slash {
            out.pop();
            break;
        }
        after_slash = ch == '/';
        out.push(ch);
    }
    out
}

/// `line` up to (not including) a `//` comment that starts outside literals.
pub fn strip_line_comment(line: &str) -> &str {
    let mut scanner = Scanner::new();
    let mut prev_slash = None;
    for (i, ch) in line.char_indices() {
        if !scanner.step(ch) {
            prev_slash = None;
            continue;
        }
        if ch == '/' {
            if let Some(start) = prev_slash {
                return &line[..start];
            }
            prev_slash = Some(i);
        } else {
            prev_slash = None;
        }
    }
    line
}

fn balance(line: &str, open: char, close: char) -> i32 {
    code_text(line).chars().fold(0, |acc, ch| {
        if ch == open {
            acc + 1
        } else if ch == close {
            acc - 1
        } else {
            acc
        }
    })
}

/// Opening minus closing parentheses on one line, ignoring literals and comments.
pub fn paren_balance(line: &str) -> i32 {
    balance(line, '(', ')')
}

/// Opening minus closing braces on one line, ignoring literals and comments.
pub fn brace_balance(line: &str) -> i32 {
    balance(line, '{', '}')
}

/// Whether every parenthesis in `text` closes in order and no literal is
/// left open.
pub fn is_balanced(text: &str) -> bool {
    let mut scanner = Scanner::new();
    for ch in text.chars() {
        scanner.step(ch);
        if scanner.depth() < 0 {
            return false;
        }
    }
    scanner.depth() == 0 && scanner.state() == ScanState::Outside
}

/// Byte offset of the first occurrence of `needle` that starts outside every
/// literal at parenthesis depth zero.
pub fn find_top_level(text: &str, needle: &str) -> Option<usize> {
    let mut scanner = Scanner::new();
    for (i, ch) in text.char_indices() {
        if scanner.state() == ScanState::Outside
            && scanner.depth() == 0
            && text[i..].starts_with(needle)
        {
            return Some(i);
        }
        scanner.step(ch);
    }
    None
}

/// Whether `ch` occurs on `line` as code.
pub fn has_code_char(line: &str, ch: char) -> bool {
    code_text(line).contains(ch)
}

/// Split an argument list on its top-level commas.
///
/// Commas nested inside parentheses or inside string/char literals are not
/// separators. Each part is trimmed; a trailing empty part is dropped.
///
/// ```text
/// withId("a"), withParent(withId("b"), withText("x, y"))
///   -> ["withId(\"a\")", "withParent(withId(\"b\"), withText(\"x, y\"))"]
/// ```
pub fn split_top_level(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut scanner = Scanner::new();

    for ch in args.chars() {
        let code = scanner.step(ch);
        if code && ch == ',' && scanner.depth() == 0 {
            parts.push(buf.trim().to_string());
            buf.clear();
            continue;
        }
        buf.push(ch);
    }

    if !buf.trim().is_empty() {
        parts.push(buf.trim().to_string());
    }
    parts
}

/// Line span of a brace-delimited block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Line holding the opening brace.
    pub open: usize,
    /// Line where depth returned to zero, or the last line if it never did.
    pub close: usize,
    /// False when input ended before the block closed.
    pub terminated: bool,
}

impl BlockSpan {
    /// Line indices strictly inside the braces.
    pub fn inner(&self) -> Range<usize> {
        let start = self.open + 1;
        let end = if self.terminated {
            self.close
        } else {
            self.close + 1
        };
        start..end.max(start)
    }
}

/// Find the block whose opening brace is on `lines[from]` or a later line
/// and track nested depth until it returns to zero.
///
/// Returns `None` when no line from `from` onwards opens a brace.
pub fn balanced_block<S: AsRef<str>>(lines: &[S], from: usize) -> Option<BlockSpan> {
    let open = (from..lines.len()).find(|&i| has_code_char(lines[i].as_ref(), '{'))?;

    let mut depth = 0;
    for (i, line) in lines.iter().enumerate().skip(open) {
        depth += brace_balance(line.as_ref());
        if depth <= 0 {
            return Some(BlockSpan {
                open,
                close: i,
                terminated: true,
            });
        }
    }

    Some(BlockSpan {
        open,
        close: lines.len() - 1,
        terminated: false,
    })
}
