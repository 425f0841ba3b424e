//! Parsing synthesized methods into action plans.
//!
//! Parsing is best-effort: each body line is matched against a fixed set of
//! statement shapes and lines that match none of them are ignored.

use std::sync::LazyLock;

use regex::Regex;
use uiflow_syntax::{
    Expr, balanced_block, code_text, is_balanced, parse_expr, split_top_level,
};

use crate::model::{Action, ActionPlan, ActionStep, MatchMode, Matcher, MatcherType};

/// Method name used when no header is found.
pub const UNKNOWN_METHOD: &str = "UnknownMethod";

static METHOD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:void|fun)\s+(\w+)\s*\(").unwrap());

static SLEEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Thread\.sleep\(\s*(\d+)\s*\)$").unwrap());

static STRUCTURAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(withParent|withChild|hasDescendant)\s*\(").unwrap());

/// Zero-argument statements and the action each stands for.
const BARE_ACTIONS: &[(&str, Action)] = &[
    ("pressBack()", Action::PressBack),
    ("closeSoftKeyboard()", Action::CloseSoftKeyboard),
    ("scrollDown()", Action::ScrollDown),
    ("performScrollDown()", Action::ScrollDown),
    ("scrollUp()", Action::ScrollUp),
    ("performScrollUp()", Action::ScrollUp),
    ("swipeLeft50Percent()", Action::SwipeLeft50Percent),
    ("swipeRight50Percent()", Action::SwipeRight50Percent),
    ("performSwipeLeft()", Action::SwipeLeft),
    ("performSwipeRight()", Action::SwipeRight),
];

/// Single-target statements and the action each stands for.
const NODE_ACTIONS: &[(&str, Action)] = &[
    ("performClick", Action::Click),
    ("performSwipeLeftOnNode", Action::SwipeLeftOnNode),
    ("performSwipeRightOnNode", Action::SwipeRightOnNode),
];

/// Name of the first `void name(` / `fun name(` header in `source`.
pub fn method_name(source: &str) -> &str {
    METHOD_HEADER
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map_or(UNKNOWN_METHOD, |m| m.as_str())
}

/// Non-blank lines inside the braces of the first method in `source`.
pub fn method_body_lines(source: &str) -> Vec<&str> {
    let lines: Vec<&str> = source.lines().collect();
    let Some(header) = lines.iter().position(|l| METHOD_HEADER.is_match(l)) else {
        return Vec::new();
    };
    let Some(span) = balanced_block(&lines, header) else {
        return Vec::new();
    };
    lines[span.inner()]
        .iter()
        .copied()
        .filter(|l| !l.trim().is_empty())
        .collect()
}

/// The argument text of `text` when it is exactly one call to `name`.
fn call_argument<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let inner = text
        .trim()
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    is_balanced(inner).then_some(inner.trim())
}

/// Value and mode of a matcher argument: a literal, a string-helper call, or
/// (as a last resort) the argument text itself.
pub fn parse_string_expr(expr: &str, kind: MatcherType) -> (String, MatchMode) {
    let expr = expr.trim();
    match parse_expr(expr) {
        Ok(Expr::Str(raw)) => (uiflow_syntax::unquote(&raw), kind.default_mode()),
        Ok(call @ Expr::Call { .. }) => {
            let helper = call.simple_name().and_then(MatchMode::from_helper);
            match (helper, call.args()) {
                (Some(mode), [Expr::Str(raw)]) => (uiflow_syntax::unquote(raw), mode),
                _ => (expr.to_string(), kind.default_mode()),
            }
        }
        _ => (expr.to_string(), kind.default_mode()),
    }
}

/// Matchers and node query of a node-lookup expression.
///
/// Only `findNode(..)` lookups are understood; anything else yields no
/// matchers and no query. A lookup with a structural relationship keeps its
/// arguments only in the query.
pub fn parse_node_lookup(target: &str) -> (Vec<Matcher>, Option<String>) {
    let Some(inner) = call_argument(target, "findNode") else {
        return (Vec::new(), None);
    };

    if STRUCTURAL.is_match(&code_text(inner)) {
        return (Vec::new(), Some(inner.to_string()));
    }

    let matchers = split_top_level(inner)
        .iter()
        .filter_map(|part| {
            let name = part.split_once('(')?.0.trim();
            let kind = MatcherType::from_matcher_call(name)?;
            let arg = call_argument(part, name).filter(|a| !a.is_empty())?;
            let (value, mode) = parse_string_expr(arg, kind);
            Some(Matcher { kind, value, mode })
        })
        .collect();

    (matchers, Some(inner.to_string()))
}

fn node_step(action: Action, target: &str) -> ActionStep {
    let (matchers, node_query) = parse_node_lookup(target);
    ActionStep {
        matchers,
        node_query,
        ..ActionStep::new(action)
    }
}

/// Text of an input step: a lone string literal loses its surrounding
/// quotes (escapes stay as written), anything else is kept as written.
fn input_text(expr: &str) -> String {
    match parse_expr(expr) {
        Ok(Expr::Str(raw)) => raw[1..raw.len() - 1].to_string(),
        _ => expr.to_string(),
    }
}

/// Parse one body line, or `None` if it is not a recognized statement.
pub fn parse_action_line(line: &str) -> Option<ActionStep> {
    let stmt = line.trim().trim_end_matches(';').trim();

    if let Some((_, action)) = BARE_ACTIONS.iter().find(|(text, _)| *text == stmt) {
        return Some(ActionStep::new(*action));
    }

    if let Some(caps) = SLEEP.captures(stmt) {
        return caps[1].parse().ok().map(ActionStep::sleep);
    }

    for (name, action) in NODE_ACTIONS {
        if let Some(arg) = call_argument(stmt, name) {
            return (!arg.is_empty()).then(|| node_step(*action, arg));
        }
    }

    if let Some(args) = call_argument(stmt, "performInput") {
        let parts = split_top_level(args);
        let target = parts.first().map(String::as_str).unwrap_or_default();
        let text = parts.get(1).map(|t| input_text(t)).unwrap_or_default();
        return Some(ActionStep {
            text: Some(text),
            ..node_step(Action::Input, target)
        });
    }

    None
}

/// Parse a synthesized method into its action plan.
pub fn parse_action_plan(source: &str) -> ActionPlan {
    let method_name = method_name(source).to_string();
    let steps: Vec<ActionStep> = method_body_lines(source)
        .into_iter()
        .filter_map(|line| {
            let step = parse_action_line(line);
            if step.is_none() {
                tracing::trace!(line = line.trim(), "ignoring unrecognized line");
            }
            step
        })
        .collect();

    ActionPlan { method_name, steps }
}
