//! Validation and rewriting of Espresso statements into internal statements.
//!
//! A statement is accepted only when every call in its matcher portion and
//! every call inside `.perform(..)` is in the closed vocabulary
//! ([`crate::vocab`]). The lookup is parsed into an [`Expr`]; the actions are
//! kept as source text split on top-level commas, so their arguments may use
//! any host-language syntax (`name!!`, `items[0]`, casts).
//! Accepted statements are rewritten in a fixed order:
//!
//! 1. `isRoot()` lookups become screen-level calls (`performSwipeLeft();`,
//!    `performSwipeRight();`, `performOnRoot(..);`)
//! 2. zero-argument ignorable matchers (`isDisplayed()`, ...) are dropped
//! 3. namespace qualifiers (`ViewMatchers.`, ...) are dropped
//! 4. `withId(R.id.x)` / `withId(android.R.id.x)` become `withId("x")`
//! 5. `allOf(..)` is spliced into its enclosing argument list
//! 6. `onView(..)` becomes `findNode(..)`
//! 7. the action picks the wrapper: `performInput`, `performScrollDown`,
//!    `performClick`, `performSwipeLeftOnNode`, `performSwipeRightOnNode`,
//!    or `<lookup>.perform(..)` for anything else
//!
//! The lookup is rendered from the expression tree and actions are joined
//! with `, `, so spacing is canonical at the top level.

use std::sync::LazyLock;

use regex::Regex;
use uiflow_syntax::{
    Expr, code_text, find_top_level, is_balanced, parse_expr, simple_name, split_top_level,
};

use crate::vocab;

static SLEEP_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Thread\.sleep\(\d+\);?$").unwrap());

/// Any identifier immediately followed by `(`.
static CALL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*\(").unwrap());

/// Leading (possibly qualified) callee of an action.
static CALLEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)\s*\(").unwrap()
});

const PERFORM: &str = ".perform(";

/// Why a statement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatementError {
    #[error("unsupported matcher(s): {}", .0.join(", "))]
    UnsupportedMatcher(Vec<String>),

    #[error("unsupported action(s): {}", .0.join(", "))]
    UnsupportedAction(Vec<String>),

    #[error("expected `<lookup>.perform(<actions>);`, got: {0}")]
    InvalidFormat(String),
}

/// Result of rewriting one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Statement(String),
    /// The statement did not have the `<lookup>.perform(..);` shape.
    Malformed { statement: String },
}

impl Rewrite {
    pub fn statement(&self) -> Option<&str> {
        match self {
            Rewrite::Statement(s) => Some(s),
            Rewrite::Malformed { .. } => None,
        }
    }
}

/// One entry of a `.perform(..)` argument list, kept as source text.
#[derive(Debug, Clone)]
struct ActionCall {
    /// Rendered text, with any namespace qualifier dropped from the callee.
    text: String,
    /// Unqualified callee, when the action is a call.
    name: Option<String>,
    /// Top-level argument texts of the call.
    args: Vec<String>,
}

impl ActionCall {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let call = CALLEE.captures(raw).and_then(|caps| {
            let whole = caps.get(0)?;
            let inner = raw[whole.end()..].strip_suffix(')')?;
            is_balanced(inner).then(|| {
                let qualified: String = caps[1].split_whitespace().collect();
                (qualified, split_top_level(inner))
            })
        });

        match call {
            Some((qualified, args)) => {
                let callee = vocab::strip_namespace(&qualified).to_string();
                Self {
                    text: format!("{callee}({})", args.join(", ")),
                    name: Some(simple_name(&callee).to_string()),
                    args,
                }
            }
            None => Self {
                text: raw.to_string(),
                name: None,
                args: Vec::new(),
            },
        }
    }

    fn is_call_to(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    fn is_bare_call_to(&self, name: &str) -> bool {
        self.is_call_to(name) && self.args.is_empty()
    }
}

/// A statement of the shape `<lookup>.perform(<actions>);`.
struct PerformStatement<'a> {
    lookup: Expr,
    actions_text: &'a str,
    actions: Vec<ActionCall>,
}

/// Split a statement at its top-level `.perform(`.
///
/// Only the lookup has to fit the call-chain grammar; the action list just
/// needs balanced parentheses.
fn split_perform(stmt: &str) -> Option<PerformStatement<'_>> {
    let body = stmt.trim().strip_suffix(';')?.trim_end();
    let at = find_top_level(body, PERFORM)?;
    let actions_text = body[at + PERFORM.len()..].strip_suffix(')')?;
    if !is_balanced(actions_text) {
        return None;
    }
    let lookup = parse_expr(&body[..at]).ok()?;
    let actions = split_top_level(actions_text)
        .iter()
        .map(|a| ActionCall::parse(a))
        .collect();
    Some(PerformStatement {
        lookup,
        actions_text,
        actions,
    })
}

fn join_actions(actions: &[ActionCall]) -> String {
    actions
        .iter()
        .map(|a| a.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn dedup_in_order(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Check a normalized statement against the supported vocabulary.
pub fn validate_statement(stmt: &str) -> Result<(), StatementError> {
    let parts =
        split_perform(stmt).ok_or_else(|| StatementError::InvalidFormat(stmt.trim().to_string()))?;

    let unsupported = dedup_in_order(
        parts
            .lookup
            .call_names()
            .into_iter()
            .filter(|n| !vocab::is_supported_matcher(n) && !vocab::is_string_helper(n))
            .map(str::to_string),
    );
    if !unsupported.is_empty() {
        return Err(StatementError::UnsupportedMatcher(unsupported));
    }

    let action_code = code_text(parts.actions_text);
    let unsupported = dedup_in_order(
        CALL_NAME
            .captures_iter(&action_code)
            .map(|caps| caps[1].to_string())
            .filter(|n| !vocab::is_supported_action(n)),
    );
    if !unsupported.is_empty() {
        return Err(StatementError::UnsupportedAction(unsupported));
    }

    Ok(())
}

/// Whether `stmt` is a non-interactive helper line kept verbatim:
/// `pressBack()`, `closeSoftKeyboard()` or `Thread.sleep(<int>)`.
pub fn validate_helper_statement(stmt: &str) -> bool {
    let stmt = stmt.trim();
    vocab::HELPER_STATEMENTS.contains(&stmt) || SLEEP_STATEMENT.is_match(stmt)
}

fn strip_ignorable(expr: Expr) -> Expr {
    expr.rewrite(&mut |mut node| {
        if let Some(args) = node.args_mut() {
            args.retain(|arg| {
                !(matches!(arg, Expr::Call { args, .. } if args.is_empty())
                    && arg.simple_name().is_some_and(vocab::is_ignorable_matcher))
            });
        }
        node
    })
}

fn strip_namespaces(expr: Expr) -> Expr {
    expr.rewrite(&mut |node| match node {
        Expr::Call { name, args } => Expr::Call {
            name: vocab::strip_namespace(&name).to_string(),
            args,
        },
        other => other,
    })
}

fn resource_id_name(path: &str) -> Option<&str> {
    let name = path
        .strip_prefix("android.R.id.")
        .or_else(|| path.strip_prefix("R.id."))?;
    (!name.is_empty() && !name.contains('.')).then_some(name)
}

fn resolve_resource_ids(expr: Expr) -> Expr {
    expr.rewrite(&mut |node| match node {
        Expr::Call { name, args } if simple_name(&name) == "withId" => {
            let id = match args.as_slice() {
                [Expr::Path(path)] => resource_id_name(path).map(str::to_string),
                _ => None,
            };
            let args = match id {
                Some(id) => vec![Expr::string(&id)],
                None => args,
            };
            Expr::Call { name, args }
        }
        other => other,
    })
}

fn splice_all_of(args: Vec<Expr>) -> Vec<Expr> {
    args.into_iter()
        .flat_map(|arg| match arg {
            Expr::Call { name, args } if simple_name(&name) == "allOf" => args,
            other => vec![other],
        })
        .collect()
}

/// Splice every nested `allOf(..)` into the argument list that holds it.
///
/// Works bottom-up, so one pass removes every level. An `allOf` at the very
/// root has no enclosing list and is left in place.
pub fn flatten_all_of(expr: Expr) -> Expr {
    expr.rewrite(&mut |node| match node {
        Expr::Call { name, args } => Expr::Call {
            name,
            args: splice_all_of(args),
        },
        Expr::Method {
            receiver,
            name,
            args,
        } => Expr::Method {
            receiver,
            name,
            args: splice_all_of(args),
        },
        other => other,
    })
}

fn root_action(actions: &[ActionCall]) -> String {
    if let [only] = actions {
        if only.is_bare_call_to("swipeLeft") {
            return "performSwipeLeft();".to_string();
        }
        if only.is_bare_call_to("swipeRight") {
            return "performSwipeRight();".to_string();
        }
    }
    format!("performOnRoot({});", join_actions(actions))
}

fn node_action(lookup: Expr, actions: &[ActionCall]) -> String {
    let text = actions
        .iter()
        .find(|a| a.is_call_to("typeText") || a.is_call_to("replaceText"))
        .and_then(|a| a.args.first());
    if let Some(text) = text {
        return format!("performInput({lookup}, {text});");
    }

    let wrapper = match actions {
        [only] if only.is_bare_call_to("scrollTo") => {
            tracing::debug!(lookup = %lookup, "scrollTo() becomes a screen scroll; target dropped");
            return "performScrollDown();".to_string();
        }
        [only] if only.is_bare_call_to("click") => "performClick",
        [only] if only.is_bare_call_to("swipeLeft") => "performSwipeLeftOnNode",
        [only] if only.is_bare_call_to("swipeRight") => "performSwipeRightOnNode",
        _ => return format!("{lookup}.perform({});", join_actions(actions)),
    };
    format!("{};", Expr::call(wrapper, vec![lookup]))
}

/// Rewrite a statement without validating it.
///
/// Never fails: input without the `<lookup>.perform(..);` shape comes back
/// as [`Rewrite::Malformed`].
pub fn rewrite_statement(stmt: &str) -> Rewrite {
    let malformed = || Rewrite::Malformed {
        statement: stmt.trim().to_string(),
    };
    let Some(PerformStatement {
        lookup, actions, ..
    }) = split_perform(stmt)
    else {
        return malformed();
    };

    if lookup.contains_call("isRoot") {
        return Rewrite::Statement(root_action(&actions));
    }

    let lookup = strip_ignorable(lookup);
    let lookup = strip_namespaces(lookup);
    let lookup = resolve_resource_ids(lookup);
    let lookup = flatten_all_of(lookup);

    let lookup = match lookup {
        Expr::Call { name, args } if name == "onView" => Expr::call("findNode", args),
        _ => return malformed(),
    };

    Rewrite::Statement(node_action(lookup, &actions))
}

/// Validate, then rewrite.
pub fn convert_statement(stmt: &str) -> Result<Rewrite, StatementError> {
    validate_statement(stmt)?;
    Ok(rewrite_statement(stmt))
}
