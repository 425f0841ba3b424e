//! Expression tree for UI-test call chains.

use std::fmt;

/// Arithmetic operators that may appear inside arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Left and right binding power.
    pub(crate) fn binding_power(&self) -> (u8, u8) {
        match self {
            BinaryOp::Add | BinaryOp::Sub => (1, 2),
            BinaryOp::Mul | BinaryOp::Div => (3, 4),
        }
    }
}

/// A parsed expression.
///
/// Literal variants keep their source text verbatim, quotes included, so
/// that rendering a tree gives back the literal exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Free call; `name` may be qualified (`ViewMatchers.withId`).
    Call { name: String, args: Vec<Expr> },
    /// Chained call on a receiver (`onView(..).perform(..)`).
    Method {
        receiver: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    /// Bare or dotted identifier (`R.id.button`, `input`).
    Path(String),
    Str(String),
    Char(String),
    Number(String),
    Paren(Box<Expr>),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    pub fn method(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Method {
            receiver: Box::new(receiver),
            name: name.into(),
            args,
        }
    }

    /// A string literal holding `value`, escaped as needed.
    pub fn string(value: &str) -> Self {
        Expr::Str(quote(value))
    }

    /// Callee name of a call or method call, as written.
    pub fn callee(&self) -> Option<&str> {
        match self {
            Expr::Call { name, .. } | Expr::Method { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Callee name without any qualifying prefix.
    pub fn simple_name(&self) -> Option<&str> {
        self.callee().map(simple_name)
    }

    /// Whether this is a call or method call to `name` (unqualified compare).
    pub fn is_call_to(&self, name: &str) -> bool {
        self.simple_name() == Some(name)
    }

    pub fn args(&self) -> &[Expr] {
        match self {
            Expr::Call { args, .. } | Expr::Method { args, .. } => args,
            _ => &[],
        }
    }

    pub fn args_mut(&mut self) -> Option<&mut Vec<Expr>> {
        match self {
            Expr::Call { args, .. } | Expr::Method { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Unqualified names of every call in the tree, in source order.
    pub fn call_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_call_names(&mut out);
        out
    }

    fn collect_call_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Call { name, args } => {
                out.push(simple_name(name));
                args.iter().for_each(|a| a.collect_call_names(out));
            }
            Expr::Method {
                receiver,
                name,
                args,
            } => {
                receiver.collect_call_names(out);
                out.push(simple_name(name));
                args.iter().for_each(|a| a.collect_call_names(out));
            }
            Expr::Paren(inner) | Expr::Neg(inner) => inner.collect_call_names(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_call_names(out);
                rhs.collect_call_names(out);
            }
            Expr::Path(_) | Expr::Str(_) | Expr::Char(_) | Expr::Number(_) => {}
        }
    }

    pub fn contains_call(&self, name: &str) -> bool {
        self.call_names().contains(&name)
    }

    /// Rebuild the tree bottom-up, applying `f` to each node after its children.
    pub fn rewrite<F: FnMut(Expr) -> Expr>(self, f: &mut F) -> Expr {
        let node = match self {
            Expr::Call { name, args } => Expr::Call {
                name,
                args: args.into_iter().map(|a| a.rewrite(f)).collect(),
            },
            Expr::Method {
                receiver,
                name,
                args,
            } => Expr::Method {
                receiver: Box::new((*receiver).rewrite(f)),
                name,
                args: args.into_iter().map(|a| a.rewrite(f)).collect(),
            },
            Expr::Paren(inner) => Expr::Paren(Box::new((*inner).rewrite(f))),
            Expr::Neg(inner) => Expr::Neg(Box::new((*inner).rewrite(f))),
            Expr::Binary { op, lhs, rhs } => Expr::Binary {
                op,
                lhs: Box::new((*lhs).rewrite(f)),
                rhs: Box::new((*rhs).rewrite(f)),
            },
            leaf => leaf,
        };
        f(node)
    }

    /// Decoded value of a string literal.
    pub fn string_value(&self) -> Option<String> {
        match self {
            Expr::Str(raw) => Some(unquote(raw)),
            _ => None,
        }
    }
}

/// Last segment of a dotted name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    f.write_str("(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Call { name, args } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Expr::Method {
                receiver,
                name,
                args,
            } => {
                write!(f, "{receiver}.{name}")?;
                write_args(f, args)
            }
            Expr::Path(s) | Expr::Str(s) | Expr::Char(s) | Expr::Number(s) => f.write_str(s),
            Expr::Paren(inner) => write!(f, "({inner})"),
            Expr::Neg(inner) => write!(f, "-{inner}"),
            Expr::Binary { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.as_str()),
        }
    }
}

/// Strip the surrounding quotes of a literal and decode its escapes.
///
/// Text without matching surrounding quotes is decoded as-is. Unknown escapes
/// are kept verbatim.
pub fn unquote(raw: &str) -> String {
    let inner = ['"', '\'']
        .iter()
        .find_map(|&q| {
            raw.strip_prefix(q)
                .and_then(|rest| rest.strip_suffix(q))
                .filter(|_| raw.len() >= 2)
        })
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
