// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Abstract syntax tree for filter expressions.
//!
//! A [`Query`] borrows from the input it was parsed from: keys and function
//! names are views into the source, and string values are only copied when
//! they contain escape sequences.
//!
//! Spans record where a key or function call appeared in the source. They
//! are ignored by equality, so `a<1` and `a < 1` compare equal.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Byte range `[start, end)` in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An identifier: a run of ASCII letters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Key<'a> {
    pub name: &'a str,
    pub span: Span,
}

impl PartialEq for Key<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Key<'_> {}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterEquals,
    /// `<=`
    LessEquals,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEquals => ">=",
            Operator::LessEquals => "<=",
        }
    }

    /// Returns valid operator symbols for error messages.
    pub fn valid_symbols() -> &'static str {
        "one of ==, !=, <, <=, >, >="
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A literal on the right-hand side of a comparison or in a function's
/// argument list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value<'a> {
    Integer(i64),
    Decimal(f64),
    String(Cow<'a, str>),
    Boolean(bool),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(n) => {
                // Always keep a fractional part so the text reads back as a decimal.
                let s = n.to_string();
                if s.contains('.') {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{}.0", s)
                }
            }
            Value::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A key transformed by a function before comparison: `key.name(args)`.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionCall<'a> {
    pub key: Key<'a>,
    pub name: &'a str,
    pub args: Vec<Value<'a>>,
    /// From the start of the key to the closing parenthesis.
    pub span: Span,
}

impl PartialEq for FunctionCall<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.name == other.name && self.args == other.args
    }
}

impl fmt::Display for FunctionCall<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.key, self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// Left-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subject<'a> {
    Key(Key<'a>),
    Call(FunctionCall<'a>),
}

impl<'a> Subject<'a> {
    /// The underlying key, whether bare or function-qualified.
    pub fn key(&self) -> &Key<'a> {
        match self {
            Subject::Key(key) => key,
            Subject::Call(call) => &call.key,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Subject::Key(key) => key.span,
            Subject::Call(call) => call.span,
        }
    }
}

impl fmt::Display for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Key(key) => write!(f, "{}", key),
            Subject::Call(call) => write!(f, "{}", call),
        }
    }
}

/// A leaf: `subject operator value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<'a> {
    pub subject: Subject<'a>,
    pub operator: Operator,
    pub value: Value<'a>,
}

impl fmt::Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.operator, self.value)
    }
}

/// Logical connector between two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn symbol(&self) -> &'static str {
        match self {
            Connector::And => "&&",
            Connector::Or => "||",
        }
    }

    /// Returns valid connector spellings for error messages.
    pub fn valid_symbols() -> &'static str {
        "&&, ||, AND, OR or end of input"
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A parsed filter expression.
///
/// Clauses at the same depth fold left to right, so the right-hand side of
/// a [`Query::Logical`] is always a single comparison or group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query<'a> {
    Comparison(Comparison<'a>),
    Group(Box<Query<'a>>),
    Logical {
        lhs: Box<Query<'a>>,
        connector: Connector,
        rhs: Box<Query<'a>>,
    },
}

impl<'a> Query<'a> {
    /// All leaf comparisons in source order.
    pub fn comparisons(&self) -> Vec<&Comparison<'a>> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Query::Comparison(cmp) => out.push(cmp),
                Query::Group(inner) => pending.push(inner.as_ref()),
                Query::Logical { lhs, rhs, .. } => {
                    pending.push(rhs.as_ref());
                    pending.push(lhs.as_ref());
                }
            }
        }
        out
    }

    /// Maximum parenthesis nesting depth.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            match node {
                Query::Comparison(_) => deepest = deepest.max(depth),
                Query::Group(inner) => pending.push((inner.as_ref(), depth + 1)),
                Query::Logical { lhs, rhs, .. } => {
                    pending.push((lhs.as_ref(), depth));
                    pending.push((rhs.as_ref(), depth));
                }
            }
        }
        deepest
    }

    /// Splits a left-folded chain into its leftmost clause and the
    /// `(connector, clause)` pairs that follow it, in source order.
    fn chain(&self) -> (&Query<'a>, Vec<(Connector, &Query<'a>)>) {
        let mut tail = Vec::new();
        let mut head = self;
        while let Query::Logical {
            lhs,
            connector,
            rhs,
        } = head
        {
            tail.push((*connector, rhs.as_ref()));
            head = lhs.as_ref();
        }
        tail.reverse();
        (head, tail)
    }
}

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, tail) = self.chain();
        // The head of a chain is never itself a logical node.
        if let Query::Comparison(cmp) = head {
            write!(f, "{}", cmp)?;
        } else if let Query::Group(inner) = head {
            write!(f, "({})", inner)?;
        }
        for (connector, rhs) in tail {
            write!(f, " {} {}", connector, rhs)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ast_tests.rs"]
mod tests;
