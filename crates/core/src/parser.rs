// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-level state machine turning filter expressions into a [`Query`].
//!
//! The machine makes one forward pass over the input. Every parse owns its
//! cursor, state and builder, so concurrent parses never share anything.
//!
//! A parenthesized group is parsed by a nested machine bounded to the bytes
//! between the parentheses. That window never contains its own closing `)`,
//! so any `)` the machine meets outside a string is unmatched.

use std::borrow::Cow;

use crate::ast::{
    Comparison, Connector, FunctionCall, Key, Operator, Query, Span, Subject, Value,
};
use crate::builder::QueryBuilder;
use crate::config::ParserConfig;
use crate::cursor::{is_alphabetical, is_numerical, ByteCursor, SPACE};
use crate::error::{ErrorKind, MalformedQuery, StateKind};

type ParseResult<T> = std::result::Result<T, MalformedQuery>;

const EXPECT_CLAUSE: &str = "a key or `(`";
const EXPECT_VALUE: &str = "an integer, decimal, string or boolean";
const EXPECT_DELIMITER: &str = "a space or end of input after the value";
const EXPECT_CLOSE: &str = "a matching `)`";

/// Parses a filter expression with the default [`ParserConfig`].
///
/// # Examples
///
/// ```
/// let query = filterq::parse(b"age >= 21 && name == \"bob\"").unwrap();
/// assert_eq!(query.comparisons().len(), 2);
/// ```
///
/// # Errors
///
/// Returns a [`MalformedQuery`] at the first grammar violation.
pub fn parse(input: &[u8]) -> ParseResult<Query<'_>> {
    parse_with(input, &ParserConfig::default())
}

/// Parses a filter expression from a string with the default config.
pub fn parse_str(input: &str) -> ParseResult<Query<'_>> {
    parse(input.as_bytes())
}

/// Parses a filter expression under the limits in `config`.
pub fn parse_with<'a>(input: &'a [u8], config: &ParserConfig) -> ParseResult<Query<'a>> {
    tracing::debug!("parsing filter expression ({} bytes)", input.len());

    if input.len() > config.max_input_len {
        return Err(MalformedQuery::new(
            ErrorKind::LimitExceeded,
            config.max_input_len,
            StateKind::Start,
            "a shorter expression (see max_input_len)",
        ));
    }

    let result = Parser::new(ByteCursor::new(input), 0, config).run();
    match &result {
        Ok(query) => tracing::debug!(
            "parsed {} comparison(s), depth {}",
            query.comparisons().len(),
            query.depth()
        ),
        Err(e) => tracing::debug!(
            "rejected filter expression: {} at offset {} ({})",
            e.kind,
            e.offset,
            e.state
        ),
    }
    result
}

/// Where a literal may end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralContext {
    /// Right-hand side of a comparison: ends at a space or the window end.
    Comparison,
    /// Function argument: also ends at `,` or `)`.
    Argument,
}

impl LiteralContext {
    fn is_delimiter(self, byte: u8) -> bool {
        match self {
            LiteralContext::Comparison => byte == SPACE,
            LiteralContext::Argument => matches!(byte, SPACE | b',' | b')'),
        }
    }

    fn state(self) -> StateKind {
        match self {
            LiteralContext::Comparison => StateKind::Operation,
            LiteralContext::Argument => StateKind::Function,
        }
    }
}

#[derive(Debug)]
enum State<'a> {
    Start,
    Key { from: usize },
    KeyParsed(Subject<'a>),
    Function { key: Key<'a> },
    Grouped { open: usize },
    Operation { subject: Subject<'a>, operator: Operator },
    /// Between clauses.
    Connector,
}

impl State<'_> {
    fn kind(&self) -> StateKind {
        match self {
            State::Start => StateKind::Start,
            State::Key { .. } => StateKind::Key,
            State::KeyParsed(_) => StateKind::KeyParsed,
            State::Function { .. } => StateKind::Function,
            State::Grouped { .. } => StateKind::Grouped,
            State::Operation { .. } => StateKind::Operation,
            State::Connector => StateKind::Connector,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            State::Start => EXPECT_CLAUSE,
            State::Key { .. } => "an operator after the key",
            State::KeyParsed(_) => Operator::valid_symbols(),
            State::Function { .. } => "a function call like `.name(args)`",
            State::Grouped { .. } => EXPECT_CLOSE,
            State::Operation { .. } => EXPECT_VALUE,
            State::Connector => Connector::valid_symbols(),
        }
    }
}

struct Parser<'a, 'c> {
    cursor: ByteCursor<'a>,
    depth: usize,
    /// Clauses seen so far in the whole expression, outer windows included.
    clauses: usize,
    config: &'c ParserConfig,
}

impl<'a, 'c> Parser<'a, 'c> {
    fn new(cursor: ByteCursor<'a>, depth: usize, config: &'c ParserConfig) -> Self {
        Parser {
            cursor,
            depth,
            clauses: 0,
            config,
        }
    }

    fn truncated(&self, state: StateKind, expected: &'static str) -> MalformedQuery {
        MalformedQuery::new(ErrorKind::TruncatedInput, self.cursor.end(), state, expected)
    }

    fn run(&mut self) -> ParseResult<Query<'a>> {
        let mut builder = QueryBuilder::new();
        let mut state = State::Start;

        self.cursor.skip_spaces();
        while let Some(byte) = self.cursor.peek() {
            state = self.step(state, byte, &mut builder)?;
            tracing::trace!("offset {}: {}", self.cursor.position(), state.kind());
        }

        match state {
            State::Connector => builder
                .build()
                .ok_or_else(|| self.truncated(StateKind::Connector, EXPECT_CLAUSE)),
            State::Grouped { open } => Err(MalformedQuery::new(
                ErrorKind::UnmatchedGrouping,
                open,
                StateKind::Grouped,
                EXPECT_CLOSE,
            )),
            other => Err(self.truncated(other.kind(), other.expected())),
        }
    }

    fn step(
        &mut self,
        state: State<'a>,
        byte: u8,
        builder: &mut QueryBuilder<'a>,
    ) -> ParseResult<State<'a>> {
        let pos = self.cursor.position();
        match state {
            State::Start => {
                self.cursor.advance(1);
                if byte == b'(' {
                    self.begin_clause(pos)?;
                    Ok(State::Grouped { open: pos })
                } else if is_alphabetical(byte) {
                    self.begin_clause(pos)?;
                    Ok(State::Key { from: pos })
                } else {
                    let kind = if byte == b')' {
                        ErrorKind::UnmatchedGrouping
                    } else {
                        ErrorKind::UnexpectedByte
                    };
                    Err(MalformedQuery::new(kind, pos, StateKind::Start, EXPECT_CLAUSE))
                }
            }
            State::Key { from } => {
                if is_alphabetical(byte) {
                    self.cursor.advance(1);
                    return Ok(State::Key { from });
                }
                let key = self.key(from, pos)?;
                match byte {
                    SPACE => {
                        self.cursor.advance(1);
                        self.cursor.skip_spaces();
                        Ok(State::KeyParsed(Subject::Key(key)))
                    }
                    b'.' => {
                        self.cursor.advance(1);
                        self.cursor.skip_spaces();
                        Ok(State::Function { key })
                    }
                    _ => Ok(State::KeyParsed(Subject::Key(key))),
                }
            }
            State::KeyParsed(subject) => {
                let operator = self.operator(byte)?;
                self.cursor.skip_spaces();
                Ok(State::Operation { subject, operator })
            }
            State::Function { key } => {
                let call = self.function_call(key)?;
                self.cursor.skip_spaces();
                Ok(State::KeyParsed(Subject::Call(call)))
            }
            State::Grouped { open } => {
                let inner = self.group(open)?;
                builder.clause(Query::Group(Box::new(inner)));
                self.cursor.skip_spaces();
                Ok(State::Connector)
            }
            State::Operation { subject, operator } => {
                let value = self.literal(LiteralContext::Comparison)?;
                builder.clause(Query::Comparison(Comparison {
                    subject,
                    operator,
                    value,
                }));
                self.cursor.skip_spaces();
                Ok(State::Connector)
            }
            State::Connector => {
                let connector = self.connector(byte)?;
                builder.connector(connector);
                self.cursor.skip_spaces();
                Ok(State::Start)
            }
        }
    }

    /// Counts the clause starting at `pos` against `max_clauses`.
    fn begin_clause(&mut self, pos: usize) -> ParseResult<()> {
        self.clauses += 1;
        if self.clauses > self.config.max_clauses {
            return Err(MalformedQuery::new(
                ErrorKind::LimitExceeded,
                pos,
                StateKind::Start,
                "fewer clauses (see max_clauses)",
            ));
        }
        Ok(())
    }

    fn key(&self, from: usize, to: usize) -> ParseResult<Key<'a>> {
        let name = self.ascii(from, to, StateKind::Key)?;
        Ok(Key {
            name,
            span: Span::new(from, to),
        })
    }

    /// Views `[from, to)` as text. Only called on runs already checked to be
    /// ASCII letters.
    fn ascii(&self, from: usize, to: usize, state: StateKind) -> ParseResult<&'a str> {
        std::str::from_utf8(self.cursor.slice(from, to)).map_err(|e| {
            MalformedQuery::new(
                ErrorKind::UnexpectedByte,
                from + e.valid_up_to(),
                state,
                EXPECT_CLAUSE,
            )
        })
    }

    fn operator(&mut self, byte: u8) -> ParseResult<Operator> {
        let pos = self.cursor.position();
        // An operator is always followed by at least one value byte.
        if self.cursor.remaining() < 2 {
            return Err(self.truncated(StateKind::KeyParsed, Operator::valid_symbols()));
        }
        let next = self.cursor.peek_at(1);
        let (operator, len) = match (byte, next) {
            (b'<', Some(b'=')) => (Operator::LessEquals, 2),
            (b'<', _) => (Operator::Less, 1),
            (b'>', Some(b'=')) => (Operator::GreaterEquals, 2),
            (b'>', _) => (Operator::Greater, 1),
            (b'=', Some(b'=')) => (Operator::Equals, 2),
            (b'!', Some(b'=')) => (Operator::NotEquals, 2),
            _ => {
                return Err(MalformedQuery::new(
                    ErrorKind::UnexpectedByte,
                    pos,
                    StateKind::KeyParsed,
                    Operator::valid_symbols(),
                ))
            }
        };
        self.cursor.advance(len);
        Ok(operator)
    }

    fn connector(&mut self, byte: u8) -> ParseResult<Connector> {
        let pos = self.cursor.position();
        match byte {
            b'&' | b'|' => {
                let Some(next) = self.cursor.peek_at(1) else {
                    return Err(self.truncated(StateKind::Connector, Connector::valid_symbols()));
                };
                if next != byte {
                    return Err(MalformedQuery::new(
                        ErrorKind::UnexpectedByte,
                        pos,
                        StateKind::Connector,
                        Connector::valid_symbols(),
                    ));
                }
                self.cursor.advance(2);
                Ok(if byte == b'&' { Connector::And } else { Connector::Or })
            }
            b')' => Err(MalformedQuery::new(
                ErrorKind::UnmatchedGrouping,
                pos,
                StateKind::Connector,
                Connector::valid_symbols(),
            )),
            b if is_alphabetical(b) => {
                let len = self.cursor.skip_while(is_alphabetical);
                let word = self.cursor.slice(pos, pos + len);
                if word.eq_ignore_ascii_case(b"and") {
                    Ok(Connector::And)
                } else if word.eq_ignore_ascii_case(b"or") {
                    Ok(Connector::Or)
                } else {
                    Err(MalformedQuery::new(
                        ErrorKind::UnexpectedByte,
                        pos,
                        StateKind::Connector,
                        Connector::valid_symbols(),
                    ))
                }
            }
            _ => Err(MalformedQuery::new(
                ErrorKind::UnexpectedByte,
                pos,
                StateKind::Connector,
                Connector::valid_symbols(),
            )),
        }
    }

    /// Parses the group opened at `open`; the cursor is just past the `(`.
    fn group(&mut self, open: usize) -> ParseResult<Query<'a>> {
        let depth = self.depth + 1;
        if depth > self.config.max_depth {
            return Err(MalformedQuery::new(
                ErrorKind::LimitExceeded,
                open,
                StateKind::Grouped,
                "shallower nesting (see max_depth)",
            ));
        }

        let close = self.matching_paren(open)?;
        tracing::trace!("group {}..{} at depth {}", open, close, depth);
        let window = ByteCursor::window(self.cursor.bytes(), open + 1, close);
        let mut nested = Parser::new(window, depth, self.config);
        nested.clauses = self.clauses;
        let inner = nested.run()?;
        self.clauses = nested.clauses;
        self.cursor.advance_to(close + 1);
        Ok(inner)
    }

    /// Finds the `)` closing the `(` at `open`, skipping string literals.
    fn matching_paren(&self, open: usize) -> ParseResult<usize> {
        let unmatched = || {
            MalformedQuery::new(
                ErrorKind::UnmatchedGrouping,
                open,
                StateKind::Grouped,
                EXPECT_CLOSE,
            )
        };
        let bytes = self.cursor.slice(open, self.cursor.end());
        let mut layer = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &b) in bytes.iter().enumerate() {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'(' => layer += 1,
                b')' => {
                    layer = layer.checked_sub(1).ok_or_else(unmatched)?;
                    if layer == 0 {
                        return Ok(open + i);
                    }
                }
                _ => {}
            }
        }
        Err(unmatched())
    }

    /// Parses `name(args)`; the cursor is just past the `.` and any spaces.
    fn function_call(&mut self, key: Key<'a>) -> ParseResult<FunctionCall<'a>> {
        const EXPECT_NAME: &str = "a function name";
        const EXPECT_ARGS: &str = "`,` or `)` in the argument list";

        let from = self.cursor.position();
        let len = self.cursor.skip_while(is_alphabetical);
        if len == 0 {
            return Err(match self.cursor.peek() {
                Some(_) => MalformedQuery::new(
                    ErrorKind::UnexpectedByte,
                    from,
                    StateKind::Function,
                    EXPECT_NAME,
                ),
                None => self.truncated(StateKind::Function, EXPECT_NAME),
            });
        }
        let name = self.ascii(from, from + len, StateKind::Function)?;

        match self.cursor.peek() {
            Some(b'(') => self.cursor.advance(1),
            Some(_) => {
                return Err(MalformedQuery::new(
                    ErrorKind::UnexpectedByte,
                    self.cursor.position(),
                    StateKind::Function,
                    "`(` after the function name",
                ))
            }
            None => {
                return Err(self.truncated(StateKind::Function, "`(` after the function name"))
            }
        }
        self.cursor.skip_spaces();

        let mut args = Vec::new();
        if self.cursor.peek() != Some(b')') {
            loop {
                if self.cursor.at_end() {
                    return Err(self.truncated(StateKind::Function, EXPECT_VALUE));
                }
                args.push(self.literal(LiteralContext::Argument)?);
                self.cursor.skip_spaces();
                match self.cursor.peek() {
                    Some(b',') => {
                        self.cursor.advance(1);
                        self.cursor.skip_spaces();
                    }
                    Some(b')') => break,
                    Some(_) => {
                        return Err(MalformedQuery::new(
                            ErrorKind::UnexpectedByte,
                            self.cursor.position(),
                            StateKind::Function,
                            EXPECT_ARGS,
                        ))
                    }
                    None => return Err(self.truncated(StateKind::Function, EXPECT_ARGS)),
                }
            }
        }
        // Cursor is on the closing `)`.
        self.cursor.advance(1);

        Ok(FunctionCall {
            span: Span::new(key.span.start, self.cursor.position()),
            key,
            name,
            args,
        })
    }

    /// Parses a value literal starting at the cursor.
    fn literal(&mut self, ctx: LiteralContext) -> ParseResult<Value<'a>> {
        let pos = self.cursor.position();
        let Some(byte) = self.cursor.peek() else {
            return Err(self.truncated(ctx.state(), EXPECT_VALUE));
        };
        let value = match byte {
            b'"' => self.string(ctx)?,
            b'-' => self.number(ctx)?,
            b if is_numerical(b) => self.number(ctx)?,
            b if is_alphabetical(b) => self.boolean(ctx)?,
            b')' if ctx == LiteralContext::Comparison => {
                return Err(MalformedQuery::new(
                    ErrorKind::UnmatchedGrouping,
                    pos,
                    ctx.state(),
                    EXPECT_VALUE,
                ))
            }
            _ => {
                return Err(MalformedQuery::new(
                    ErrorKind::UnexpectedByte,
                    pos,
                    ctx.state(),
                    EXPECT_VALUE,
                ))
            }
        };
        self.end_of_literal(ctx)?;
        Ok(value)
    }

    /// A literal must be followed by a delimiter or the end of the window.
    fn end_of_literal(&self, ctx: LiteralContext) -> ParseResult<()> {
        match self.cursor.peek() {
            None => Ok(()),
            Some(b) if ctx.is_delimiter(b) => Ok(()),
            Some(b')') => Err(MalformedQuery::new(
                ErrorKind::UnmatchedGrouping,
                self.cursor.position(),
                ctx.state(),
                EXPECT_DELIMITER,
            )),
            Some(_) => Err(MalformedQuery::new(
                ErrorKind::InvalidLiteral,
                self.cursor.position(),
                ctx.state(),
                EXPECT_DELIMITER,
            )),
        }
    }

    fn missing_digit(&self, ctx: LiteralContext) -> MalformedQuery {
        match self.cursor.peek() {
            Some(_) => MalformedQuery::new(
                ErrorKind::InvalidLiteral,
                self.cursor.position(),
                ctx.state(),
                "a digit",
            ),
            None => self.truncated(ctx.state(), "a digit"),
        }
    }

    /// `-?digits` or `-?digits.digits`.
    fn number(&mut self, ctx: LiteralContext) -> ParseResult<Value<'a>> {
        let start = self.cursor.position();
        if self.cursor.peek() == Some(b'-') {
            self.cursor.advance(1);
        }
        if self.cursor.skip_while(is_numerical) == 0 {
            return Err(self.missing_digit(ctx));
        }

        let mut decimal = false;
        if self.cursor.peek() == Some(b'.') {
            decimal = true;
            self.cursor.advance(1);
            if self.cursor.skip_while(is_numerical) == 0 {
                return Err(self.missing_digit(ctx));
            }
        }

        let text = self.ascii(start, self.cursor.position(), ctx.state())?;
        let out_of_range = || {
            MalformedQuery::new(
                ErrorKind::InvalidLiteral,
                start,
                ctx.state(),
                "a number in range",
            )
        };
        if decimal {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Decimal(n)),
                _ => Err(out_of_range()),
            }
        } else {
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| out_of_range())
        }
    }

    /// `true` or `false`, any ASCII case.
    fn boolean(&mut self, ctx: LiteralContext) -> ParseResult<Value<'a>> {
        let start = self.cursor.position();
        let len = self.cursor.skip_while(is_alphabetical);
        let word = self.cursor.slice(start, start + len);
        if word.eq_ignore_ascii_case(b"true") {
            Ok(Value::Boolean(true))
        } else if word.eq_ignore_ascii_case(b"false") {
            Ok(Value::Boolean(false))
        } else {
            Err(MalformedQuery::new(ErrorKind::InvalidLiteral, start, ctx.state(), EXPECT_VALUE))
        }
    }

    /// A `"`-quoted string. Escapes: `\"`, `\\`, `\n`, `\t`.
    fn string(&mut self, ctx: LiteralContext) -> ParseResult<Value<'a>> {
        const EXPECT_QUOTE: &str = "a closing `\"`";

        let open = self.cursor.position();
        self.cursor.advance(1);
        let body = self.cursor.position();
        let mut escapes = false;

        loop {
            match self.cursor.peek() {
                None => return Err(self.truncated(ctx.state(), EXPECT_QUOTE)),
                Some(b'"') => break,
                Some(b'\\') => {
                    match self.cursor.peek_at(1) {
                        Some(b'"' | b'\\' | b'n' | b't') => {}
                        Some(_) => {
                            return Err(MalformedQuery::new(
                                ErrorKind::InvalidLiteral,
                                self.cursor.position(),
                                ctx.state(),
                                "one of \\\", \\\\, \\n, \\t",
                            ))
                        }
                        None => return Err(self.truncated(ctx.state(), EXPECT_QUOTE)),
                    }
                    escapes = true;
                    self.cursor.advance(2);
                }
                Some(_) => self.cursor.advance(1),
            }
        }

        let close = self.cursor.position();
        self.cursor.advance(1);

        let raw = std::str::from_utf8(self.cursor.slice(body, close)).map_err(|e| {
            MalformedQuery::new(
                ErrorKind::InvalidLiteral,
                body + e.valid_up_to(),
                ctx.state(),
                "valid UTF-8 in the string",
            )
        })?;
        tracing::trace!("string literal at {}..{}", open, close + 1);

        if !escapes {
            return Ok(Value::String(Cow::Borrowed(raw)));
        }
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        }
        Ok(Value::String(Cow::Owned(out)))
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
