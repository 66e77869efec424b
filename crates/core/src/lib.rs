// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! filterq: parser for record filter expressions.
//!
//! Turns expressions like `age >= 21 && name == "bob"` into a [`Query`]
//! tree that an evaluation engine can walk. Expressions take the form:
//!
//! ```text
//! key op value { connector key op value }
//! ```
//!
//! # Subjects
//!
//! - `key` - a run of ASCII letters
//! - `key.function(args)` - a key transformed before comparison
//!
//! # Operators
//!
//! - `==`, `!=`, `<`, `<=`, `>`, `>=`
//!
//! # Values
//!
//! - Integer: `21`, `-4`
//! - Decimal: `2.5`
//! - String: `"bob"` (escapes: `\"`, `\\`, `\n`, `\t`)
//! - Boolean: `true`, `false`
//!
//! # Connectors
//!
//! - `&&` / `AND`, `||` / `OR`
//!
//! Connectors combine strictly left to right: `a == 1 && b == 2 || c == 3`
//! reads as `(a == 1 && b == 2) || c == 3`. Use parentheses to group.
//!
//! # Examples
//!
//! ```text
//! age >= 21
//! name.lower() == "bob" && age < 30
//! (a == 1 || b == 2) && active == true
//! ```

pub mod ast;
pub mod builder;
pub mod config;
mod cursor;
pub mod error;
pub mod parser;

pub use ast::{Comparison, Connector, FunctionCall, Key, Operator, Query, Span, Subject, Value};
pub use builder::QueryBuilder;
pub use config::ParserConfig;
pub use error::{Error, ErrorKind, MalformedQuery, Result, StateKind};
pub use parser::{parse, parse_str, parse_with};
