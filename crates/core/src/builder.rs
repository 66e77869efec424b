// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Folds a flat stream of clauses and connectors into a [`Query`].
//!
//! Clauses combine strictly left to right with no precedence between AND
//! and OR:
//!
//! ```text
//! a == 1 && b == 2 || c == 3   =>   ((a == 1) && (b == 2)) || (c == 3)
//! ```
//!
//! A group is pushed as a single clause, so it always binds tighter than the
//! connectors around it.

use crate::ast::{Connector, Query};

/// Incremental left fold over clause/connector events.
///
/// The tree is grown as events arrive: every clause that follows a
/// connector becomes the right-hand side of a new [`Query::Logical`] whose
/// left-hand side is everything folded so far.
#[derive(Debug, Default)]
pub struct QueryBuilder<'a> {
    root: Option<Query<'a>>,
    pending: Option<Connector>,
    malformed: bool,
}

impl<'a> QueryBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a comparison or group.
    pub fn clause(&mut self, clause: Query<'a>) -> &mut Self {
        self.root = match (self.root.take(), self.pending.take()) {
            (None, None) => Some(clause),
            (Some(lhs), Some(connector)) => Some(Query::Logical {
                lhs: Box::new(lhs),
                connector,
                rhs: Box::new(clause),
            }),
            (lhs, _) => {
                // Two clauses without a connector, or a leading connector.
                self.malformed = true;
                lhs
            }
        };
        self
    }

    /// Pushes a connector between the previous clause and the next one.
    pub fn connector(&mut self, connector: Connector) -> &mut Self {
        if self.root.is_none() || self.pending.is_some() {
            self.malformed = true;
        }
        self.pending = Some(connector);
        self
    }

    /// True when a connector is waiting for its right-hand clause.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The folded query, or `None` if no clause was pushed or the event
    /// sequence was not `clause { connector clause }`.
    pub fn build(self) -> Option<Query<'a>> {
        if self.malformed || self.pending.is_some() {
            return None;
        }
        self.root
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
