// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A forward-only cursor over a window of the input bytes.
//!
//! Offsets reported by the cursor are always absolute offsets into the
//! original input, so a cursor over a group's enclosed bytes reports the same
//! positions a top-level cursor would.

pub(crate) const SPACE: u8 = b' ';

/// Position into `bytes[start..end]`. Never moves backwards and never passes
/// `end`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteCursor<'a> {
    /// A cursor over the whole input.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        ByteCursor {
            bytes,
            pos: 0,
            end: bytes.len(),
        }
    }

    /// A cursor over `bytes[start..end]`, clamped to the input length.
    pub(crate) fn window(bytes: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(bytes.len());
        ByteCursor {
            bytes,
            pos: start.min(end),
            end,
        }
    }

    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    /// The byte under the cursor.
    pub(crate) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// The byte `n` positions ahead of the cursor, if inside the window.
    pub(crate) fn peek_at(&self, n: usize) -> Option<u8> {
        let at = self.pos.checked_add(n)?;
        if at < self.end {
            self.bytes.get(at).copied()
        } else {
            None
        }
    }

    /// Number of bytes left in the window.
    pub(crate) fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.end);
    }

    /// Moves to `pos`; positions behind the cursor are ignored.
    pub(crate) fn advance_to(&mut self, pos: usize) {
        self.pos = pos.clamp(self.pos, self.end);
    }

    /// Advances while `pred` holds; returns the number of bytes skipped.
    pub(crate) fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let from = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - from
    }

    pub(crate) fn skip_spaces(&mut self) -> usize {
        self.skip_while(|b| b == SPACE)
    }

    /// The bytes in `[from, to)`, clamped to the window.
    pub(crate) fn slice(&self, from: usize, to: usize) -> &'a [u8] {
        let to = to.min(self.end);
        let from = from.min(to);
        &self.bytes[from..to]
    }
}

pub(crate) fn is_alphabetical(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

pub(crate) fn is_numerical(byte: u8) -> bool {
    byte.is_ascii_digit()
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
