//! Byte cursor with line and column tracking

use crate::error::Pos;

/// A cursor over an input byte slice.
///
/// Tracks the current offset together with the 1-based line and column so
/// errors can point at the exact spot in the source text.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Byte at the current position, `None` at end of input
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    /// Byte `n` positions ahead of the current one
    pub fn peek(&self, n: usize) -> Option<u8> {
        self.input.get(self.offset.checked_add(n)?).copied()
    }

    /// The next `len` bytes, `None` when fewer remain
    pub fn peek_bytes(&self, len: usize) -> Option<&'a [u8]> {
        self.input.get(self.offset..self.offset.checked_add(len)?)
    }

    /// Advance one byte, updating the line and column counters
    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.offset += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Advance `count` bytes
    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Advance past any ASCII whitespace
    pub fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(b) if b.is_ascii_whitespace()) {
            self.advance();
        }
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Current byte offset into the input
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current position as a line/column pair
    pub fn position(&self) -> Pos {
        Pos::new(self.offset, self.line, self.column)
    }

    /// Bytes between `start` and the current offset
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.offset).unwrap_or_default()
    }

    /// Bytes from the current offset to the end of the input
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.offset..).unwrap_or_default()
    }
}
