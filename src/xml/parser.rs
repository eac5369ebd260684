//! XML reader: text → tree

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::node::XmlNode;
use crate::xml::cursor::Cursor;
use crate::xml::{is_name_char, is_name_start};

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Configuration for the XML reader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum element nesting depth, 0 disables the check
    pub max_depth: u16,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Recursive-descent XML parser producing [`XmlNode`] trees
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: ParserConfig,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: ParserConfig) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
        }
    }

    /// Parse a complete document.
    ///
    /// Returns a nameless document node whose only child entry is the root
    /// element. The XML declaration, comments, processing instructions and
    /// the DOCTYPE are skipped; anything else outside the root is an error.
    pub fn parse(&mut self) -> Result<XmlNode> {
        trace!(bytes = self.cursor.remaining().len(), "parsing xml document");
        if self.cursor.peek_bytes(BOM.len()) == Some(BOM) {
            self.cursor.advance_by(BOM.len());
        }
        self.skip_misc()?;
        let (name, root) = self.parse_element(0)?;
        let mut document = XmlNode::new();
        document.add_child(name, root);
        self.skip_misc()?;
        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::TrailingContent));
        }
        Ok(document)
    }

    /// Skip whitespace, comments, processing instructions and declarations
    /// between top-level constructs
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            match (self.cursor.current(), self.cursor.peek(1)) {
                (Some(b'<'), Some(b'!')) => {
                    self.cursor.advance();
                    self.skip_declaration_or_comment()?;
                }
                (Some(b'<'), Some(b'?')) => {
                    self.cursor.advance();
                    self.skip_processing_instruction()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Parse one element, cursor at `<`. Returns the tag name and the node.
    fn parse_element(&mut self, depth: u16) -> Result<(String, XmlNode)> {
        if self.config.max_depth > 0 && depth >= self.config.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }
        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        let mut node = XmlNode::new();
        node.attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok((name, node));
        }
        self.expect_byte(b'>')?;

        loop {
            match self.cursor.current() {
                Some(b'<') => match self.cursor.peek(1) {
                    Some(b'/') => {
                        self.cursor.advance_by(2);
                        let found = self.parse_name()?;
                        if found != name {
                            return Err(self.error_here(ErrorKind::MismatchedTag {
                                expected: name,
                                found,
                            }));
                        }
                        self.cursor.skip_whitespace();
                        self.expect_byte(b'>')?;
                        break;
                    }
                    Some(b'!') => {
                        self.cursor.advance();
                        self.skip_declaration_or_comment()?;
                    }
                    Some(b'?') => {
                        self.cursor.advance();
                        self.skip_processing_instruction()?;
                    }
                    _ => {
                        let (child_name, child) = self.parse_element(depth + 1)?;
                        node.add_child(child_name, child);
                    }
                },
                Some(_) => {
                    if let Some(text) = self.parse_text()? {
                        match node.text.as_mut() {
                            Some(existing) => existing.push_str(&text),
                            None => node.text = Some(text),
                        }
                    }
                }
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }
        }
        Ok((name, node))
    }

    /// Parse a tag or attribute name
    fn parse_name(&mut self) -> Result<String> {
        match self.cursor.current() {
            Some(b) if is_name_start(b) => {}
            Some(_) => {
                return Err(self.error_here_msg(ErrorKind::InvalidToken, "expected a name"));
            }
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
        let start = self.cursor.offset();
        while matches!(self.cursor.current(), Some(b) if is_name_char(b)) {
            self.cursor.advance();
        }
        bytes_to_string(self.cursor.slice_from(start))
    }

    /// Parse attributes up to `/` or `>`
    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attributes = IndexMap::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;
            if attributes.contains_key(&name) {
                return Err(self.error_here(ErrorKind::DuplicateAttribute { name }));
            }
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    /// Parse a quoted attribute value, decoding entities
    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            Some(_) => {
                return Err(
                    self.error_here_msg(ErrorKind::InvalidToken, "expected a quoted value")
                );
            }
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        };
        self.cursor.advance();
        let start = self.cursor.offset();
        loop {
            match self.cursor.current() {
                Some(b) if b == quote => break,
                Some(_) => self.cursor.advance(),
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }
        }
        let raw = bytes_to_string(self.cursor.slice_from(start))?;
        self.cursor.advance();
        self.decode_entities(&raw)
    }

    /// Parse a text run up to the next `<`.
    ///
    /// Entities are decoded, surrounding whitespace is trimmed and runs that
    /// are whitespace only collapse to `None`.
    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.offset();
        while matches!(self.cursor.current(), Some(b) if b != b'<') {
            self.cursor.advance();
        }
        let raw = bytes_to_string(self.cursor.slice_from(start))?;
        let decoded = self.decode_entities(&raw)?;
        let trimmed = decoded.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    /// Skip a comment, CDATA section or DOCTYPE, cursor at `!`
    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            return self.skip_until(b"-->");
        }
        if self.cursor.peek(1) == Some(b'[') && self.cursor.peek(2) == Some(b'C') {
            self.cursor.advance_by(2);
            return self.skip_until(b"]]>");
        }
        self.skip_until(b">")
    }

    /// Skip a processing instruction, cursor at `?`
    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance();
        self.skip_until(b"?>")
    }

    /// Advance past the next occurrence of `pattern`
    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here_msg(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.cursor.current() {
            Some(b) if b == expected => {
                self.cursor.advance();
                Ok(())
            }
            Some(_) => Err(self.error_here_msg(
                ErrorKind::InvalidToken,
                format!("expected {:?}", char::from(expected)),
            )),
            None => Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
    }

    /// Replace the five named entities and numeric character references
    fn decode_entities(&self, input: &str) -> Result<String> {
        if !input.contains('&') {
            return Ok(input.to_string());
        }
        let mut out = String::with_capacity(input.len());
        let mut chars = input.chars();
        while let Some(c) = chars.next() {
            if c != '&' {
                out.push(c);
                continue;
            }
            let mut entity = String::new();
            let mut terminated = false;
            for next in chars.by_ref() {
                if next == ';' {
                    terminated = true;
                    break;
                }
                entity.push(next);
            }
            if !terminated {
                return Err(self.error_here(ErrorKind::InvalidEntity));
            }
            match entity.as_str() {
                "amp" => out.push('&'),
                "lt" => out.push('<'),
                "gt" => out.push('>'),
                "quot" => out.push('"'),
                "apos" => out.push('\''),
                _ => match decode_numeric_entity(&entity) {
                    Some(c) => out.push(c),
                    None => return Err(self.error_here(ErrorKind::InvalidEntity)),
                },
            }
        }
        Ok(out)
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        let pos = self.cursor.position();
        Error::new(kind, Span::new(pos, pos))
    }

    fn error_here_msg(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        let pos = self.cursor.position();
        Error::with_message(kind, Span::new(pos, pos), message)
    }
}

/// Decode `#xHH` or `#DD` character references
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::empty()))
}
