//! Error types for franvaro

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input byte that does not fit the XML grammar at this point
    InvalidToken,
    /// Input ended inside an element, tag or attribute
    UnexpectedEof,
    /// Closing tag does not match the open element
    MismatchedTag { expected: String, found: String },
    /// Attribute repeated on one element
    DuplicateAttribute { name: String },
    /// Unknown or malformed character entity
    InvalidEntity,
    /// Input is not valid UTF-8
    InvalidUtf8,
    /// Non-whitespace content after the document root
    TrailingContent,
    /// Element nesting exceeded the configured limit
    MaxDepthExceeded { max: u16 },
    /// Tag or attribute name outside the XML name grammar (writer)
    InvalidName { name: String },
    /// Absence-record position outside the current list (reconciler)
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity => write!(f, "invalid xml entity"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::TrailingContent => write!(f, "content after document root"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::InvalidName { name } => write!(f, "invalid xml name: {name:?}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} absence records")
            }
        }
    }
}

/// Main error type for franvaro
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Create a positionless remove-absence error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfRange { index, len }, Span::empty())
    }

    /// True for errors raised while reading XML text
    pub fn is_parse(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::InvalidName { .. } | ErrorKind::IndexOutOfRange { .. }
        )
    }

    /// True for errors raised while serializing a tree
    pub fn is_generation(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidName { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span == Span::empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for franvaro
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, 0, 1, 1);
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert!(err.is_parse());
        assert!(!err.is_generation());
    }

    #[test]
    fn test_error_display_with_position() {
        let err = Error::at(ErrorKind::UnexpectedEof, 10, 2, 5);
        let display = err.to_string();
        assert!(display.contains("error at 10:2:5"));
        assert!(display.contains("unexpected end of input"));
    }

    #[test]
    fn test_positionless_error_display() {
        let err = Error::index_out_of_range(3, 3);
        assert_eq!(err.to_string(), "index 3 out of range for 3 absence records");
        assert!(!err.is_parse());
    }

    #[test]
    fn test_generation_kind() {
        let err = Error::new(
            ErrorKind::InvalidName {
                name: "bad name".to_string(),
            },
            Span::empty(),
        );
        assert!(err.is_generation());
        assert!(!err.is_parse());
    }
}
