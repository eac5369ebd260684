//! XML codec: round-trip-safe conversion between text and trees
//!
//! The codec knows nothing about the declaration semantics; it maps any
//! well-formed XML document onto [`XmlNode`](crate::node::XmlNode) trees
//! and back. Repeated siblings collapse to a sequence, a single occurrence
//! stays a single node, and both shapes survive a write unchanged.

pub mod cursor;
pub mod parser;
pub mod writer;

pub use parser::{Parser, ParserConfig};
pub use writer::{WriterConfig, XML_DECLARATION};

use crate::error::Result;
use crate::node::XmlNode;

/// Parse XML text into a document node.
///
/// The returned node is nameless; its children hold the root element.
pub fn parse(text: &str) -> Result<XmlNode> {
    let mut parser = Parser::new(text.as_bytes());
    parser.parse()
}

/// Parse with custom configuration
pub fn parse_with_config(text: &str, config: ParserConfig) -> Result<XmlNode> {
    let mut parser = Parser::with_config(text.as_bytes(), config);
    parser.parse()
}

/// Serialize a document node to pretty-printed XML text
pub fn generate(document: &XmlNode) -> Result<String> {
    writer::write_document(document, WriterConfig::default())
}

/// Serialize with custom configuration
pub fn generate_with_config(document: &XmlNode, config: WriterConfig) -> Result<String> {
    writer::write_document(document, config)
}

pub(crate) fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

pub(crate) fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}
