//! XML writer: tree → text

use tracing::trace;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::node::XmlNode;
use crate::xml::{is_name_char, is_name_start};

/// Declaration emitted at the top of every generated document
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>";

/// Configuration for the XML writer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Number of spaces per nesting level
    pub indent: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Serialize a document node to pretty-printed XML.
///
/// Children of the document node are written in insertion order after the
/// XML declaration. Text or attributes on the document node itself have no
/// serialization and are ignored. Empty elements are written as explicit
/// `<Tag></Tag>` pairs, never self-closed.
pub fn write_document(document: &XmlNode, config: WriterConfig) -> Result<String> {
    trace!(roots = document.children.len(), "generating xml document");
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    for (name, children) in &document.children {
        for node in children.as_slice() {
            write_element(&mut out, name, node, 0, config)?;
        }
    }
    Ok(out)
}

fn write_element(
    out: &mut String,
    name: &str,
    node: &XmlNode,
    depth: usize,
    config: WriterConfig,
) -> Result<()> {
    if !is_valid_name(name) {
        return Err(invalid_name(name));
    }
    let pad = " ".repeat(depth * config.indent);
    out.push_str(&pad);
    out.push('<');
    out.push_str(name);
    for (attr_name, value) in &node.attributes {
        if !is_valid_name(attr_name) {
            return Err(invalid_name(attr_name));
        }
        out.push(' ');
        out.push_str(attr_name);
        out.push_str("=\"");
        out.push_str(&escape_xml(value));
        out.push('"');
    }
    out.push('>');

    if node.children.is_empty() {
        if let Some(text) = node.text() {
            out.push_str(&escape_xml(text));
        }
    } else {
        out.push('\n');
        if let Some(text) = node.text() {
            out.push_str(&" ".repeat((depth + 1) * config.indent));
            out.push_str(&escape_xml(text));
            out.push('\n');
        }
        for (child_name, children) in &node.children {
            for child in children.as_slice() {
                write_element(out, child_name, child, depth + 1, config)?;
            }
        }
        out.push_str(&pad);
    }
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
    Ok(())
}

fn invalid_name(name: &str) -> Error {
    Error::new(
        ErrorKind::InvalidName {
            name: name.to_string(),
        },
        Span::empty(),
    )
}

/// True when `name` fits the XML tag and attribute name grammar
fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&first) if is_name_start(first) => bytes.iter().skip(1).all(|&b| is_name_char(b)),
        _ => false,
    }
}

/// Escape the five XML special characters
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Children;

    fn document(root_name: &str, root: XmlNode) -> XmlNode {
        let mut document = XmlNode::new();
        document.add_child(root_name, root);
        document
    }

    #[test]
    fn test_writes_declaration_and_root() {
        let out = write_document(&document("r", XmlNode::new()), WriterConfig::default()).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n<r></r>\n"
        );
    }

    #[test]
    fn test_empty_elements_stay_explicit_pairs() {
        let mut root = XmlNode::new();
        root.add_child("empty", XmlNode::new());
        let out = write_document(&document("r", root), WriterConfig::default()).unwrap();
        assert!(out.contains("<empty></empty>"));
        assert!(!out.contains("<empty/>"));
    }

    #[test]
    fn test_indents_two_spaces_per_level() {
        let mut inner = XmlNode::new();
        inner.add_child("leaf", XmlNode::with_text("v"));
        let mut root = XmlNode::new();
        root.add_child("inner", inner);
        let out = write_document(&document("r", root), WriterConfig::default()).unwrap();
        assert!(out.contains("\n  <inner>\n    <leaf>v</leaf>\n  </inner>\n"));
    }

    #[test]
    fn test_indent_width_is_configurable() {
        let mut root = XmlNode::new();
        root.add_child("leaf", XmlNode::with_text("v"));
        let config = WriterConfig { indent: 4 };
        let out = write_document(&document("r", root), config).unwrap();
        assert!(out.contains("\n    <leaf>v</leaf>\n"));
    }

    #[test]
    fn test_sequences_emit_one_element_per_node() {
        let mut root = XmlNode::new();
        root.set_child(
            "item",
            Children::Many(vec![XmlNode::with_text("1"), XmlNode::with_text("2")]),
        );
        let out = write_document(&document("r", root), WriterConfig::default()).unwrap();
        assert!(out.contains("<item>1</item>\n  <item>2</item>"));
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut root = XmlNode::with_text("a < b & c");
        root.set_attr("note", "say \"hi\"");
        let out = write_document(&document("r", root), WriterConfig::default()).unwrap();
        assert!(out.contains("<r note=\"say &quot;hi&quot;\">a &lt; b &amp; c</r>"));
    }

    #[test]
    fn test_mixed_content_puts_text_on_own_line() {
        let mut root = XmlNode::with_text("label");
        root.add_child("child", XmlNode::new());
        let out = write_document(&document("r", root), WriterConfig::default()).unwrap();
        assert!(out.contains("<r>\n  label\n  <child></child>\n</r>"));
    }

    #[test]
    fn test_rejects_invalid_element_name() {
        let mut root = XmlNode::new();
        root.add_child("bad name", XmlNode::new());
        let err = write_document(&document("r", root), WriterConfig::default()).unwrap_err();
        assert!(err.is_generation());
        assert_eq!(
            *err.kind(),
            ErrorKind::InvalidName {
                name: "bad name".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_invalid_attribute_name() {
        let mut root = XmlNode::new();
        root.set_attr("1st", "x");
        let err = write_document(&document("r", root), WriterConfig::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidName { .. }));
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(!is_valid_name(""));
        assert!(is_valid_name("Skatteverket"));
        assert!(is_valid_name("agd:Avsandare"));
        assert!(!is_valid_name("9lives"));
    }

    #[test]
    fn test_document_text_is_ignored() {
        let mut doc = document("r", XmlNode::new());
        doc.set_text("stray");
        let out = write_document(&doc, WriterConfig::default()).unwrap();
        assert!(!out.contains("stray"));
    }
}
