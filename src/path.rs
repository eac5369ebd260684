//! Fail-soft dotted-path access into node trees

use crate::node::{Children, XmlNode};

/// Walk `path` (dot-separated child names) down from `node`.
///
/// Every step must resolve to a single child. A missing name or a step that
/// lands on a sequence yields `None` instead of an error, so callers probe
/// optional structure without guarding every level.
pub fn extract<'a>(node: &'a XmlNode, path: &str) -> Option<&'a XmlNode> {
    let mut current = node;
    for segment in path.split('.') {
        match current.child(segment)? {
            Children::One(child) => current = child,
            Children::Many(_) => return None,
        }
    }
    Some(current)
}

/// [`extract`] followed by a trimmed text read.
///
/// Returns `None` when the path does not resolve, the node has no text or
/// the text is whitespace only.
pub fn extract_text<'a>(node: &'a XmlNode, path: &str) -> Option<&'a str> {
    let text = extract(node, path)?.text()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
