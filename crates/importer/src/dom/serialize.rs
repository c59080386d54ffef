// ABOUTME: Filtered HTML serializer used for every document rewrite.
// ABOUTME: Skips removed subtrees, strips denylisted attributes and splices in substitute markup by node id.

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// Children of these elements are parsed as raw text and must not be escaped
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

// Everything after this start tag is text up to end of input, so nothing may follow it
const PLAINTEXT: &str = "plaintext";

/// Rewrite instructions applied while serializing.
#[derive(Debug, Clone, Default)]
pub struct SerializeFilter {
    /// Roots of subtrees to drop.
    pub skip: HashSet<NodeId>,
    /// Attribute names (ASCII case-insensitive) to drop from every element.
    pub strip_attributes: Vec<String>,
    /// Nodes whose whole subtree is replaced by the given markup.
    pub substitutions: HashMap<NodeId, String>,
}

impl SerializeFilter {
    pub fn is_noop(&self) -> bool {
        self.skip.is_empty() && self.strip_attributes.is_empty() && self.substitutions.is_empty()
    }

    fn keeps_attr(&self, name: &str) -> bool {
        !self
            .strip_attributes
            .iter()
            .any(|denied| denied.eq_ignore_ascii_case(name))
    }
}

/// Serializes a whole document, doctype included, applying `filter`.
pub fn serialize_document(doc: &Html, filter: &SerializeFilter) -> String {
    let mut output = String::new();
    let _ = serialize_children(doc.tree.root(), filter, &mut output);
    output
}

fn serialize_children(
    node: NodeRef<Node>,
    filter: &SerializeFilter,
    output: &mut String,
) -> ControlFlow<()> {
    for child in node.children() {
        serialize_node(child, filter, output)?;
    }
    ControlFlow::Continue(())
}

/// Writes one node. Breaks after a `<plaintext>` element: nothing may follow it.
fn serialize_node(
    node: NodeRef<Node>,
    filter: &SerializeFilter,
    output: &mut String,
) -> ControlFlow<()> {
    if let Some(replacement) = filter.substitutions.get(&node.id()) {
        output.push_str(replacement);
        return ControlFlow::Continue(());
    }
    if filter.skip.contains(&node.id()) {
        return ControlFlow::Continue(());
    }

    match node.value() {
        Node::Document | Node::Fragment => serialize_children(node, filter, output)?,
        Node::Doctype(doctype) => {
            output.push_str("<!DOCTYPE ");
            output.push_str(doctype.name());
            output.push('>');
        }
        Node::Comment(comment) => {
            output.push_str("<!--");
            output.push_str(&**comment);
            output.push_str("-->");
        }
        Node::Text(text) => {
            if in_raw_text_element(node) {
                output.push_str(&**text);
            } else {
                output.push_str(&html_escape::encode_text(&**text));
            }
        }
        Node::Element(el) => {
            let tag_name = el.name();

            output.push('<');
            output.push_str(tag_name);
            for (name, value) in el.attrs() {
                if !filter.keeps_attr(name) {
                    continue;
                }
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(&html_escape::encode_double_quoted_attribute(value));
                output.push('"');
            }

            if is_void_element(tag_name) {
                output.push_str(" />");
                return ControlFlow::Continue(());
            }
            output.push('>');
            serialize_children(node, filter, output)?;
            if tag_name.eq_ignore_ascii_case(PLAINTEXT) {
                return ControlFlow::Break(());
            }
            output.push_str("</");
            output.push_str(tag_name);
            output.push('>');
        }
        Node::ProcessingInstruction(_) => {}
    }
    ControlFlow::Continue(())
}

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn in_raw_text_element(node: NodeRef<Node>) -> bool {
    node.parent()
        .and_then(|p| p.value().as_element().map(|el| el.name().to_ascii_lowercase()))
        .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name.as_str()))
}
