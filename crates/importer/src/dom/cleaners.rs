// ABOUTME: Denylist cleanup filter run before and after block extraction.
// ABOUTME: Removes chrome subtrees, conditionally removes empty placeholders and strips tracking attributes.

use std::collections::{HashMap, HashSet};

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

use super::serialize::{serialize_document, SerializeFilter};
use crate::extractors::compiled::get_or_compile;

/// Denylists for one cleanup pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanupRules {
    /// Selectors whose matching subtrees are removed.
    #[serde(default)]
    pub remove: Vec<String>,
    /// Selectors whose matches are removed only when they hold no text and no image.
    #[serde(default)]
    pub remove_if_empty: Vec<String>,
    /// Attribute names stripped from every remaining element.
    #[serde(default)]
    pub strip_attributes: Vec<String>,
}

impl CleanupRules {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.remove_if_empty.is_empty() && self.strip_attributes.is_empty()
    }
}

/// Collects the roots of every subtree the pass removes.
///
/// Emptiness for `remove_if_empty` is judged after the unconditional removals,
/// so a placeholder holding only denylisted chrome is removed as well.
pub fn removal_set(doc: &Html, rules: &CleanupRules) -> HashSet<NodeId> {
    let mut skip = HashSet::new();

    for css in &rules.remove {
        let Some(selector) = get_or_compile(css) else {
            continue;
        };
        for el in doc.select(&selector) {
            skip.insert(el.id());
        }
    }

    for css in &rules.remove_if_empty {
        let Some(selector) = get_or_compile(css) else {
            continue;
        };
        for el in doc.select(&selector) {
            if !has_content(*el, &skip) {
                skip.insert(el.id());
            }
        }
    }

    skip
}

/// Runs one cleanup pass and returns the serialized document.
pub fn clean_document(doc: &Html, rules: &CleanupRules) -> String {
    let filter = SerializeFilter {
        skip: removal_set(doc, rules),
        strip_attributes: rules.strip_attributes.clone(),
        substitutions: HashMap::new(),
    };
    tracing::debug!(
        removed = filter.skip.len(),
        stripped_attrs = filter.strip_attributes.len(),
        "cleanup pass"
    );
    serialize_document(doc, &filter)
}

/// Parses, cleans and re-serializes an HTML document.
pub fn clean_html(html: &str, rules: &CleanupRules) -> String {
    clean_document(&Html::parse_document(html), rules)
}

/// True when the node has non-whitespace text or an image outside skipped subtrees.
fn has_content(node: NodeRef<Node>, skip: &HashSet<NodeId>) -> bool {
    node.children().any(|child| {
        if skip.contains(&child.id()) {
            return false;
        }
        match child.value() {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(el) if el.name().eq_ignore_ascii_case("img") => true,
            Node::Element(_) => has_content(child, skip),
            _ => false,
        }
    })
}
