// ABOUTME: Selector cascade resolver: evaluates a role's ordered matchers against a subtree.
// ABOUTME: Commits to the first matcher yielding a structurally valid node and extracts typed fragments from it.

//! Selector cascade resolution.
//!
//! Key behaviors:
//! - Matchers are tried in order; the first one yielding at least one valid node wins.
//! - Results of different matchers are never merged.
//! - A text role is valid only with non-empty normalized text, an image or link
//!   role only with a non-empty `src`/`href`. Whitespace-only text counts as absent.
//! - The resolver only reads the subtree.

use std::collections::HashSet;

use ego_tree::NodeRef;
use scraper::{ElementRef, Node, Selector};
use url::Url;

use crate::dom::{element_text, heading_level, non_empty_attr};
use crate::extractors::compiled::get_or_compile;
use crate::extractors::rules::{MatcherSpec, RoleCascade};
use crate::model::{EmphasisStyle, Fragment};

/// A semantic extraction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `<img>`-like node producing an image fragment.
    Image,
    /// Card title; heading level 3 unless the node is itself a heading.
    Title,
    /// Column or hero heading; heading level 2 unless the node is itself a heading.
    Heading,
    /// Card subtitle rendered as italic emphasis.
    Subtitle,
    /// Body text.
    Description,
    /// Call-to-action link.
    Cta,
    /// Structural container; valid when it has at least one child element.
    Container,
}

impl Role {
    /// Extracts the fragments for a located node, `None` when the node is not valid for the role.
    fn locate(self, el: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<Vec<Fragment>> {
        match self {
            Role::Image => {
                let src = non_empty_attr(&el, "src").or_else(|| non_empty_attr(&el, "data-src"))?;
                let alt = el.value().attr("alt").map(str::trim).unwrap_or_default();
                Some(vec![Fragment::image(ctx.resolve_url(src), alt)])
            }
            Role::Title | Role::Heading => {
                let text = non_empty_text(&el)?;
                let fallback = if self == Role::Title { 3 } else { 2 };
                let level = heading_level(&el).unwrap_or(fallback);
                Some(vec![Fragment::heading(text, level)])
            }
            Role::Subtitle => {
                let text = non_empty_text(&el)?;
                Some(vec![Fragment::emphasis(text, EmphasisStyle::Italic)])
            }
            Role::Description => Some(vec![Fragment::text(non_empty_text(&el)?)]),
            Role::Cta => {
                let href = non_empty_attr(&el, "href")?;
                Some(vec![Fragment::link(ctx.resolve_url(href), element_text(&el))])
            }
            Role::Container => el.child_elements().next().map(|_| Vec::new()),
        }
    }
}

fn non_empty_text(el: &ElementRef<'_>) -> Option<String> {
    Some(element_text(el)).filter(|t| !t.is_empty())
}

/// Per-import settings visible to the resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractContext<'c> {
    /// Base against which relative `src`/`href` values are resolved.
    pub base_url: Option<&'c Url>,
}

impl<'c> ExtractContext<'c> {
    pub fn new(base_url: Option<&'c Url>) -> Self {
        Self { base_url }
    }

    /// Resolves a reference against the base URL; unresolvable values are kept verbatim.
    pub fn resolve_url(&self, reference: &str) -> String {
        match self.base_url {
            Some(base) => base
                .join(reference)
                .map(String::from)
                .unwrap_or_else(|_| reference.to_string()),
            None => reference.to_string(),
        }
    }
}

/// The committed result of a cascade lookup.
#[derive(Debug, Clone)]
pub struct RoleMatch<'a> {
    /// Index of the matcher that produced this result.
    pub matcher: usize,
    /// Located nodes, in document order.
    pub nodes: Vec<ElementRef<'a>>,
    /// Fragments extracted from `nodes`, in the same order.
    pub fragments: Vec<Fragment>,
}

impl<'a> RoleMatch<'a> {
    pub fn first_node(&self) -> Option<ElementRef<'a>> {
        self.nodes.first().copied()
    }

    pub fn first_fragment(&self) -> Option<&Fragment> {
        self.fragments.first()
    }

    /// Plain text of the first fragment, empty for containers.
    pub fn text(&self) -> &str {
        self.first_fragment().map(Fragment::plain_text).unwrap_or_default()
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }
}

/// Resolves `role` inside `scope` using the ordered `cascade`.
///
/// Returns `None` when no matcher yields a valid node.
pub fn resolve<'a>(
    role: Role,
    cascade: &RoleCascade,
    scope: ElementRef<'a>,
    ctx: &ExtractContext<'_>,
) -> Option<RoleMatch<'a>> {
    for (index, spec) in cascade.matchers.iter().enumerate() {
        let Some(found) = evaluate(role, spec, scope, ctx) else {
            continue;
        };
        let (nodes, fragments): (Vec<_>, Vec<_>) = found.into_iter().unzip();
        tracing::debug!(?role, matcher = index, selector = spec.select(), nodes = nodes.len(), "role resolved");
        return Some(RoleMatch {
            matcher: index,
            nodes,
            fragments: fragments.into_iter().flatten().collect(),
        });
    }
    tracing::trace!(?role, "role not found");
    None
}

/// Convenience wrapper returning only the fragments.
pub fn resolve_fragments(
    role: Role,
    cascade: &RoleCascade,
    scope: ElementRef<'_>,
    ctx: &ExtractContext<'_>,
) -> Vec<Fragment> {
    resolve(role, cascade, scope, ctx)
        .map(RoleMatch::into_fragments)
        .unwrap_or_default()
}

type Located<'a> = (ElementRef<'a>, Vec<Fragment>);

/// Evaluates a single matcher; `None` unless it yields at least one valid node.
fn evaluate<'a>(
    role: Role,
    spec: &MatcherSpec,
    scope: ElementRef<'a>,
    ctx: &ExtractContext<'_>,
) -> Option<Vec<Located<'a>>> {
    let selector = get_or_compile(spec.select())?;
    // A refinement that does not compile disables the whole matcher
    let without = match spec.without() {
        Some(css) => Some(get_or_compile(css)?),
        None => None,
    };
    let closest = match spec.closest() {
        Some(css) => Some(get_or_compile(css)?),
        None => None,
    };

    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for candidate in scope.select(&selector) {
        if let Some(without) = &without {
            if candidate.select(without).next().is_some() {
                continue;
            }
        }
        let target = match &closest {
            Some(closest) => match closest_within(candidate, closest, scope) {
                Some(target) => target,
                None => continue,
            },
            None => candidate,
        };
        if !seen.insert(target.id()) {
            continue;
        }
        if let Some(fragments) = role.locate(target, ctx) {
            found.push((target, fragments));
            if !spec.all() {
                break;
            }
        }
    }

    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}

/// Nearest ancestor-or-self of `el` matching `selector`, never leaving `scope`.
fn closest_within<'a>(
    el: ElementRef<'a>,
    selector: &Selector,
    scope: ElementRef<'a>,
) -> Option<ElementRef<'a>> {
    let start: NodeRef<'a, Node> = *el;
    for node in std::iter::once(start).chain(start.ancestors()) {
        let Some(candidate) = ElementRef::wrap(node) else {
            break;
        };
        if selector.matches(&candidate) {
            return Some(candidate);
        }
        if candidate.id() == scope.id() {
            break;
        }
    }
    None
}
