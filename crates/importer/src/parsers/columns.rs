// ABOUTME: Columns block parser: one row with one cell per non-empty sibling column container.
// ABOUTME: Column bodies come from rich-text paragraphs, with image and CTA fallbacks for bare columns.

use scraper::{ElementRef, Selector};

use super::BlockParser;
use crate::dom::{element_text, non_empty_attr};
use crate::extractors::compiled::get_or_compile;
use crate::extractors::rules::ColumnsRules;
use crate::extractors::select::{resolve, resolve_fragments, ExtractContext, Role};
use crate::model::{Block, BlockKind, Cell, EmphasisStyle, Fragment, Row};

/// Parses multi-column layouts into a single row.
///
/// Columns whose resolved content is empty are dropped; the rest keep their
/// source order. Without any row container the whole element is one column.
#[derive(Debug, Clone, Default)]
pub struct ColumnsParser {
    rules: ColumnsRules,
}

impl ColumnsParser {
    pub fn new(rules: ColumnsRules) -> Self {
        Self { rules }
    }

    fn columns<'a>(&self, element: ElementRef<'a>, ctx: &ExtractContext<'_>) -> Vec<ElementRef<'a>> {
        let marker = get_or_compile(&self.rules.column);
        let is_column = |child: &ElementRef<'_>| marker.as_ref().is_some_and(|s| s.matches(child));

        match resolve(Role::Container, &self.rules.row, element, ctx).and_then(|m| m.first_node()) {
            Some(row) => {
                let marked: Vec<_> = row.child_elements().filter(is_column).collect();
                if marked.is_empty() {
                    row.child_elements().collect()
                } else {
                    marked
                }
            }
            None => {
                let marked: Vec<_> = element.child_elements().filter(is_column).collect();
                if marked.is_empty() {
                    tracing::debug!("no row container, treating subtree as one column");
                    vec![element]
                } else {
                    marked
                }
            }
        }
    }

    fn column_fragments(&self, column: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Vec<Fragment> {
        let mut fragments = resolve_fragments(Role::Heading, &self.rules.heading, column, ctx);

        let body: Vec<Fragment> = resolve(Role::Container, &self.rules.rich_text, column, ctx)
            .and_then(|m| m.first_node())
            .map(|container| self.paragraphs(container, ctx))
            .unwrap_or_default();

        if body.is_empty() {
            if let Some(image) = resolve(Role::Image, &self.rules.image, column, ctx) {
                fragments.extend(image.into_fragments());
            }
            fragments.extend(resolve_fragments(Role::Cta, &self.rules.cta, column, ctx));
        } else {
            fragments.extend(body);
        }
        fragments
    }

    fn paragraphs(&self, container: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Vec<Fragment> {
        let Some(paragraph) = get_or_compile(&self.rules.paragraph) else {
            return Vec::new();
        };
        let bold = get_or_compile(&self.rules.bold);
        let anchor = get_or_compile("a");

        container
            .select(&paragraph)
            .filter_map(|p| paragraph_fragment(p, anchor.as_ref(), bold.as_ref(), ctx))
            .collect()
    }
}

fn paragraph_fragment(
    p: ElementRef<'_>,
    anchor: Option<&Selector>,
    bold: Option<&Selector>,
    ctx: &ExtractContext<'_>,
) -> Option<Fragment> {
    let link = anchor.and_then(|sel| {
        p.select(sel)
            .find_map(|a| non_empty_attr(&a, "href").map(|href| (a, href)))
    });
    if let Some((a, href)) = link {
        return Some(Fragment::link(ctx.resolve_url(href), element_text(&a)));
    }

    let text = element_text(&p);
    if text.is_empty() {
        return None;
    }
    let is_bold = bold.is_some_and(|sel| p.select(sel).next().is_some());
    if is_bold {
        Some(Fragment::emphasis(text, EmphasisStyle::Bold))
    } else {
        Some(Fragment::text(text))
    }
}

impl BlockParser for ColumnsParser {
    fn kind(&self) -> BlockKind {
        BlockKind::Columns
    }

    fn parse(&self, element: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Block {
        let cells: Vec<Cell> = self
            .columns(element, ctx)
            .into_iter()
            .map(|column| Cell::new(self.column_fragments(column, ctx)))
            .collect();
        tracing::debug!(columns = cells.len(), "columns located");
        Block::from_rows(BlockKind::Columns, vec![Row::new(cells)])
    }
}
