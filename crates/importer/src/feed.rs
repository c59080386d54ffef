// ABOUTME: Builds Card blocks from an already-fetched JSON feed of people or articles.
// ABOUTME: Accepts either a `{ "data": [...] }` envelope or a bare array of entries.

use serde::Deserialize;

use crate::error::ImportError;
use crate::extractors::select::ExtractContext;
use crate::model::{Block, BlockKind, Fragment, Row};
use crate::parsers::card::cta_label;

/// One feed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Envelope { data: Vec<FeedEntry> },
    Bare(Vec<FeedEntry>),
}

/// Parses the entries of a feed document.
pub fn parse_feed(json: &str) -> Result<Vec<FeedEntry>, ImportError> {
    let doc: FeedDocument = serde_json::from_str(json)
        .map_err(|e| ImportError::config("feed", "parse feed", Some(e.into())))?;
    Ok(match doc {
        FeedDocument::Envelope { data } => data,
        FeedDocument::Bare(entries) => entries,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the card for one entry: image row, then heading, description and a `Meet` link.
pub fn card_from_entry(entry: &FeedEntry, ctx: &ExtractContext<'_>) -> Block {
    let title = non_empty(&entry.title);
    let mut rows = Vec::with_capacity(2);

    if let Some(image) = non_empty(&entry.image) {
        rows.push(Row::single(vec![Fragment::image(
            ctx.resolve_url(image),
            title.unwrap_or_default(),
        )]));
    }

    let mut content = Vec::new();
    if let Some(title) = title {
        content.push(Fragment::heading(title, 3));
    }
    if let Some(description) = non_empty(&entry.description) {
        content.push(Fragment::text(description));
    }
    if let Some(path) = non_empty(&entry.path) {
        let href = ctx.resolve_url(path);
        let label = cta_label(title, "", path);
        content.push(Fragment::link(href, label));
    }
    rows.push(Row::single(content));

    Block::from_rows(BlockKind::Card, rows)
}

/// Builds one Card block per feed entry, in feed order.
///
/// ```
/// use block_importer::feed::cards_from_feed;
/// use block_importer::extractors::select::ExtractContext;
///
/// let json = r#"{"data":[{"title":"Dr. Jane Lee","path":"/surgeons/jane-lee"}]}"#;
/// let cards = cards_from_feed(json, &ExtractContext::default()).unwrap();
/// assert_eq!(cards.len(), 1);
/// ```
pub fn cards_from_feed(json: &str, ctx: &ExtractContext<'_>) -> Result<Vec<Block>, ImportError> {
    let entries = parse_feed(json)?;
    tracing::debug!(entries = entries.len(), "feed parsed");
    Ok(entries.iter().map(|e| card_from_entry(e, ctx)).collect())
}
