// ABOUTME: ImportResult struct holding the rewritten document and the canonical blocks emitted by an import.
// ABOUTME: Includes formatting helpers for HTML, Markdown and JSON output.

use serde::{Deserialize, Serialize};

use crate::error::Issue;
use crate::formats::html_to_markdown;
use crate::model::{Block, BlockKind};
use crate::options::OutputFormat;

/// The result of importing one document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportResult {
    /// Rewritten document with every matched subtree replaced by its block table.
    pub html: String,
    /// Emitted blocks in the order they were substituted.
    pub blocks: Vec<Block>,
    /// Non-fatal problems: unknown block kinds, signatures that do not compile.
    pub issues: Vec<Issue>,
    /// Matched subtrees left in place because their block had no rows.
    pub skipped_empty: usize,
}

impl ImportResult {
    /// Inner HTML of `<body>`, or the whole document when there is none.
    pub fn body_html(&self) -> String {
        let doc = scraper::Html::parse_document(&self.html);
        match scraper::Selector::parse("body") {
            Ok(selector) => doc
                .select(&selector)
                .next()
                .map(|body| body.inner_html())
                .unwrap_or_else(|| self.html.clone()),
            Err(_) => self.html.clone(),
        }
    }

    /// Format the document body as Markdown.
    pub fn format_markdown(&self) -> String {
        html_to_markdown(&self.body_html()).trim().to_string()
    }

    /// Render the result in the requested output format.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Html => Ok(self.html.clone()),
            OutputFormat::Markdown => Ok(self.format_markdown()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    /// Returns true if no block was emitted.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns true if any issue was recorded.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Number of emitted blocks of the given kind.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|b| b.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ImportError};
    use crate::model::{Fragment, Row};
    use pretty_assertions::assert_eq;

    fn sample() -> ImportResult {
        ImportResult {
            html: "<html><head></head><body><table><tbody><tr><th>Card</th></tr><tr><td><h3>Title</h3></td></tr></tbody></table></body></html>".to_string(),
            blocks: vec![Block::from_rows(
                BlockKind::Card,
                vec![Row::single(vec![Fragment::heading("Title", 3)])],
            )],
            issues: Vec::new(),
            skipped_empty: 0,
        }
    }

    #[test]
    fn test_body_html() {
        assert!(sample().body_html().starts_with("<table>"));
        let bare = ImportResult::default();
        assert_eq!(bare.body_html(), "");
    }

    #[test]
    fn test_format_markdown() {
        let md = sample().format_markdown();
        assert!(md.contains("Title"), "got: {}", md);
        assert!(!md.contains("<body>"), "got: {}", md);
    }

    #[test]
    fn test_render_json() {
        let json = sample().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["blocks"][0]["kind"], "card");
        assert_eq!(value["blocks"][0]["rows"][0][0][0]["type"], "heading");
        assert_eq!(value["blocks"][0]["rows"][0][0][0]["level"], 3);
        assert_eq!(value["skipped_empty"], 0);
    }

    #[test]
    fn test_render_html_is_document() {
        let result = sample();
        assert_eq!(result.render(OutputFormat::Html).unwrap(), result.html);
    }

    #[test]
    fn test_counts_and_issues() {
        let mut result = sample();
        assert!(!result.is_empty());
        assert_eq!(result.count(BlockKind::Card), 1);
        assert_eq!(result.count(BlockKind::Hero), 0);
        assert!(!result.has_issues());

        result
            .issues
            .push(Issue::from(&ImportError::unknown_block_kind("tabs", "dispatch")));
        assert!(result.has_issues());
        assert_eq!(result.issues[0].code, ErrorCode::UnknownBlockKind);
    }
}
