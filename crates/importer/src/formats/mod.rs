// ABOUTME: Output format converters for imported documents.
// ABOUTME: Renders canonical blocks as table markup and converts document HTML to Markdown.

//! Output format conversion module.
//!
//! A block renders as one `<table>`: a header row naming the block kind, then
//! one `<tr>` per row and one `<td>` per cell. Fragments use the smallest
//! markup that carries their tag. The output contains none of the source
//! class markers, so importing it again matches no block signature.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Block, EmphasisStyle, Fragment};

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?\s*>").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Renders a block as table markup.
pub fn render_block(block: &Block) -> String {
    let mut out = String::from("<table><tbody><tr>");
    let width = block.column_count();
    if width > 1 {
        let _ = write!(out, r#"<th colspan="{}">"#, width);
    } else {
        out.push_str("<th>");
    }
    out.push_str(block.kind().name());
    out.push_str("</th></tr>");

    for row in block.rows() {
        out.push_str("<tr>");
        for cell in row.cells() {
            out.push_str("<td>");
            for fragment in cell.fragments() {
                render_fragment(&mut out, fragment);
            }
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// Renders a sequence of blocks back to back.
pub fn render_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> String {
    blocks.into_iter().map(render_block).collect()
}

fn render_fragment(out: &mut String, fragment: &Fragment) {
    match fragment {
        Fragment::Image { src, alt } => {
            let _ = write!(
                out,
                r#"<p><img src="{}" alt="{}"></p>"#,
                encode_double_quoted_attribute(src),
                encode_double_quoted_attribute(alt)
            );
        }
        Fragment::Heading { text, level } => {
            let _ = write!(out, "<h{level}>{}</h{level}>", encode_text(text));
        }
        Fragment::Text { text } => {
            let _ = write!(out, "<p>{}</p>", encode_text(text));
        }
        Fragment::Emphasis { text, style } => {
            let tag = match style {
                EmphasisStyle::Italic => "em",
                EmphasisStyle::Bold => "strong",
            };
            let _ = write!(out, "<p><{tag}>{}</{tag}></p>", encode_text(text));
        }
        Fragment::Link { href, text } => {
            let _ = write!(
                out,
                r#"<p><a href="{}">{}</a></p>"#,
                encode_double_quoted_attribute(href),
                encode_text(text)
            );
        }
    }
}

/// Preprocess HTML before conversion: replace <br> tags with newlines.
fn preprocess_br_tags(html: &str) -> String {
    BR_RE.replace_all(html, "\n").to_string()
}

/// Collapse more than 2 consecutive blank lines to exactly 2.
fn collapse_blank_lines_to_two(text: &str) -> String {
    BLANK_LINES_RE.replace_all(text, "\n\n").to_string()
}

/// Convert HTML to Markdown using htmd.
///
/// Skips script and style tags during conversion, preserves links and images,
/// and normalizes consecutive blank lines to max 2.
/// On conversion error, returns the preprocessed HTML unchanged.
pub fn html_to_markdown(html: &str) -> String {
    let preprocessed = preprocess_br_tags(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript"])
        .build();

    let md = converter
        .convert(&preprocessed)
        .unwrap_or_else(|_| preprocessed.clone());

    collapse_blank_lines_to_two(&md)
}
