// ABOUTME: Library-level integration tests for the block importer.
// ABOUTME: Covers a golden homepage fixture, round-trip stability and caller-supplied parsers and rules.

use block_importer::extractors::select::resolve_fragments;
use block_importer::{
    load_builtin_rules, Block, BlockKind, BlockParser, EmptyBlockPolicy, ErrorCode,
    ExtractContext, Fragment, ImportResult, Importer, OutputFormat, ParserRegistry, Role,
    RoleCascade, Row,
};
use pretty_assertions::assert_eq;
use scraper::ElementRef;
use std::fs;
use url::Url;

fn load_html_fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures/html/{}.html",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read HTML fixture: {}", path))
}

fn load_expected_blocks(name: &str) -> serde_json::Value {
    let path = format!("{}/tests/fixtures/{}.json", env!("CARGO_MANIFEST_DIR"), name);
    let content =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {}", path));
    serde_json::from_str(&content).unwrap_or_else(|_| panic!("Failed to parse fixture: {}", path))
}

fn import_homepage() -> ImportResult {
    Importer::builder()
        .base_url(Url::parse("https://www.stryker.com/").unwrap())
        .build()
        .unwrap()
        .import_html(&load_html_fixture("homepage"))
        .unwrap()
}

#[test]
fn golden_homepage_blocks() {
    let result = import_homepage();
    let actual = serde_json::to_value(&result.blocks).unwrap();
    assert_eq!(actual, load_expected_blocks("homepage"));
    assert!(result.issues.is_empty());
    assert_eq!(result.skipped_empty, 0);
}

#[test]
fn golden_homepage_document() {
    let result = import_homepage();
    let html = &result.html;

    assert_eq!(html.matches("<table>").count(), 5);
    assert!(html.contains("<title>Stryker | Medical technology</title>"));
    assert!(html.contains(r#"<th colspan="2">Columns</th>"#));

    for chrome in ["g-megamenu", "search-bar", "slick-arrow", "g-footer", "Copyright"] {
        assert!(!html.contains(chrome), "{} should be removed", chrome);
    }
    for residue in ["<noscript", "<link", "data-track", "data-component", "onclick"] {
        assert!(!html.contains(residue), "{} should be removed", residue);
    }
    for marker in ["carouselslide", "xf-master-building-block", "cols2", "class=\"item\""] {
        assert!(!html.contains(marker), "{} should be replaced", marker);
    }
    assert!(html.contains("class=\"carousel\""));
    assert!(html.contains("class=\"c-latestnews\""));
}

#[test]
fn reimporting_canonical_output_is_a_no_op() {
    let first = import_homepage();
    let second = Importer::builder()
        .build()
        .unwrap()
        .import_html(&first.html)
        .unwrap();
    assert!(second.blocks.is_empty());
    assert!(second.issues.is_empty());
    assert_eq!(second.html, first.html);
}

#[test]
fn markdown_and_json_outputs() {
    let result = import_homepage();

    let md = result.render(OutputFormat::Markdown).unwrap();
    assert!(md.contains("Meet Jane"), "got: {}", md);
    assert!(!md.contains("<body>"), "got: {}", md);

    let json: serde_json::Value =
        serde_json::from_str(&result.render(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["blocks"].as_array().unwrap().len(), 5);
    assert_eq!(json["blocks"][4]["kind"], "columns");
}

#[test]
fn skip_policy_keeps_empty_sources() {
    let html = r#"<div class="c-latestnews"><div class="item"><p class="model"> </p></div></div>
        <div class="carouselslide"><img src="/bg.jpg"></div>"#;

    let placeholder = Importer::builder().build().unwrap().import_html(html).unwrap();
    assert_eq!(placeholder.blocks.len(), 2);
    assert_eq!(placeholder.skipped_empty, 0);

    let skip = Importer::builder()
        .empty_blocks(EmptyBlockPolicy::Skip)
        .build()
        .unwrap()
        .import_html(html)
        .unwrap();
    assert_eq!(skip.blocks.len(), 1);
    assert_eq!(skip.blocks[0].kind(), BlockKind::Hero);
    assert_eq!(skip.skipped_empty, 1);
    assert!(skip.html.contains(r#"<div class="item">"#));
}

/// Parses `.quote` panels into a single-cell Card.
struct QuoteParser;

impl BlockParser for QuoteParser {
    fn kind(&self) -> BlockKind {
        BlockKind::Card
    }

    fn parse(&self, element: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Block {
        let text = resolve_fragments(Role::Description, &RoleCascade::css(["blockquote"]), element, ctx);
        Block::from_rows(BlockKind::Card, vec![Row::single(text)])
    }
}

#[test]
fn custom_registry_and_rules() {
    let mut rules = load_builtin_rules().unwrap();
    rules.signatures = serde_json::from_str(
        r#"[{"kind":"quote","selector":".quote"},{"kind":"tabs","selector":".tabs"}]"#,
    )
    .unwrap();

    let mut registry = ParserRegistry::new();
    registry.register("quote", Box::new(QuoteParser));

    let result = Importer::builder()
        .rules(rules)
        .registry(registry)
        .build()
        .unwrap()
        .import_html(
            r#"<div class="quote"><blockquote> Better care. </blockquote></div><div class="tabs"><p>Tab</p></div>"#,
        )
        .unwrap();

    assert_eq!(result.blocks.len(), 1);
    assert_eq!(
        result.blocks[0].rows()[0].cells()[0].fragments(),
        &[Fragment::text("Better care.")]
    );
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].code, ErrorCode::UnknownBlockKind);
    assert!(result.issues[0].message.contains("tabs"));
}

#[test]
fn import_file_decodes_legacy_charset() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("legacy.html");
    let mut bytes = b"<html><head><meta charset=\"windows-1252\"></head><body><div class=\"fullbleedpanel\"><h1>Caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"</h1></div></body></html>");
    fs::write(&path, bytes).unwrap();

    let result = Importer::builder().build().unwrap().import_file(&path).unwrap();
    assert_eq!(
        result.blocks[0].rows()[0].cells()[0].fragments(),
        &[Fragment::heading("Café", 1)]
    );
}
