// ABOUTME: Card block parser: image row followed by one content cell of title, subtitle, description and CTA.
// ABOUTME: Handles news teasers and image+rich-text panels; derives person CTA labels from the title.

use scraper::ElementRef;

use super::BlockParser;
use crate::extractors::rules::CardRules;
use crate::extractors::select::{resolve, resolve_fragments, ExtractContext, Role, RoleMatch};
use crate::model::{Block, BlockKind, Fragment, Row};

const HONORIFICS: &[&str] = &["dr", "mr", "mrs", "ms", "miss", "mx", "prof"];

/// Parses card-like teasers.
///
/// Layout:
/// - row 1: the image alone, when one resolves;
/// - next row: a single cell with title, subtitle (only alongside a distinct
///   title), description and CTA, in that order.
#[derive(Debug, Clone, Default)]
pub struct CardParser {
    rules: CardRules,
}

impl CardParser {
    pub fn new(rules: CardRules) -> Self {
        Self { rules }
    }
}

impl BlockParser for CardParser {
    fn kind(&self) -> BlockKind {
        BlockKind::Card
    }

    fn parse(&self, element: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Block {
        let mut rows = Vec::new();

        if let Some(image) = resolve(Role::Image, &self.rules.image, element, ctx) {
            rows.push(Row::single(image.into_fragments()));
        }

        let mut content = Vec::new();
        let title = resolve(Role::Title, &self.rules.title, element, ctx);
        if let Some(title) = &title {
            content.extend(title.fragments.iter().cloned());
            if let Some(subtitle) = resolve(Role::Subtitle, &self.rules.subtitle, element, ctx) {
                if is_distinct(title, &subtitle) {
                    content.extend(subtitle.into_fragments());
                }
            }
        }

        content.extend(resolve_fragments(
            Role::Description,
            &self.rules.description,
            element,
            ctx,
        ));

        if let Some(cta) = resolve(Role::Cta, &self.rules.cta, element, ctx) {
            let title_text = title.as_ref().map(RoleMatch::text);
            content.extend(cta.into_fragments().into_iter().map(|fragment| match fragment {
                Fragment::Link { href, text } => {
                    let label = cta_label(title_text, &text, &href);
                    Fragment::link(href, label)
                }
                other => other,
            }));
        }

        rows.push(Row::single(content));
        Block::from_rows(BlockKind::Card, rows)
    }
}

fn is_distinct(title: &RoleMatch<'_>, subtitle: &RoleMatch<'_>) -> bool {
    let same_node = title.first_node().map(|n| n.id()) == subtitle.first_node().map(|n| n.id());
    !same_node && title.text() != subtitle.text()
}

fn is_honorific(word: &str) -> bool {
    let word = word.trim_end_matches('.').to_ascii_lowercase();
    HONORIFICS.contains(&word.as_str())
}

/// `Meet <first name>` for a display name, skipping leading honorifics.
///
/// ```
/// use block_importer::parsers::card::meet_label;
/// assert_eq!(meet_label("Dr. Jane Lee").as_deref(), Some("Meet Jane"));
/// assert_eq!(meet_label("  "), None);
/// ```
pub fn meet_label(name: &str) -> Option<String> {
    let first = name.split_whitespace().find(|w| !is_honorific(w))?;
    let first = first.trim_end_matches(',');
    if first.is_empty() {
        None
    } else {
        Some(format!("Meet {}", first))
    }
}

/// Label for a card CTA.
///
/// Person titles (leading honorific) always produce `Meet <first name>`;
/// otherwise the anchor text is kept, then the title's first word, then the href.
pub(crate) fn cta_label(title: Option<&str>, anchor_text: &str, href: &str) -> String {
    let person = title
        .filter(|t| t.split_whitespace().next().is_some_and(is_honorific))
        .and_then(meet_label);
    if let Some(label) = person {
        return label;
    }
    if !anchor_text.is_empty() {
        return anchor_text.to_string();
    }
    title
        .and_then(meet_label)
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::loader::load_builtin_rules;
    use crate::model::{Cell, EmphasisStyle};
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn parse(html: &str) -> Block {
        let parser = CardParser::new(load_builtin_rules().unwrap().card);
        let doc = Html::parse_fragment(html);
        let root = doc.root_element().child_elements().next().unwrap();
        parser.parse(root, &ExtractContext::default())
    }

    fn cells(block: &Block) -> Vec<Vec<Fragment>> {
        block
            .rows()
            .iter()
            .flat_map(|r| r.cells().iter().map(|c: &Cell| c.fragments().to_vec()))
            .collect()
    }

    #[test]
    fn surgeon_card_derives_meet_label() {
        let block = parse(
            r#"<div class="item">
                <img src="/img/jane-lee.jpg" alt="Jane Lee">
                <h3>Dr. Jane Lee</h3>
                <a href="/surgeons/jane-lee">View profile</a>
            </div>"#,
        );
        assert_eq!(block.rows().len(), 2);
        assert_eq!(block.rows()[0].cells().len(), 1);
        assert_eq!(block.rows()[1].cells().len(), 1);
        assert_eq!(
            cells(&block),
            vec![
                vec![Fragment::image("/img/jane-lee.jpg", "Jane Lee")],
                vec![
                    Fragment::heading("Dr. Jane Lee", 3),
                    Fragment::link("/surgeons/jane-lee", "Meet Jane"),
                ],
            ]
        );
    }

    #[test]
    fn news_card_keeps_anchor_text() {
        let block = parse(
            r#"<div class="item">
                <img class="img-responsive" src="/news/mako.jpg" alt="Mako">
                <div class="m-c-subheading-description"><h3>Mako turns ten</h3></div>
                <p class="model"></p>
                <p class="description">  A decade of robotic-arm assisted surgery. </p>
                <a class="news-link action-link" href="/news/mako-ten">Read More</a>
            </div>"#,
        );
        assert_eq!(
            cells(&block),
            vec![
                vec![Fragment::image("/news/mako.jpg", "Mako")],
                vec![
                    Fragment::heading("Mako turns ten", 3),
                    Fragment::text("A decade of robotic-arm assisted surgery."),
                    Fragment::link("/news/mako-ten", "Read More"),
                ],
            ]
        );
    }

    #[test]
    fn focus_card_with_subtitle_and_rich_text() {
        let block = parse(
            r#"<div class="xf-master-building-block">
                <div class="standaloneimage">
                    <a href="/focus/ortho"><img class="img-responsive" src="/focus/ortho.jpg" alt="Ortho"></a>
                </div>
                <div class="text parbase"><div class="c-rich-text-editor"><div class="has-background">
                    <p><span class="futura-bold">Orthopaedics</span><span class="urw-egyptienne">Joint replacement</span></p>
                    <p>Implants and robotics for hips and knees.</p>
                    <p>Trauma and extremities.</p>
                    <p><a href="/focus/ortho"><span class="standalone-link">Learn more</span></a></p>
                </div></div></div>
            </div>"#,
        );
        assert_eq!(
            cells(&block),
            vec![
                vec![Fragment::image("/focus/ortho.jpg", "Ortho")],
                vec![
                    Fragment::heading("Orthopaedics", 3),
                    Fragment::emphasis("Joint replacement", EmphasisStyle::Italic),
                    Fragment::text("Implants and robotics for hips and knees."),
                    Fragment::text("Trauma and extremities."),
                    Fragment::link("/focus/ortho", "Learn more"),
                ],
            ]
        );
    }

    #[test]
    fn description_only_card() {
        let block = parse(r#"<div class="item"><p class="description">Great outcomes.</p></div>"#);
        assert_eq!(block.rows().len(), 1);
        assert_eq!(cells(&block), vec![vec![Fragment::text("Great outcomes.")]]);

        let block = parse(r#"<div class="item"><p>Great outcomes.</p></div>"#);
        assert_eq!(cells(&block), vec![vec![Fragment::text("Great outcomes.")]]);
    }

    #[test]
    fn subtitle_never_standalone() {
        let block = parse(r#"<div><span class="urw-egyptienne">Only a subtitle</span></div>"#);
        assert!(block.is_empty());
    }

    #[test]
    fn subtitle_repeating_title_text_is_dropped() {
        let block = parse(
            r#"<div><h3>Ortho</h3><span class="urw-egyptienne"> Ortho </span><p>Body.</p></div>"#,
        );
        assert_eq!(
            cells(&block),
            vec![vec![Fragment::heading("Ortho", 3), Fragment::text("Body.")]]
        );
    }

    #[test]
    fn subtitle_on_title_node_is_dropped() {
        let block = parse(
            r#"<div><span class="futura-bold urw-egyptienne">Ortho</span><p>Body.</p></div>"#,
        );
        assert_eq!(
            cells(&block),
            vec![vec![Fragment::heading("Ortho", 3), Fragment::text("Body.")]]
        );
    }

    #[test]
    fn empty_subtree_gives_empty_block() {
        let block = parse(r#"<div class="item"><p class="model"> </p></div>"#);
        assert_eq!(block.kind(), BlockKind::Card);
        assert!(block.is_empty());
    }

    #[test]
    fn meet_label_variants() {
        assert_eq!(meet_label("Dr. Jane Lee").as_deref(), Some("Meet Jane"));
        assert_eq!(meet_label("Prof Alan Smith, MD").as_deref(), Some("Meet Alan"));
        assert_eq!(meet_label("Maria Garcia").as_deref(), Some("Meet Maria"));
        assert_eq!(meet_label("Dr."), None);
    }

    #[test]
    fn cta_label_precedence() {
        assert_eq!(cta_label(Some("Dr. Jane Lee"), "Read more", "/x"), "Meet Jane");
        assert_eq!(cta_label(Some("Mako turns ten"), "Read More", "/x"), "Read More");
        assert_eq!(cta_label(Some("Maria Garcia"), "", "/x"), "Meet Maria");
        assert_eq!(cta_label(None, "", "/x"), "/x");
    }
}
