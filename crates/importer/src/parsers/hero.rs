// ABOUTME: Hero block parser: background image row followed by heading, description and CTAs.

use scraper::ElementRef;

use super::BlockParser;
use crate::extractors::rules::HeroRules;
use crate::extractors::select::{resolve, resolve_fragments, ExtractContext, Role};
use crate::model::{Block, BlockKind, Row};

/// Parses carousel slides and full-bleed panels.
#[derive(Debug, Clone, Default)]
pub struct HeroParser {
    rules: HeroRules,
}

impl HeroParser {
    pub fn new(rules: HeroRules) -> Self {
        Self { rules }
    }
}

impl BlockParser for HeroParser {
    fn kind(&self) -> BlockKind {
        BlockKind::Hero
    }

    fn parse(&self, element: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Block {
        let mut rows = Vec::with_capacity(2);
        if let Some(image) = resolve(Role::Image, &self.rules.image, element, ctx) {
            rows.push(Row::single(image.into_fragments()));
        }

        let mut content = resolve_fragments(Role::Heading, &self.rules.heading, element, ctx);
        content.extend(resolve_fragments(Role::Description, &self.rules.description, element, ctx));
        content.extend(resolve_fragments(Role::Cta, &self.rules.cta, element, ctx));
        rows.push(Row::single(content));

        Block::from_rows(BlockKind::Hero, rows)
    }
}
