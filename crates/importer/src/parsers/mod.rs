// ABOUTME: Block parser trait and the explicit registry mapping block-kind keys to parsers.
// ABOUTME: Dispatch is a pure lookup; unregistered kinds surface as UnknownBlockKind errors.

//! Block parsers.
//!
//! Each parser turns one matched source subtree into a canonical [`Block`]
//! without touching the subtree. The [`ParserRegistry`] is built once per
//! importer and passed by reference; there is no process-wide registration.

pub mod card;
pub mod columns;
pub mod hero;

use std::collections::HashMap;
use std::fmt;

use scraper::ElementRef;

use crate::error::ImportError;
use crate::extractors::rules::BlockRules;
use crate::extractors::select::ExtractContext;
use crate::model::{Block, BlockKind};

pub use card::CardParser;
pub use columns::ColumnsParser;
pub use hero::HeroParser;

/// Builds one kind of canonical block from a source subtree.
///
/// Implementations never fail: missing content degrades to fewer rows, down to
/// a block with no rows at all.
pub trait BlockParser: Send + Sync {
    fn kind(&self) -> BlockKind;

    fn parse(&self, element: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Block;
}

/// Maps block-kind keys (ASCII case-insensitive) to parsers.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn BlockParser>>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the card, columns and hero parsers configured from `rules`.
    pub fn builtin(rules: &BlockRules) -> Self {
        let mut registry = Self::new();
        registry.register_parser(CardParser::new(rules.card.clone()));
        registry.register_parser(ColumnsParser::new(rules.columns.clone()));
        registry.register_parser(HeroParser::new(rules.hero.clone()));
        registry
    }

    /// Registers `parser` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, parser: Box<dyn BlockParser>) {
        self.parsers.insert(key.into().to_ascii_lowercase(), parser);
    }

    /// Registers `parser` under its own kind key.
    pub fn register_parser<P: BlockParser + 'static>(&mut self, parser: P) {
        self.register(parser.kind().key(), Box::new(parser));
    }

    /// Looks up the parser for `key`.
    pub fn get(&self, key: &str) -> Option<&dyn BlockParser> {
        self.parsers
            .get(&key.trim().to_ascii_lowercase())
            .map(|p| &**p)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Runs the parser registered for `key` on `element`.
    pub fn dispatch(
        &self,
        key: &str,
        element: ElementRef<'_>,
        ctx: &ExtractContext<'_>,
    ) -> Result<Block, ImportError> {
        let parser = self
            .get(key)
            .ok_or_else(|| ImportError::unknown_block_kind(key, "dispatch"))?;
        Ok(parser.parse(element, ctx))
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
