// ABOUTME: Canonical block model: BlockKind, Block, Row, Cell and the typed content Fragment variants.
// ABOUTME: Blocks are assembled once from rows and never carry empty rows or empty cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// The fixed set of canonical block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Card,
    Columns,
    Hero,
}

impl BlockKind {
    /// Registry key for this kind, e.g. `"card"`.
    pub fn key(&self) -> &'static str {
        match self {
            BlockKind::Card => "card",
            BlockKind::Columns => "columns",
            BlockKind::Hero => "hero",
        }
    }

    /// Display name used in the block header row, e.g. `"Card"`.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Card => "Card",
            BlockKind::Columns => "Columns",
            BlockKind::Hero => "Hero",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BlockKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(BlockKind::Card),
            "columns" => Ok(BlockKind::Columns),
            "hero" => Ok(BlockKind::Hero),
            _ => Err(ImportError::unknown_block_kind(s, "parse block kind")),
        }
    }
}

/// Style of an emphasized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisStyle {
    Italic,
    Bold,
}

/// Minimal typed content unit. Source formatting beyond these tags is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fragment {
    Image { src: String, alt: String },
    Heading { text: String, level: u8 },
    Text { text: String },
    Emphasis { text: String, style: EmphasisStyle },
    Link { href: String, text: String },
}

impl Fragment {
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Fragment::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Fragment::Heading {
            text: text.into(),
            level: level.clamp(1, 6),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text { text: text.into() }
    }

    pub fn emphasis(text: impl Into<String>, style: EmphasisStyle) -> Self {
        Fragment::Emphasis {
            text: text.into(),
            style,
        }
    }

    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Fragment::Link {
            href: href.into(),
            text: text.into(),
        }
    }

    /// Visible text of the fragment (alt text for images).
    pub fn plain_text(&self) -> &str {
        match self {
            Fragment::Image { alt, .. } => alt,
            Fragment::Heading { text, .. }
            | Fragment::Text { text }
            | Fragment::Emphasis { text, .. }
            | Fragment::Link { text, .. } => text,
        }
    }
}

/// An ordered sequence of fragments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell {
    fragments: Vec<Fragment>,
}

impl Cell {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl From<Vec<Fragment>> for Cell {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self::new(fragments)
    }
}

/// An ordered sequence of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// A row holding exactly one cell.
    pub fn single(cell: impl Into<Cell>) -> Self {
        Self {
            cells: vec![cell.into()],
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A canonical block: a kind plus an ordered grid of rows and cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    kind: BlockKind,
    rows: Vec<Row>,
}

impl Block {
    /// Assembles a block, dropping empty cells and then empty rows.
    ///
    /// Relative order of everything that survives is preserved.
    pub fn from_rows(kind: BlockKind, rows: Vec<Row>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| Row::new(row.cells.into_iter().filter(|c| !c.is_empty()).collect()))
            .filter(|row| !row.is_empty())
            .collect();
        Self { kind, rows }
    }

    /// A block with no rows.
    pub fn empty(kind: BlockKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}
