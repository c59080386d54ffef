// ABOUTME: Main library entry point for the block importer.
// ABOUTME: Re-exports the public API: Importer, ImporterBuilder, ImportResult, ImportError, the block model and parsers.

//! Block importer - normalizes legacy page markup into canonical blocks.
//!
//! Matched source subtrees (news teasers, image+text panels, column layouts,
//! carousel slides) are parsed into [`Block`] values, a grid of rows and cells
//! holding typed [`Fragment`]s, and replaced in the document by table markup.
//!
//! # Example
//!
//! ```
//! use block_importer::{BlockKind, Importer, ImportError};
//!
//! fn main() -> Result<(), ImportError> {
//!     let importer = Importer::builder().build()?;
//!     let result = importer.import_html(
//!         r#"<div class="fullbleedpanel"><h1>Advancing surgery</h1></div>"#,
//!     )?;
//!     assert_eq!(result.blocks[0].kind(), BlockKind::Hero);
//!     println!("{}", result.format_markdown());
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extractors;
pub mod feed;
pub mod formats;
pub mod importer;
pub mod model;
pub mod options;
pub mod parsers;
pub mod resource;
pub mod result;

pub use crate::error::{ErrorCode, ImportError, Issue};
pub use crate::extractors::loader::{load_builtin_rules, load_rules_file};
pub use crate::extractors::rules::{BlockRules, MatcherSpec, RoleCascade};
pub use crate::extractors::select::{resolve, ExtractContext, Role, RoleMatch};
pub use crate::importer::Importer;
pub use crate::model::{Block, BlockKind, Cell, EmphasisStyle, Fragment, Row};
pub use crate::options::{EmptyBlockPolicy, ImporterBuilder, Options, OutputFormat};
pub use crate::parsers::{BlockParser, CardParser, ColumnsParser, HeroParser, ParserRegistry};
pub use crate::result::ImportResult;
