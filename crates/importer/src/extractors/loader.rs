// ABOUTME: Loader for the built-in extraction tables embedded as JSON.
// ABOUTME: Provides load_builtin_rules() and file loading for caller-supplied tables.

//! Extraction table loader.
//!
//! The built-in tables describe the legacy templates of the site being
//! migrated. Other sites ship their own JSON and load it with [`load_rules_file`].

use std::fs;
use std::path::Path;

use crate::error::ImportError;
use crate::extractors::compiled::precompile_selectors;
use crate::extractors::rules::BlockRules;

/// Embedded JSON containing the built-in matcher tables.
const BUILTIN_RULES_JSON: &str = include_str!("../../data/block_rules.json");

/// Loads the built-in tables and warms the selector cache with them.
pub fn load_builtin_rules() -> Result<BlockRules, ImportError> {
    let rules = BlockRules::from_json(BUILTIN_RULES_JSON)?;
    warm(&rules);
    Ok(rules)
}

/// Loads tables from a JSON file.
pub fn load_rules_file(path: &Path) -> Result<BlockRules, ImportError> {
    let json = fs::read_to_string(path).map_err(|e| {
        ImportError::io(path.display().to_string(), "read rules", Some(e.into()))
    })?;
    let rules = BlockRules::from_json(&json).map_err(|mut e| {
        e.subject = path.display().to_string();
        e
    })?;
    warm(&rules);
    Ok(rules)
}

fn warm(rules: &BlockRules) {
    let invalid = precompile_selectors(rules.selectors());
    if !invalid.is_empty() {
        tracing::warn!(?invalid, "extraction tables contain invalid selectors");
    }
}
