// ABOUTME: Extraction tables and the selector cascade resolver that evaluates them.
// ABOUTME: Covers table types, JSON loading, the compiled-selector cache and role resolution.

//! Extraction module.
//!
//! Submodules:
//! - `rules`: matcher tables per block kind, signatures and cleanup passes.
//! - `loader`: built-in tables embedded as JSON, and file loading.
//! - `compiled`: process-wide cache of compiled selectors.
//! - `select`: role resolution against a subtree.

pub mod compiled;
pub mod loader;
pub mod rules;
pub mod select;
