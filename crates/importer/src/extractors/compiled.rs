// ABOUTME: Pre-compiled CSS selector cache shared by the resolver, cleaners and importer.
// ABOUTME: Eliminates repeated parsing of the static selector tables in hot paths.

//! Selector caching for efficient repeated DOM queries.
//!
//! The matcher tables are evaluated once per matched subtree, so the same few
//! dozen selectors are parsed over and over. This module compiles each selector
//! text once and hands out clones of the compiled form.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Thread-safe cache of compiled CSS selectors. Invalid selectors are cached as `None`.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    if compiled.is_none() {
        tracing::warn!(selector = css, "ignoring invalid selector");
    }

    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    // Another thread may have inserted while we were compiling
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Precompiles a batch of selectors into the cache.
///
/// Returns the selectors that failed to compile.
pub fn precompile_selectors<I, S>(selectors: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut invalid = Vec::new();
    for css in selectors {
        let css = css.as_ref();
        if css.is_empty() {
            continue;
        }
        if get_or_compile(css).is_none() {
            invalid.push(css.to_string());
        }
    }
    invalid
}
