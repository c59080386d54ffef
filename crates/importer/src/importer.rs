// ABOUTME: The Importer orchestrates cleanup, signature matching, block parsing and substitution for one document.
// ABOUTME: Provides import_html(), import_file() and import_feed() returning an ImportResult.

use std::collections::HashSet;
use std::path::Path;

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};

use crate::dom::cleaners::clean_html;
use crate::dom::serialize::{serialize_document, SerializeFilter};
use crate::error::{ImportError, Issue};
use crate::extractors::compiled::get_or_compile;
use crate::extractors::loader::load_builtin_rules;
use crate::extractors::rules::{BlockRules, Signature};
use crate::extractors::select::ExtractContext;
use crate::feed::cards_from_feed;
use crate::formats::{render_block, render_blocks};
use crate::options::{EmptyBlockPolicy, ImporterBuilder, Options};
use crate::parsers::ParserRegistry;
use crate::resource::read_html_file;
use crate::result::ImportResult;

/// Converts legacy page markup into canonical block tables.
#[derive(Debug)]
pub struct Importer {
    opts: Options,
    rules: BlockRules,
    registry: ParserRegistry,
}

/// Mutable bookkeeping for one import pass.
#[derive(Default)]
struct Pass {
    blocks: Vec<crate::model::Block>,
    issues: Vec<Issue>,
    skipped_empty: usize,
}

impl Pass {
    fn report(&mut self, err: &ImportError) {
        tracing::warn!(code = %err.code, subject = %err.subject, "{}", err);
        self.issues.push(Issue::from(err));
    }
}

impl Importer {
    /// Create a new ImporterBuilder for configuring the importer.
    pub fn builder() -> ImporterBuilder {
        ImporterBuilder::new()
    }

    /// Create an Importer with the given options and the built-in parsers.
    pub fn new(opts: Options) -> Result<Self, ImportError> {
        Self::with_registry(opts, None)
    }

    pub(crate) fn with_registry(
        opts: Options,
        registry: Option<ParserRegistry>,
    ) -> Result<Self, ImportError> {
        let rules = match &opts.rules {
            Some(rules) => rules.clone(),
            None => load_builtin_rules()?,
        };
        let registry = registry.unwrap_or_else(|| ParserRegistry::builtin(&rules));
        tracing::debug!(parsers = ?registry.keys(), signatures = rules.signatures.len(), "importer ready");
        Ok(Self {
            opts,
            rules,
            registry,
        })
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn rules(&self) -> &BlockRules {
        &self.rules
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    fn context(&self) -> ExtractContext<'_> {
        ExtractContext::new(self.opts.base_url.as_ref())
    }

    /// Import one HTML document.
    ///
    /// Runs the pre-extraction cleanup, one substitution pass per signature in
    /// table order, then the post-extraction cleanup. Unknown block kinds and
    /// signatures that do not compile are recorded as issues; the affected
    /// subtrees are left untouched.
    pub fn import_html(&self, html: &str) -> Result<ImportResult, ImportError> {
        let mut pass = Pass::default();
        let mut current = clean_html(html, &self.rules.cleanup.before);

        for signature in &self.rules.signatures {
            if let Some(next) = self.apply_signature(&current, signature, &mut pass) {
                current = next;
            }
        }

        let html = clean_html(&current, &self.rules.cleanup.after);
        tracing::info!(
            blocks = pass.blocks.len(),
            issues = pass.issues.len(),
            skipped_empty = pass.skipped_empty,
            "import finished"
        );
        Ok(ImportResult {
            html,
            blocks: pass.blocks,
            issues: pass.issues,
            skipped_empty: pass.skipped_empty,
        })
    }

    /// Read, decode and import an HTML file.
    pub fn import_file(&self, path: &Path) -> Result<ImportResult, ImportError> {
        let html = read_html_file(path)?;
        self.import_html(&html)
    }

    /// Build a document of Card blocks from a JSON feed.
    pub fn import_feed(&self, json: &str) -> Result<ImportResult, ImportError> {
        let blocks = cards_from_feed(json, &self.context())?;
        let html = format!("<html><head></head><body>{}</body></html>", render_blocks(&blocks));
        let html = clean_html(&html, &self.rules.cleanup.after);
        tracing::info!(blocks = blocks.len(), "feed imported");
        Ok(ImportResult {
            html,
            blocks,
            ..Default::default()
        })
    }

    /// Replaces every outermost match of `signature` in `html`.
    ///
    /// All matches are parsed from the same snapshot and substituted in one
    /// re-serialization. Returns `None` when the document is unchanged.
    fn apply_signature(&self, html: &str, signature: &Signature, pass: &mut Pass) -> Option<String> {
        let Some(selector) = get_or_compile(&signature.selector) else {
            pass.report(&ImportError::invalid_selector(
                &signature.selector,
                "compile signature",
            ));
            return None;
        };

        let doc = Html::parse_document(html);
        let matches = outermost(doc.select(&selector).collect());
        if matches.is_empty() {
            tracing::trace!(selector = %signature.selector, "signature not present");
            return None;
        }

        let ctx = self.context();
        let mut filter = SerializeFilter::default();
        for element in matches {
            let block = match self.registry.dispatch(&signature.kind, element, &ctx) {
                Ok(block) => block,
                Err(err) => {
                    pass.report(&err);
                    break;
                }
            };

            if block.is_empty() && self.opts.empty_blocks == EmptyBlockPolicy::Skip {
                tracing::debug!(kind = %block.kind(), "empty block left in place");
                pass.skipped_empty += 1;
                continue;
            }

            tracing::debug!(
                kind = %block.kind(),
                rows = block.rows().len(),
                selector = %signature.selector,
                "block emitted"
            );
            filter.substitutions.insert(element.id(), render_block(&block));
            pass.blocks.push(block);
        }

        if filter.is_noop() {
            None
        } else {
            Some(serialize_document(&doc, &filter))
        }
    }
}

/// Drops matches nested inside another match.
fn outermost(matches: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let ids: HashSet<NodeId> = matches.iter().map(|el| el.id()).collect();
    matches
        .into_iter()
        .filter(|el| {
            let node: NodeRef<'_, Node> = **el;
            !node.ancestors().any(|a| ids.contains(&a.id()))
        })
        .collect()
}
