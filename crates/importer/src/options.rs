// ABOUTME: Configuration options for the block importer including OutputFormat, EmptyBlockPolicy and Options.
// ABOUTME: ImporterBuilder provides a fluent API for constructing Importer instances with custom settings.

use std::fmt;

use url::Url;

use crate::extractors::rules::BlockRules;
use crate::importer::Importer;
use crate::parsers::ParserRegistry;

/// The format of the imported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Markdown,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => OutputFormat::Markdown,
            "json" => OutputFormat::Json,
            _ => OutputFormat::Html,
        }
    }
}

/// What to do with a matched subtree whose parser produced a block with no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyBlockPolicy {
    /// Replace the subtree with a block that has only its header row.
    #[default]
    Placeholder,
    /// Leave the source subtree in place and count it as skipped.
    Skip,
}

impl fmt::Display for EmptyBlockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmptyBlockPolicy::Placeholder => "placeholder",
            EmptyBlockPolicy::Skip => "skip",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for EmptyBlockPolicy {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "skip" | "keep" => EmptyBlockPolicy::Skip,
            _ => EmptyBlockPolicy::Placeholder,
        }
    }
}

/// Configuration options for the importer.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Base for resolving relative `src`/`href` values.
    pub base_url: Option<Url>,
    pub empty_blocks: EmptyBlockPolicy,
    pub format: OutputFormat,
    /// Extraction tables; the built-in tables when `None`.
    pub rules: Option<BlockRules>,
}

/// Builder for constructing Importer instances with custom configuration.
#[derive(Debug, Default)]
pub struct ImporterBuilder {
    opts: Options,
    registry: Option<ParserRegistry>,
}

impl ImporterBuilder {
    /// Create a new ImporterBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL used to absolutize image and link references.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.opts.base_url = Some(base_url);
        self
    }

    /// Set the policy for blocks that resolve to no rows.
    pub fn empty_blocks(mut self, policy: EmptyBlockPolicy) -> Self {
        self.opts.empty_blocks = policy;
        self
    }

    /// Set the output format of the imported document.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.opts.format = format;
        self
    }

    /// Use custom extraction tables instead of the built-in ones.
    pub fn rules(mut self, rules: BlockRules) -> Self {
        self.opts.rules = Some(rules);
        self
    }

    /// Use a custom parser registry instead of one built from the rules.
    pub fn registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the Importer with the configured options.
    pub fn build(self) -> Result<Importer, crate::error::ImportError> {
        Importer::with_registry(self.opts, self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_str() {
        assert_eq!(OutputFormat::from("md"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("anything"), OutputFormat::Html);
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn empty_block_policy_defaults_to_placeholder() {
        assert_eq!(EmptyBlockPolicy::default(), EmptyBlockPolicy::Placeholder);
        assert_eq!(EmptyBlockPolicy::from("Skip"), EmptyBlockPolicy::Skip);
        assert_eq!(EmptyBlockPolicy::from("placeholder"), EmptyBlockPolicy::Placeholder);
    }
}
