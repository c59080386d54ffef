// ABOUTME: Serde data model for matcher tables, block signatures and cleanup denylists.
// ABOUTME: Defines MatcherSpec cascades per semantic role and the BlockRules root loaded from JSON.

//! Static extraction tables.
//!
//! Every block kind owns a set of role cascades. A cascade is an ordered list of
//! matchers; earlier entries encode template-specific structure and later ones
//! are generic fallbacks. The tables are plain data so that a migration for a
//! different site can ship its own JSON without touching the builders.

use serde::{Deserialize, Serialize};

use crate::dom::cleaners::CleanupRules;
use crate::error::ImportError;

/// A single structural matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherSpec {
    /// A bare CSS selector; the first valid node wins.
    Css(String),
    /// A selector with structural refinements.
    Rule(MatchRule),
}

impl Default for MatcherSpec {
    fn default() -> Self {
        MatcherSpec::Css(String::new())
    }
}

/// A CSS selector refined by descendant exclusion, ancestor climbing and multiplicity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchRule {
    pub select: String,
    /// Skip candidates having a descendant that matches this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub without: Option<String>,
    /// Replace each candidate by its nearest ancestor-or-self matching this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest: Option<String>,
    /// Return every valid node of this matcher instead of the first one.
    #[serde(default)]
    pub all: bool,
}

impl MatcherSpec {
    pub fn select(&self) -> &str {
        match self {
            MatcherSpec::Css(css) => css,
            MatcherSpec::Rule(rule) => &rule.select,
        }
    }

    pub fn without(&self) -> Option<&str> {
        match self {
            MatcherSpec::Css(_) => None,
            MatcherSpec::Rule(rule) => rule.without.as_deref(),
        }
    }

    pub fn closest(&self) -> Option<&str> {
        match self {
            MatcherSpec::Css(_) => None,
            MatcherSpec::Rule(rule) => rule.closest.as_deref(),
        }
    }

    pub fn all(&self) -> bool {
        match self {
            MatcherSpec::Css(_) => false,
            MatcherSpec::Rule(rule) => rule.all,
        }
    }

    /// Every selector string this matcher references.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.select())
            .chain(self.without())
            .chain(self.closest())
    }
}

/// Ordered matchers for one semantic role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCascade {
    pub matchers: Vec<MatcherSpec>,
}

impl RoleCascade {
    pub fn new(matchers: Vec<MatcherSpec>) -> Self {
        Self { matchers }
    }

    /// Cascade built from bare CSS selectors.
    pub fn css<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: selectors
                .into_iter()
                .map(|s| MatcherSpec::Css(s.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Card extraction plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardRules {
    #[serde(default)]
    pub image: RoleCascade,
    #[serde(default)]
    pub title: RoleCascade,
    #[serde(default)]
    pub subtitle: RoleCascade,
    #[serde(default)]
    pub description: RoleCascade,
    #[serde(default)]
    pub cta: RoleCascade,
}

/// Columns extraction plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnsRules {
    /// Row-like container holding the sibling columns.
    #[serde(default)]
    pub row: RoleCascade,
    /// Selector a direct child of the row must match to count as a column.
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub heading: RoleCascade,
    /// Rich text container whose paragraphs form the column body.
    #[serde(default)]
    pub rich_text: RoleCascade,
    #[serde(default)]
    pub paragraph: String,
    /// Marks a paragraph as bold.
    #[serde(default)]
    pub bold: String,
    #[serde(default)]
    pub image: RoleCascade,
    #[serde(default)]
    pub cta: RoleCascade,
}

/// Hero extraction plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeroRules {
    #[serde(default)]
    pub image: RoleCascade,
    #[serde(default)]
    pub heading: RoleCascade,
    #[serde(default)]
    pub description: RoleCascade,
    #[serde(default)]
    pub cta: RoleCascade,
}

/// Maps a source subtree pattern to the block kind that parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub kind: String,
    pub selector: String,
}

/// Cleanup denylists for the passes around extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanupPasses {
    #[serde(default)]
    pub before: CleanupRules,
    #[serde(default)]
    pub after: CleanupRules,
}

/// Root of the extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockRules {
    #[serde(default)]
    pub signatures: Vec<Signature>,
    #[serde(default)]
    pub cleanup: CleanupPasses,
    #[serde(default)]
    pub card: CardRules,
    #[serde(default)]
    pub columns: ColumnsRules,
    #[serde(default)]
    pub hero: HeroRules,
}

impl BlockRules {
    /// Parses a rules document from JSON.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        serde_json::from_str(json)
            .map_err(|e| ImportError::config("rules", "parse rules", Some(e.into())))
    }

    /// Every selector referenced anywhere in the tables.
    pub fn selectors(&self) -> Vec<&str> {
        let cascades = [
            &self.card.image,
            &self.card.title,
            &self.card.subtitle,
            &self.card.description,
            &self.card.cta,
            &self.columns.row,
            &self.columns.heading,
            &self.columns.rich_text,
            &self.columns.image,
            &self.columns.cta,
            &self.hero.image,
            &self.hero.heading,
            &self.hero.description,
            &self.hero.cta,
        ];

        let mut out: Vec<&str> = cascades
            .iter()
            .flat_map(|c| c.matchers.iter())
            .flat_map(|m| m.selectors())
            .collect();
        out.extend(self.signatures.iter().map(|s| s.selector.as_str()));
        out.extend(
            [
                self.columns.column.as_str(),
                self.columns.paragraph.as_str(),
                self.columns.bold.as_str(),
            ]
            .into_iter()
            .filter(|s| !s.is_empty()),
        );
        for pass in [&self.cleanup.before, &self.cleanup.after] {
            out.extend(pass.remove.iter().map(String::as_str));
            out.extend(pass.remove_if_empty.iter().map(String::as_str));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_spec_accepts_string_or_rule() {
        let json = r#"[
            "h3",
            { "select": ".standalone-link", "closest": "a" },
            { "select": "p", "without": "a", "all": true }
        ]"#;
        let cascade: RoleCascade = serde_json::from_str(json).expect("deserialize");
        assert_eq!(cascade.matchers.len(), 3);

        assert_eq!(cascade.matchers[0], MatcherSpec::Css("h3".into()));
        assert_eq!(cascade.matchers[1].closest(), Some("a"));
        assert!(!cascade.matchers[1].all());
        assert_eq!(cascade.matchers[2].without(), Some("a"));
        assert!(cascade.matchers[2].all());
    }

    #[test]
    fn matcher_selectors_lists_refinements() {
        let spec = MatcherSpec::Rule(MatchRule {
            select: ".curatedcta a".into(),
            without: Some("img".into()),
            closest: Some("a".into()),
            all: true,
        });
        let all: Vec<&str> = spec.selectors().collect();
        assert_eq!(all, vec![".curatedcta a", "img", "a"]);
    }

    #[test]
    fn from_json_defaults_missing_sections() {
        let rules = BlockRules::from_json(r#"{ "card": { "title": ["h3"] } }"#).unwrap();
        assert_eq!(rules.card.title, RoleCascade::css(["h3"]));
        assert!(rules.signatures.is_empty());
        assert!(rules.hero.image.is_empty());
    }

    #[test]
    fn from_json_reports_config_error() {
        let err = BlockRules::from_json("{ not json").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn serde_roundtrip_keeps_rule_shape() {
        let cascade = RoleCascade::new(vec![
            MatcherSpec::Css("a.news-link".into()),
            MatcherSpec::Rule(MatchRule {
                select: ".standalone-link".into(),
                closest: Some("a".into()),
                ..Default::default()
            }),
        ]);
        let json = serde_json::to_string(&cascade).unwrap();
        assert_eq!(
            json,
            r#"["a.news-link",{"select":".standalone-link","closest":"a","all":false}]"#
        );
        let back: RoleCascade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cascade);
    }
}
