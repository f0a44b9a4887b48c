//! Terms, titles and match templates.
//!
//! A [`NonUniqueTerm`] is a slug with a group of alternate titles in each
//! language (`tosafot`: `Tosafot`, `תוספות`, `תוס'`). Schema nodes do not carry
//! matchable names directly; they carry [`MatchTemplate`]s, ordered lists of
//! term slugs that together name the node (`[rashi, beitzah]`).

use crate::Lang;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub lang: Lang,
    #[serde(default)]
    pub primary: bool,
}

/// Alternate titles of one named thing, across languages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleGroup {
    titles: Vec<Title>,
}

impl TitleGroup {
    pub fn new(titles: Vec<Title>) -> Self {
        Self { titles }
    }

    /// Warn when a language does not have exactly one primary title.
    pub fn validate(&self, owner: &str) {
        for lang in [Lang::En, Lang::He] {
            let total = self.titles.iter().filter(|t| t.lang == lang).count();
            let primaries = self.titles.iter().filter(|t| t.lang == lang && t.primary).count();
            if total > 0 && primaries != 1 {
                warn!(owner, ?lang, primaries, "title group should have exactly one primary title per language");
            }
        }
    }

    pub fn primary(&self, lang: Lang) -> Option<&str> {
        self.titles.iter().find(|t| t.lang == lang && t.primary).map(|t| t.text.as_str())
    }

    pub fn all(&self, lang: Lang) -> impl Iterator<Item = &str> {
        self.titles.iter().filter(move |t| t.lang == lang).map(|t| t.text.as_str())
    }

    pub fn push(&mut self, title: Title) {
        self.titles.push(title);
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// A named term shared by many schema nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonUniqueTerm {
    pub slug: Arc<str>,
    pub titles: TitleGroup,
}

/// Where a match template may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    /// Both at the root and when descending from the parent.
    Any,
    /// Only at the root.
    Alone,
}

/// Ordered term slugs naming a node.
///
/// A `None` scope means the template only applies when descending from the
/// node's parent; root index templates are always usable at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTemplate {
    pub term_slugs: Vec<Arc<str>>,
    pub scope: Option<MatchScope>,
}

impl MatchTemplate {
    pub fn new(term_slugs: Vec<Arc<str>>, scope: Option<MatchScope>) -> Self {
        Self { term_slugs, scope }
    }

    pub fn usable_at_root(&self) -> bool {
        matches!(self.scope, Some(MatchScope::Any | MatchScope::Alone))
    }

    pub fn usable_as_child(&self) -> bool {
        !matches!(self.scope, Some(MatchScope::Alone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(text: &str, lang: Lang, primary: bool) -> Title {
        Title { text: text.to_string(), lang, primary }
    }

    #[test]
    fn primary_and_alternates() {
        let group = TitleGroup::new(vec![
            title("Tosafot", Lang::En, true),
            title("תוספות", Lang::He, true),
            title("תוס'", Lang::He, false),
        ]);
        assert_eq!(group.primary(Lang::He), Some("תוספות"));
        assert_eq!(group.all(Lang::He).collect::<Vec<_>>(), vec!["תוספות", "תוס'"]);
        group.validate("tosafot");
    }

    #[test]
    fn scopes_gate_root_and_child_use() {
        let combined = MatchTemplate::new(vec!["perek".into()], None);
        let alone = MatchTemplate::new(vec!["perek".into()], Some(MatchScope::Alone));
        let any = MatchTemplate::new(vec!["perek".into()], Some(MatchScope::Any));
        assert!(!combined.usable_at_root() && combined.usable_as_child());
        assert!(alone.usable_at_root() && !alone.usable_as_child());
        assert!(any.usable_at_root() && any.usable_as_child());
    }
}
