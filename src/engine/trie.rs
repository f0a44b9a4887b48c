//! Word-level tries.
//!
//! Two tries share one implementation:
//!
//! ```text
//! TitleTrie          words ──▶ {Term(slug), Node(id)}
//!   "רש"י" ──▶ {Term(rashi)}
//!   "רש"י" "על" "ביצה" ──▶ {Node(Rashi on Beitzah)}
//!
//! MatchTemplateTrie  slugs ──▶ {TemplateLeaf{node, scope}}
//!   rashi ─ beitzah ──▶ {Rashi on Beitzah}
//!   perek ─ elu-devarim ──▶ {Berakhot ch. 8 (any), Pesachim ch. 6 (any)}
//! ```
//!
//! Each edge is one key. Terminal entries live beside the edge map, so a key
//! sequence can be both a complete title and the prefix of a longer one.

use crate::Lang;
use crate::library::schema::{NodeId, SchemaNode};
use crate::library::terms::{MatchScope, NonUniqueTerm};
use crate::normalize::normalize_words;
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::Arc;

#[derive(Debug)]
struct TrieNode<K, V> {
    children: HashMap<K, TrieNode<K, V>>,
    values: BTreeSet<V>,
}

impl<K, V> Default for TrieNode<K, V> {
    fn default() -> Self {
        Self { children: HashMap::new(), values: BTreeSet::new() }
    }
}

#[derive(Debug)]
pub struct Trie<K, V> {
    root: TrieNode<K, V>,
    len: usize,
}

impl<K, V> Default for Trie<K, V> {
    fn default() -> Self {
        Self { root: TrieNode::default(), len: 0 }
    }
}

impl<K: Eq + Hash, V: Ord> Trie<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at the end of `keys`. An empty key sequence is ignored.
    pub fn insert<I: IntoIterator<Item = K>>(&mut self, keys: I, value: V) {
        let mut node = &mut self.root;
        let mut depth = 0;
        for key in keys {
            node = node.children.entry(key).or_default();
            depth += 1;
        }
        if depth > 0 && node.values.insert(value) {
            self.len += 1;
        }
    }

    /// Entries stored at exactly `keys`.
    pub fn lookup<Q>(&self, keys: &[&Q]) -> Option<&BTreeSet<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cursor = self.cursor();
        for key in keys {
            cursor = cursor.step(*key)?;
        }
        let values = cursor.values();
        (!values.is_empty()).then_some(values)
    }

    pub fn cursor(&self) -> TrieCursor<'_, K, V> {
        TrieCursor { node: &self.root }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A position inside a trie, advanced one key at a time.
#[derive(Debug)]
pub struct TrieCursor<'a, K, V> {
    node: &'a TrieNode<K, V>,
}

impl<K, V> Clone for TrieCursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for TrieCursor<'_, K, V> {}

impl<'a, K: Eq + Hash, V> TrieCursor<'a, K, V> {
    pub fn step<Q>(&self, key: &Q) -> Option<TrieCursor<'a, K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node.children.get(key).map(|node| TrieCursor { node })
    }

    pub fn values(&self) -> &'a BTreeSet<V> {
        &self.node.values
    }

    pub fn has_children(&self) -> bool {
        !self.node.children.is_empty()
    }
}

/// What a title resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrieEntry {
    Term(Arc<str>),
    Node(NodeId),
}

pub type TitleTrie = Trie<String, TrieEntry>;

/// A node reached by a complete template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateLeaf {
    pub node: NodeId,
    pub scope: Option<MatchScope>,
}

pub type MatchTemplateTrie = Trie<Arc<str>, TemplateLeaf>;

impl Trie<String, TrieEntry> {
    /// Title trie for one language: every term title, plus direct node titles.
    pub fn build<'a>(
        lang: Lang,
        terms: impl IntoIterator<Item = &'a NonUniqueTerm>,
        nodes: impl IntoIterator<Item = &'a SchemaNode>,
    ) -> Self {
        let mut trie = Self::new();
        for term in terms {
            for title in term.titles.all(lang) {
                trie.insert(normalize_words(title), TrieEntry::Term(term.slug.clone()));
            }
        }
        for node in nodes {
            for title in node.titles.all(lang) {
                trie.insert(normalize_words(title), TrieEntry::Node(node.id));
            }
        }
        trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::terms::{Title, TitleGroup};

    fn term(slug: &str, titles: &[(&str, Lang)]) -> NonUniqueTerm {
        let titles = titles
            .iter()
            .enumerate()
            .map(|(i, (text, lang))| Title { text: text.to_string(), lang: *lang, primary: i == 0 })
            .collect();
        NonUniqueTerm { slug: slug.into(), titles: TitleGroup::new(titles) }
    }

    #[test]
    fn lookup_by_words() {
        let terms = [
            term("tosafot", &[("תוספות", Lang::He), ("תוס'", Lang::He)]),
            term("tosefta", &[("תוספתא", Lang::He)]),
            term("yom-tov", &[("יום טוב", Lang::He)]),
            term("yom-tov-2", &[("יום טוב", Lang::He)]),
        ];
        let trie = TitleTrie::build(Lang::He, &terms, std::iter::empty::<&SchemaNode>());

        let hit = trie.lookup(&["תוס'"]).expect("abbreviation");
        assert!(hit.contains(&TrieEntry::Term("tosafot".into())));

        let both = trie.lookup(&["יום", "טוב"]).expect("duplicate titles keep every term");
        assert_eq!(both.len(), 2);

        assert!(trie.lookup(&["יום"]).is_none(), "prefix without terminal");
        assert!(trie.lookup(&["תוספת"]).is_none());
    }

    #[test]
    fn cursor_walks_incrementally() {
        let mut trie: MatchTemplateTrie = Trie::new();
        let leaf = TemplateLeaf { node: NodeId(7), scope: Some(MatchScope::Any) };
        trie.insert(["perek".into(), "elu-devarim".into()], leaf);

        let after_perek = trie.cursor().step("perek").expect("edge");
        assert!(after_perek.values().is_empty());
        assert!(after_perek.has_children());
        let done = after_perek.step("elu-devarim").expect("edge");
        assert_eq!(done.values().iter().copied().collect::<Vec<_>>(), vec![leaf]);
        assert_eq!(trie.len(), 1);
    }
}
