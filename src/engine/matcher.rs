//! Unrefined title matching.
//!
//! Named parts are read word by word through the title trie, turning runs of
//! words into term slugs; runs of slugs are then read through a template trie
//! to reach schema nodes.
//!
//! ```text
//! parts:  @רש"י      @פרק יום טוב      @בביצה
//! words:  [רש"י]     [פרק, יום, טוב]   [בביצה → ביצה]
//! slugs:  rashi      perek  yom-tov    beitzah
//!
//! root template trie:  rashi ─ beitzah           ──▶ Rashi on Beitzah
//!                      perek ─ yom-tov (any)      ──▶ Beitzah, Yom Tov
//! ```
//!
//! A template may take its terms from any unconsumed named part, in any order,
//! and from the context ref's term slugs. Inside one part the terms must be
//! contiguous. A hit needs at least one term from the mention itself.

use super::trie::{MatchTemplateTrie, TemplateLeaf, TrieCursor, TrieEntry};
use super::{ContextPart, PartRef, ResolvedRef};
use crate::Lang;
use crate::address::hebrew::prefix_variants;
use crate::library::Library;
use crate::raw_ref::{PartType, PartWord, RawRef};
use std::collections::HashSet;
use std::sync::Arc;

/// Inputs shared by every walk over one raw ref.
pub(crate) struct MatchInput<'a> {
    pub lib: &'a Library,
    pub lang: Lang,
    pub raw_ref: &'a Arc<RawRef>,
    /// Normalized words per part; empty for non-named parts.
    pub words: &'a [Vec<PartWord>],
    /// Start a title at any word of a named part, not just the first free one.
    pub any_offset: bool,
}

/// A complete template reached by a walk.
#[derive(Debug, Clone)]
pub(crate) struct TemplateHit {
    pub leaf: TemplateLeaf,
    pub consumed: Vec<PartRef>,
    pub context: Vec<ContextPart>,
}

#[derive(Clone)]
struct WalkState<'t> {
    cursor: TrieCursor<'t, Arc<str>, TemplateLeaf>,
    consumed: Vec<PartRef>,
    context: Vec<ContextPart>,
    next_word: Vec<usize>,
    /// Part a previous term ended inside of; the next term must continue there.
    mid_part: Option<usize>,
}

impl MatchInput<'_> {
    pub fn named_parts(&self) -> impl Iterator<Item = usize> + '_ {
        self.raw_ref
            .parts()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.part_type() == PartType::Named)
            .map(|(i, _)| i)
    }

    /// Title-trie entries for words of `part` starting at `start`, with the
    /// index one past the last word each entry covers.
    pub fn title_entries(&self, part: usize, start: usize) -> Vec<(usize, TrieEntry)> {
        let words = &self.words[part];
        let Some(first) = words.get(start) else {
            return Vec::new();
        };
        let variants = match self.lang {
            Lang::He => prefix_variants(&first.text),
            Lang::En => vec![first.text.as_str()],
        };

        let trie = self.lib.root_title_trie(self.lang);
        let mut out = Vec::new();
        for variant in variants {
            let Some(mut cursor) = trie.cursor().step(variant) else {
                continue;
            };
            let mut end = start + 1;
            loop {
                out.extend(cursor.values().iter().map(|entry| (end, entry.clone())));
                let Some(next) = words.get(end).and_then(|w| cursor.step(w.text.as_str())) else {
                    break;
                };
                cursor = next;
                end += 1;
            }
        }
        out.sort();
        out.dedup();
        out
    }

    /// Every template of `trie` satisfiable from the unconsumed words.
    pub fn walk_templates(
        &self,
        trie: &MatchTemplateTrie,
        next_word: Vec<usize>,
        context_terms: &[Arc<str>],
    ) -> Vec<TemplateHit> {
        let state = WalkState { cursor: trie.cursor(), consumed: Vec::new(), context: Vec::new(), next_word, mid_part: None };
        let mut out = Vec::new();
        self.extend(&state, context_terms, &mut out);
        out
    }

    fn extend(&self, state: &WalkState<'_>, context_terms: &[Arc<str>], out: &mut Vec<TemplateHit>) {
        let sources: Vec<(usize, usize)> = match state.mid_part {
            Some(part) => vec![(part, state.next_word[part])],
            None => self
                .named_parts()
                .filter(|&p| state.next_word[p] < self.words[p].len())
                .flat_map(|p| {
                    let first = state.next_word[p];
                    let last = if self.any_offset { self.words[p].len() } else { first + 1 };
                    (first..last).map(move |w| (p, w))
                })
                .collect(),
        };

        for (part, start) in sources {
            for (end, entry) in self.title_entries(part, start) {
                let TrieEntry::Term(slug) = entry else { continue };
                let Some(cursor) = state.cursor.step(&*slug) else { continue };
                let mut next = state.clone();
                next.cursor = cursor;
                next.consumed.push(PartRef::Words { part, start, end });
                next.next_word[part] = end;
                next.mid_part = (end < self.words[part].len()).then_some(part);
                self.emit(&next, out);
                if cursor.has_children() {
                    self.extend(&next, context_terms, out);
                }
            }
        }

        if state.mid_part.is_some() {
            return;
        }
        for slug in context_terms {
            let part = ContextPart::Term(slug.clone());
            if state.context.contains(&part) {
                continue;
            }
            let Some(cursor) = state.cursor.step(&**slug) else { continue };
            let mut next = state.clone();
            next.cursor = cursor;
            next.context.push(part);
            self.emit(&next, out);
            if cursor.has_children() {
                self.extend(&next, context_terms, out);
            }
        }
    }

    fn emit(&self, state: &WalkState<'_>, out: &mut Vec<TemplateHit>) {
        if state.consumed.is_empty() {
            return;
        }
        for leaf in state.cursor.values() {
            out.push(TemplateHit { leaf: *leaf, consumed: state.consumed.clone(), context: state.context.clone() });
        }
    }
}

/// Title matches at the root of the library, before any refinement.
pub(crate) fn unrefined_matches(input: &MatchInput<'_>, context_terms: &[Arc<str>]) -> Vec<ResolvedRef> {
    let lib = input.lib;
    let mut out = Vec::new();
    let mut seen = HashSet::new();

    let mut push = |m: ResolvedRef, out: &mut Vec<ResolvedRef>| {
        let mut key_parts = m.resolved_parts.clone();
        key_parts.sort();
        if seen.insert((m.node, key_parts, m.context_parts.clone())) {
            out.push(m);
        }
    };

    let zeros = vec![0; input.words.len()];
    for hit in input.walk_templates(lib.root_template_trie(), zeros, context_terms) {
        let mut m = ResolvedRef::seed(input.raw_ref.clone(), hit.leaf.node, lib.node_ref(hit.leaf.node));
        m.resolved_parts = hit.consumed;
        m.context_parts = hit.context;
        m.scope = hit.leaf.scope;
        push(m, &mut out);
    }

    // Direct node titles ("Rashi on Beitzah") read from the start of a part.
    for part in input.named_parts() {
        for (end, entry) in input.title_entries(part, 0) {
            let TrieEntry::Node(node) = entry else { continue };
            let mut m = ResolvedRef::seed(input.raw_ref.clone(), node, lib.node_ref(node));
            m.resolved_parts = vec![PartRef::Words { part, start: 0, end }];
            push(m, &mut out);
        }
    }
    out
}
