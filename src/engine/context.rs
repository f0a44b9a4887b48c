//! Short-term memory for elliptical mentions.
//!
//! [`IbidHistory`] remembers the last few books cited in a document, each with
//! the most recent ref resolved in it. `שם` ("ibid") resolves against it. The
//! history belongs to one document: callers create one per document (or reset it
//! between context refs) and pass it explicitly.
//!
//! ```text
//! record(Genesis 1:1)  titles: [Genesis]
//! record(Exodus 2:3)   titles: [Genesis, Exodus]
//! record(Genesis 4:2)  titles: [Exodus, Genesis]      (moved to most recent)
//! record(Job 1:1), n=2 titles: [Genesis, Job]         (Exodus evicted)
//! ```

use crate::Library;
use crate::library::refs::Ref;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct IbidHistory {
    last_n_to_store: usize,
    /// Oldest first.
    last_titles: VecDeque<Arc<str>>,
    title_ref_map: HashMap<Arc<str>, Ref>,
    last_ref: Option<Ref>,
}

impl IbidHistory {
    pub fn new(last_n_to_store: usize) -> Self {
        Self { last_n_to_store, last_titles: VecDeque::new(), title_ref_map: HashMap::new(), last_ref: None }
    }

    pub fn reset(&mut self) {
        self.last_titles.clear();
        self.title_ref_map.clear();
        self.last_ref = None;
    }

    pub fn record(&mut self, reference: &Ref) {
        if self.last_n_to_store == 0 {
            return;
        }
        let title: Arc<str> = reference.index_title().into();
        if let Some(pos) = self.last_titles.iter().position(|t| *t == title) {
            self.last_titles.remove(pos);
        }
        self.last_titles.push_back(title.clone());
        self.title_ref_map.insert(title, reference.clone());
        while self.last_titles.len() > self.last_n_to_store {
            if let Some(evicted) = self.last_titles.pop_front() {
                self.title_ref_map.remove(&evicted);
            }
        }
        self.last_ref = Some(reference.clone());
    }

    pub fn last_ref(&self) -> Option<&Ref> {
        self.last_ref.as_ref()
    }

    pub fn get_ref_by_title(&self, title: &str) -> Option<&Ref> {
        self.title_ref_map.get(title)
    }

    /// Tracked book titles, oldest first.
    pub fn titles(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.last_titles.iter().map(|t| &**t)
    }

    /// Tracked refs, most recent first.
    pub(crate) fn recent_refs(&self) -> impl Iterator<Item = &Ref> {
        self.last_titles.iter().rev().filter_map(|t| self.title_ref_map.get(t))
    }

    pub fn is_empty(&self) -> bool {
        self.last_titles.is_empty()
    }
}

/// Term slugs a context ref contributes to title matching.
pub(crate) fn context_terms(lib: &Library, context_ref: Option<&Ref>) -> Vec<Arc<str>> {
    context_ref.map(|r| lib.context_term_slugs(r)).unwrap_or_default()
}

/// True when two refs belong to one book family: the same book, a book and its
/// commentary, or two commentaries on the same book.
pub(crate) fn same_family(lib: &Library, a: &Ref, b: &Ref) -> bool {
    let family = |r: &Ref| {
        let index = lib.index_of(r);
        let mut titles = vec![index.title.to_string()];
        titles.extend(index.base_text_titles.iter().cloned());
        titles
    };
    let (a, b) = (family(a), family(b));
    a.iter().any(|t| b.contains(t))
}

/// True when `candidate` sits on the same top-level section as `context` in a
/// book of the same family (`Tosafot on Berakhot 27b:2:1` near `Rashi on Berakhot 27b:3:1`).
pub(crate) fn is_near(lib: &Library, candidate: &Ref, context: &Ref) -> bool {
    let (Some(a), Some(b)) = (candidate.sections().first(), context.sections().first()) else {
        return false;
    };
    a == b && candidate.address_types().first() == context.address_types().first() && same_family(lib, candidate, context)
}
