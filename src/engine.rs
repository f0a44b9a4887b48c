//! Citation resolution engine.
//!
//! The engine turns one [`RawRef`] into zero or more resolutions against a
//! [`Library`](crate::Library). It is split into focused submodules under
//! `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! raw ref ── TriggerInfo::scan ──┬─ non-contiguous? split, resolve pieces in order
//!            (trigger.rs)        ├─ ibid?          seed from IbidHistory (context.rs)
//!                                └─ otherwise      title match (matcher.rs)
//!                                                    - title trie  (trie.rs)
//!                                                    - template trie, context terms
//!                                                    - no title: seed current book
//!                                       │
//!                                       v
//!                             refine (refine.rs)
//!                               - numbered levels, ranges
//!                               - alt structs, named children
//!                               - dibur hamatchil (dh.rs)
//!                               - section context from the context ref
//!                                       │
//!                                       v
//!                             select (select.rs)
//!                               - rank, dedup, ambiguity
//!                                       │
//!                                       v
//!                                Vec<Resolution>
//! ```
//!
//! Every step is append-only: consuming a part creates a new [`ResolvedRef`]
//! rather than editing the one it came from, so competing readings of the same
//! mention coexist until selection ranks them.
//!
//! ## Responsibilities by module
//!
//! - `trie.rs`: word and term-slug tries.
//! - `trigger.rs`: classifies a raw ref's part types to pick a resolution path.
//! - `matcher.rs`: unrefined title matches, from any unconsumed part.
//! - `refine.rs`: schema-tree descent consuming the remaining parts.
//! - `dh.rs`: fuzzy dibur hamatchil lookup.
//! - `context.rs`: ibid history and context-ref term slugs.
//! - `select.rs`: ranking and ambiguity.
//! - `resolver.rs`: orchestration of a single and a bulk run.
//! - `metrics.rs`: per-run counters.
//!
//! ## Debugging
//!
//! Traces are emitted with `tracing::debug!`; the CLI enables them with
//! `--debug` or `MEKOROT_DEBUG=1`.

#[path = "engine/context.rs"]
mod context;
#[path = "engine/dh.rs"]
mod dh;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/refine.rs"]
mod refine;
#[path = "engine/resolver.rs"]
mod resolver;
#[path = "engine/select.rs"]
mod select;
#[path = "engine/trie.rs"]
pub mod trie;
#[path = "engine/trigger.rs"]
mod trigger;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use context::IbidHistory;
pub use metrics::{RunMetrics, RunResult};
pub use resolver::{MentionResult, Resolver};
pub use select::{AmbiguousResolvedRef, Resolution};
pub use trigger::{PartTypeSet, ResolutionPath, TriggerInfo};

use crate::doc::NeSpan;
use crate::library::refs::Ref;
use crate::library::schema::NodeId;
use crate::library::terms::MatchScope;
use crate::raw_ref::{PartWord, RawRef, RefPart};
use serde::Serialize;
use std::sync::Arc;

/// The part (or the words of a named part) a match consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartRef {
    Whole(usize),
    /// Words `start..end` of a named part.
    Words { part: usize, start: usize, end: usize },
}

impl PartRef {
    pub fn part(&self) -> usize {
        match *self {
            PartRef::Whole(part) | PartRef::Words { part, .. } => part,
        }
    }
}

/// Something taken from the context ref rather than from the mention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextPart {
    /// A term slug naming the context ref's book or its base text.
    Term(Arc<str>),
    /// A section of the context ref filling an omitted level.
    Section { level: usize, section: u32 },
}

/// How the context ref took part in a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    /// The mention named no book; the context ref's book was used.
    CurrentBook,
    /// Resolved from the ibid history.
    Ibid,
    /// A later piece of a non-contiguous mention, continuing the previous piece.
    PreviousPiece,
}

/// One reading of a raw ref: the node and ref it denotes and what it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    pub raw_ref: Arc<RawRef>,
    pub node: NodeId,
    pub reference: Ref,
    pub resolved_parts: Vec<PartRef>,
    pub context_ref: Option<Ref>,
    pub context_type: Option<ContextType>,
    pub context_parts: Vec<ContextPart>,
    /// Scope of the template the title was matched with.
    pub scope: Option<MatchScope>,
    /// Results must overlap this ref (set when descending below an alt-struct node).
    pub(crate) constraint: Option<Ref>,
}

impl ResolvedRef {
    pub(crate) fn seed(raw_ref: Arc<RawRef>, node: NodeId, reference: Ref) -> Self {
        Self {
            raw_ref,
            node,
            reference,
            resolved_parts: Vec::new(),
            context_ref: None,
            context_type: None,
            context_parts: Vec::new(),
            scope: None,
            constraint: None,
        }
    }

    /// A child reading: same history, new node and ref, extra consumed parts.
    pub(crate) fn child(&self, node: NodeId, reference: Ref, consumed: impl IntoIterator<Item = PartRef>) -> Self {
        let mut out = self.clone();
        out.node = node;
        out.reference = reference;
        out.resolved_parts.extend(consumed);
        out
    }

    pub fn is_consumed(&self, part: usize) -> bool {
        self.resolved_parts.iter().any(|p| p.part() == part)
    }

    /// Next unconsumed word of each part (named parts may be consumed in pieces).
    pub(crate) fn next_words(&self, words: &[Vec<PartWord>]) -> Vec<usize> {
        let mut next = vec![0; words.len()];
        for part_ref in &self.resolved_parts {
            match *part_ref {
                PartRef::Whole(part) => next[part] = usize::MAX,
                PartRef::Words { part, end, .. } => next[part] = next[part].max(end),
            }
        }
        next
    }

    /// Number of parts consumed completely.
    pub fn num_resolved_parts(&self) -> usize {
        let parts = self.raw_ref.parts();
        (0..parts.len())
            .filter(|&i| {
                let mut covered = 0;
                for part_ref in &self.resolved_parts {
                    match *part_ref {
                        PartRef::Whole(p) if p == i => return true,
                        PartRef::Words { part, start, end } if part == i => covered += end - start,
                        _ => {}
                    }
                }
                covered > 0 && covered >= word_count(&parts[i])
            })
            .count()
    }

    /// Document spans of the consumed parts, in part order.
    pub fn part_spans(&self) -> Vec<NeSpan> {
        let mut sorted = self.resolved_parts.clone();
        sorted.sort();
        sorted
            .iter()
            .map(|part_ref| {
                let part = &self.raw_ref.parts()[part_ref.part()];
                match *part_ref {
                    PartRef::Whole(_) => part.span().clone(),
                    PartRef::Words { start, end, .. } => {
                        let words = part.as_single().map(|p| p.words()).unwrap_or_default();
                        match (words.get(start), words.get(end.saturating_sub(1))) {
                            (Some(first), Some(last)) => part.span().subspan(first.range.0, last.range.1),
                            _ => part.span().clone(),
                        }
                    }
                }
            })
            .collect()
    }
}

fn word_count(part: &RefPart) -> usize {
    match part {
        RefPart::Single(p) => p.words().len(),
        RefPart::Ranged(_) => 1,
    }
}
