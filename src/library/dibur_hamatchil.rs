//! Dibur hamatchil ("the opening words") extraction and indexing.
//!
//! Commentary segments usually open with a quoted lemma from the base text set
//! off by a period, a dash or bold markup: `שמא יפשע. שמא יעבור...`. The lemma is
//! how later authors cite the comment (`רש"י ד"ה שמא יפשע`).

use crate::library::refs::Ref;
use crate::library::schema::{Index, JaggedSpec};
use crate::library::Segment;
use crate::normalize::normalize_words;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Longest lemma kept, in words.
pub const MAX_DH_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiburHamatchilNode {
    pub dibur_hamatchil: String,
    /// The book, each section prefix of `reference`, then enclosing alt nodes.
    pub container_refs: Vec<Ref>,
    pub reference: Ref,
}

fn generic_regexes() -> [&'static Regex; 3] {
    [
        regex!(r"^\s*<b>(.+?)</b>"),
        regex!(r"^\s*([^.\-–—:<>]+?)\s*[.:]"),
        regex!(r"^\s*([^.\-–—:<>]+?)\s+[\-–—]"),
    ]
}

/// Extract the normalized lemma of a segment.
///
/// Index-specific `regexes` are tried first (group 1 is the lemma), then the
/// generic bold/period/dash heuristics.
pub fn get_dh(segment_text: &str, regexes: &[Regex]) -> Option<String> {
    let lemma = regexes
        .iter()
        .chain(generic_regexes())
        .find_map(|re| re.captures(segment_text).and_then(|c| c.get(1)).map(|m| m.as_str()))?;
    let stripped = regex!(r"<[^>]+>").replace_all(lemma, "");
    let words = normalize_words(&stripped);
    if words.is_empty() {
        return None;
    }
    Some(words.into_iter().take(MAX_DH_WORDS).collect::<Vec<_>>().join(" "))
}

/// Lemmas of one index, looked up by container ref.
#[derive(Debug, Default)]
pub struct DiburHamatchilIndex {
    nodes: Vec<DiburHamatchilNode>,
    by_container: HashMap<Ref, Vec<usize>>,
}

impl DiburHamatchilIndex {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lemmas under `container`. Containers not recorded at build time (a daf
    /// span, a narrowed range) fall back to a containment scan.
    pub fn within<'a>(&'a self, container: &Ref) -> Vec<&'a DiburHamatchilNode> {
        match self.by_container.get(container) {
            Some(ids) => ids.iter().map(|&i| &self.nodes[i]).collect(),
            None => self.nodes.iter().filter(|n| container.contains(&n.reference)).collect(),
        }
    }
}

/// Build the lemma index of a commentary from its segments.
///
/// Containers are the book, each referenceable section prefix of the segment,
/// then the whole ref of any alt-struct node (`alt_refs`) enclosing it.
pub fn add_dibur_hamatchil_to_index(
    index: &Index,
    jagged: Option<&JaggedSpec>,
    segments: &[Segment],
    alt_refs: &[Ref],
) -> DiburHamatchilIndex {
    let regexes: Vec<Regex> = index
        .dh_regexes
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(index = %index.title, pattern, %err, "skipping invalid dibur hamatchil regex");
                None
            }
        })
        .collect();

    let mut out = DiburHamatchilIndex::default();
    for segment in segments {
        let Some(dibur_hamatchil) = get_dh(&segment.text, &regexes) else {
            continue;
        };
        // Prefix `d` ends at level `d - 1`.
        let mut container_refs: Vec<Ref> = segment
            .reference
            .top_level_refs()
            .into_iter()
            .enumerate()
            .filter(|(d, _)| *d == 0 || jagged.is_none_or(|spec| spec.is_referenceable(d - 1)))
            .map(|(_, r)| r)
            .collect();
        container_refs.extend(alt_refs.iter().filter(|r| r.contains(&segment.reference)).cloned());

        let id = out.nodes.len();
        for container in &container_refs {
            out.by_container.entry(container.clone()).or_default().push(id);
        }
        out.nodes.push(DiburHamatchilNode { dibur_hamatchil, container_refs, reference: segment.reference.clone() });
    }
    debug!(index = %index.title, count = out.nodes.len(), "indexed dibur hamatchils");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_lemma_before_period_or_dash() {
        assert_eq!(get_dh("שמא יפשע. שמא יעבור ויאכלנה", &[]), Some("שמא יפשע".to_string()));
        assert_eq!(get_dh("מאימתי - קורין את שמע", &[]), Some("מאימתי".to_string()));
        assert_eq!(get_dh("<b>והא תנן</b> בפרק", &[]), Some("והא תנן".to_string()));
        assert_eq!(get_dh("אין כאן סימן פיסוק", &[]), None);
    }

    #[test]
    fn strips_nikkud_and_caps_length() {
        assert_eq!(get_dh("שָׁמָּא יִפְשַׁע.", &[]), Some("שמא יפשע".to_string()));
        assert_eq!(get_dh("א ב ג ד ה ו ז. סוף", &[]), Some("א ב ג ד ה".to_string()));
    }

    #[test]
    fn index_regexes_take_precedence() {
        let custom = [Regex::new(r"^(\S+)").expect("valid")];
        assert_eq!(get_dh("שמא יפשע. שמא", &custom), Some("שמא".to_string()));
    }
}
