//! Ranking and ambiguity.
//!
//! Refinement leaves every reading it reached. Selection keeps the best ones:
//!
//! ```text
//! key = (parts fully consumed ↑, template scope not Any ↑, context parts ↓)
//! ```
//!
//! Readings with the top key are deduplicated by ref. One left is a
//! [`Resolution::Resolved`]; several are a [`Resolution::Ambiguous`]. When the
//! mention was read inside a context ref, a tie is first narrowed to readings
//! on the context's page.

use super::ResolvedRef;
use super::context::is_near;
use crate::library::Library;
use crate::library::refs::Ref;
use crate::library::terms::MatchScope;
use std::cmp::Reverse;

/// Several equally good readings of one mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousResolvedRef {
    pub resolved_raw_refs: Vec<ResolvedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedRef),
    Ambiguous(AmbiguousResolvedRef),
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous(_))
    }

    pub fn resolved(&self) -> Option<&ResolvedRef> {
        match self {
            Resolution::Resolved(r) => Some(r),
            Resolution::Ambiguous(_) => None,
        }
    }

    /// Every reading this resolution carries.
    pub fn readings(&self) -> &[ResolvedRef] {
        match self {
            Resolution::Resolved(r) => std::slice::from_ref(r),
            Resolution::Ambiguous(a) => &a.resolved_raw_refs,
        }
    }

    pub fn refs(&self) -> Vec<&Ref> {
        self.readings().iter().map(|r| &r.reference).collect()
    }
}

fn rank_key(m: &ResolvedRef) -> (usize, bool, Reverse<usize>) {
    (m.num_resolved_parts(), m.scope != Some(MatchScope::Any), Reverse(m.context_parts.len()))
}

/// The best readings among `matches`, or `None` when nothing consumed a part.
pub(crate) fn select(lib: &Library, matches: Vec<ResolvedRef>, context_ref: Option<&Ref>) -> Option<Resolution> {
    let matches: Vec<ResolvedRef> = matches.into_iter().filter(|m| m.num_resolved_parts() > 0).collect();
    let best = matches.iter().map(rank_key).max()?;

    let mut winners: Vec<ResolvedRef> = Vec::new();
    for m in matches {
        if rank_key(&m) == best && !winners.iter().any(|w| w.reference == m.reference) {
            winners.push(m);
        }
    }

    if let (true, Some(context)) = (winners.len() > 1, context_ref) {
        let near: Vec<ResolvedRef> = winners.iter().filter(|w| is_near(lib, &w.reference, context)).cloned().collect();
        if !near.is_empty() {
            winners = near;
        }
    }

    if winners.len() == 1 {
        winners.pop().map(Resolution::Resolved)
    } else {
        Some(Resolution::Ambiguous(AmbiguousResolvedRef { resolved_raw_refs: winners }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PartRef;
    use std::sync::Arc;

    fn reading(lib: &Library, raw: &Arc<crate::RawRef>, reference: &str, parts: &[usize]) -> ResolvedRef {
        let reference = lib.parse_ref(reference).expect("valid ref");
        let mut m = ResolvedRef::seed(raw.clone(), reference.node(), reference);
        m.resolved_parts = parts.iter().map(|p| PartRef::Whole(*p)).collect();
        m
    }

    #[test]
    fn most_consumed_parts_win() {
        let lib = Library::sample();
        let raw = Arc::new(raw_ref!(en, "@Genesis #1:#5"));
        let matches = vec![
            reading(&lib, &raw, "Genesis", &[0]),
            reading(&lib, &raw, "Genesis 1", &[0, 1]),
            reading(&lib, &raw, "Genesis 1:5", &[0, 1, 2]),
        ];
        let resolution = select(&lib, matches, None).expect("resolution");
        assert_eq!(resolution.refs().iter().map(|r| r.normal()).collect::<Vec<_>>(), vec!["Genesis 1:5"]);
    }

    #[test]
    fn scope_then_context_break_ties() {
        let lib = Library::sample();
        let raw = Arc::new(raw_ref!(en, "@Genesis #1"));
        let mut any = reading(&lib, &raw, "Exodus 1", &[0, 1]);
        any.scope = Some(MatchScope::Any);
        let plain = reading(&lib, &raw, "Genesis 1", &[0, 1]);
        let resolution = select(&lib, vec![any, plain.clone()], None).expect("resolution");
        assert_eq!(resolution, Resolution::Resolved(plain.clone()));

        let mut with_context = reading(&lib, &raw, "Job 1", &[0, 1]);
        with_context.context_parts.push(crate::engine::ContextPart::Section { level: 0, section: 1 });
        let resolution = select(&lib, vec![with_context, plain.clone()], None).expect("resolution");
        assert_eq!(resolution, Resolution::Resolved(plain));
    }

    #[test]
    fn equal_readings_are_ambiguous_and_deduplicated() {
        let lib = Library::sample();
        let raw = Arc::new(raw_ref!(en, "@Genesis #1"));
        let matches = vec![
            reading(&lib, &raw, "Genesis 1", &[0, 1]),
            reading(&lib, &raw, "Genesis 1", &[0, 1]),
            reading(&lib, &raw, "Exodus 1", &[0, 1]),
        ];
        let resolution = select(&lib, matches, None).expect("resolution");
        assert!(resolution.is_ambiguous());
        assert_eq!(resolution.readings().len(), 2);
    }

    #[test]
    fn ties_narrow_to_the_context_page() {
        let lib = Library::sample();
        let raw = Arc::new(raw_ref!(en, "@Genesis #1"));
        let context = lib.parse_ref("Rashi on Berakhot 27b:3:1").expect("valid ref");
        let matches = vec![
            reading(&lib, &raw, "Tosafot on Berakhot 2a:1:1", &[0, 1]),
            reading(&lib, &raw, "Tosafot on Berakhot 27b:1:1", &[0, 1]),
        ];
        let resolution = select(&lib, matches, Some(&context)).expect("resolution");
        assert_eq!(resolution.refs()[0].normal(), "Tosafot on Berakhot 27b:1:1");
        assert!(!resolution.is_ambiguous());
    }

    #[test]
    fn nothing_consumed_is_no_resolution() {
        let lib = Library::sample();
        let raw = Arc::new(raw_ref!(en, "@Genesis"));
        assert!(select(&lib, vec![reading(&lib, &raw, "Genesis", &[])], None).is_none());
    }
}
