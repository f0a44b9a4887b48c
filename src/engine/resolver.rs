//! Orchestration of a single resolution and of a document batch.
//!
//! ```text
//! raw ref ──▶ split_non_cts ──▶ for each piece:
//!                                  seeds  (previous piece │ ibid │ titles + current book)
//!                                  refine (Refiner, bounded by max_refinement_steps)
//!                                  select
//! ```
//!
//! The resolver never mutates the ibid history it is handed; the batch entry
//! point records each unambiguous result so later mentions can refer back.

use super::context::{IbidHistory, context_terms};
use super::matcher::{MatchInput, unrefined_matches};
use super::metrics::{RunMetrics, RunResult};
use super::refine::Refiner;
use super::select::{Resolution, select};
use super::trigger::{PartTypeSet, TriggerInfo};
use super::{ContextType, PartRef, ResolvedRef};
use crate::error::ResolutionError;
use crate::library::Library;
use crate::library::refs::Ref;
use crate::raw_ref::{PartType, PartWord, RawRef, RefPart};
use crate::{Lang, Options, ResolutionThoroughness};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Resolutions of one raw ref of a document, by its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionResult {
    pub raw_ref: usize,
    pub resolutions: Vec<Resolution>,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    lib: &'a Library,
    options: &'a Options,
}

/// Seeds for one piece, and whether every part must be consumed.
struct Seeds {
    matches: Vec<ResolvedRef>,
    strict: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(lib: &'a Library, options: &'a Options) -> Self {
        Self { lib, options }
    }

    /// Resolve one raw ref. No match is `Ok(vec![])`.
    pub fn resolve_raw_ref(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw_ref: &RawRef,
        ibid: &IbidHistory,
    ) -> Result<Vec<Resolution>, ResolutionError> {
        Ok(self.run(lang, context_ref, raw_ref, ibid)?.resolutions)
    }

    /// Like [`resolve_raw_ref`](Self::resolve_raw_ref), keeping every candidate
    /// reading and the run's counters.
    pub fn run(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw_ref: &RawRef,
        ibid: &IbidHistory,
    ) -> Result<RunResult, ResolutionError> {
        if raw_ref.is_empty() {
            return Err(ResolutionError::EmptyRawRef);
        }
        let start = Instant::now();
        let mut out = RunResult { resolutions: Vec::new(), candidates: Vec::new(), metrics: RunMetrics::default() };

        let info = TriggerInfo::scan(raw_ref);
        debug!(raw_ref = %raw_ref.text(), path = ?info.path(), parts = info.num_parts, "resolve");

        let mut previous: Option<Ref> = None;
        for piece in raw_ref.split_non_cts() {
            let resolution = self.resolve_piece(lang, context_ref, Arc::new(piece), ibid, previous.as_ref(), &mut out);
            previous = match &resolution {
                Some(Resolution::Resolved(r)) => Some(r.reference.clone()),
                _ => None,
            };
            out.resolutions.extend(resolution);
        }

        out.metrics.total = start.elapsed();
        Ok(out)
    }

    fn resolve_piece(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw: Arc<RawRef>,
        ibid: &IbidHistory,
        previous: Option<&Ref>,
        out: &mut RunResult,
    ) -> Option<Resolution> {
        let info = TriggerInfo::scan(&raw);
        out.metrics.pieces += 1;

        if info.is_bare_ibid() {
            let last = ibid.last_ref()?;
            let mut m = ResolvedRef::seed(raw.clone(), last.node(), last.clone());
            m.resolved_parts = (0..raw.parts().len()).map(PartRef::Whole).collect();
            m.context_ref = Some(last.clone());
            m.context_type = Some(ContextType::Ibid);
            out.candidates.push(m.clone());
            out.metrics.candidates += 1;
            return Some(Resolution::Resolved(m));
        }

        let words: Vec<Vec<PartWord>> = raw
            .parts()
            .iter()
            .map(|part| match part {
                RefPart::Single(p) if p.part_type == PartType::Named => p.words(),
                _ => Vec::new(),
            })
            .collect();
        let input = MatchInput {
            lib: self.lib,
            lang,
            raw_ref: &raw,
            words: &words,
            any_offset: self.options.thoroughness == ResolutionThoroughness::High,
        };

        let continues_previous = !info.parts.intersects(PartTypeSet::NAMED | PartTypeSet::IBID | PartTypeSet::RELATIVE);
        if let Some(seed) = previous.filter(|_| continues_previous).and_then(|prev| self.previous_piece_seed(&raw, prev)) {
            let seeds = Seeds { matches: vec![seed], strict: false };
            if let Some(resolution) = self.refine_and_select(&input, seeds, context_ref, out) {
                return Some(resolution);
            }
        }

        let seeds = if info.parts.contains(PartTypeSet::IBID) {
            self.ibid_seeds(&input, &info, context_ref, ibid)
        } else {
            Seeds { matches: self.titled_seeds(&input, &info, context_ref), strict: false }
        };
        self.refine_and_select(&input, seeds, context_ref, out)
    }

    fn refine_and_select(
        &self,
        input: &MatchInput<'_>,
        seeds: Seeds,
        context_ref: Option<&Ref>,
        out: &mut RunResult,
    ) -> Option<Resolution> {
        out.metrics.unrefined += seeds.matches.len();
        let mut refiner = Refiner::new(input, self.options);
        let mut candidates = refiner.refine_all(seeds.matches);
        out.metrics.refinement_steps += refiner.steps;
        out.metrics.budget_exhausted |= refiner.exhausted;

        if seeds.strict {
            let total = input.raw_ref.parts().len();
            candidates.retain(|m| m.num_resolved_parts() == total);
        }

        let selected = select(self.lib, candidates.clone(), context_ref);
        let kept = selected.as_ref().map_or(0, |s| s.readings().len());
        out.metrics.candidates += candidates.len();
        out.metrics.pruned += candidates.len().saturating_sub(kept);
        out.candidates.extend(candidates);
        debug!(raw_ref = %input.raw_ref.text(), kept, "selected");
        selected
    }

    /// `5` after `Exodus 9:6` starts from `Exodus 9`: the previous ref minus
    /// as many levels as this piece has numbers.
    fn previous_piece_seed(&self, raw: &Arc<RawRef>, previous: &Ref) -> Option<ResolvedRef> {
        let numbered: usize = raw
            .parts()
            .iter()
            .map(|part| match part {
                RefPart::Ranged(r) => r.sections.len(),
                RefPart::Single(p) if p.part_type == PartType::Numbered => 1,
                RefPart::Single(_) => 0,
            })
            .sum();
        let keep = previous.depth().checked_sub(numbered)?;
        let mut seed = ResolvedRef::seed(raw.clone(), previous.node(), previous.truncated(keep));
        seed.context_ref = Some(previous.clone());
        seed.context_type = Some(ContextType::PreviousPiece);
        Some(seed)
    }

    fn ibid_seeds(&self, input: &MatchInput<'_>, info: &TriggerInfo, context_ref: Option<&Ref>, ibid: &IbidHistory) -> Seeds {
        let ibid_parts: Vec<PartRef> = input
            .raw_ref
            .parts()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.part_type() == PartType::Ibid)
            .map(|(i, _)| PartRef::Whole(i))
            .collect();

        if info.parts.contains(PartTypeSet::NAMED) {
            let terms = context_terms(self.lib, context_ref);
            let tracked: Vec<ResolvedRef> = unrefined_matches(input, &terms)
                .into_iter()
                .filter_map(|mut m| {
                    let tracked = ibid.get_ref_by_title(m.reference.index_title())?;
                    m.context_ref = Some(tracked.clone());
                    m.context_type = Some(ContextType::Ibid);
                    m.resolved_parts.extend(ibid_parts.iter().copied());
                    Some(m)
                })
                .collect();
            if tracked.is_empty() {
                return Seeds { matches: self.titled_seeds(input, info, context_ref), strict: false };
            }
            return Seeds { matches: tracked, strict: true };
        }

        let matches = ibid
            .recent_refs()
            .map(|tracked| {
                let node = tracked.node();
                let mut seed = ResolvedRef::seed(input.raw_ref.clone(), node, self.lib.node_ref(node));
                seed.resolved_parts = ibid_parts.clone();
                seed.context_ref = Some(tracked.clone());
                seed.context_type = Some(ContextType::Ibid);
                seed
            })
            .collect();
        Seeds { matches, strict: true }
    }

    fn titled_seeds(&self, input: &MatchInput<'_>, info: &TriggerInfo, context_ref: Option<&Ref>) -> Vec<ResolvedRef> {
        let mut seeds = Vec::new();
        if info.parts.contains(PartTypeSet::NAMED) {
            let terms = context_terms(self.lib, context_ref);
            seeds = unrefined_matches(input, &terms);
            for seed in &mut seeds {
                seed.context_ref = context_ref.cloned();
            }
        }
        if let Some(context) = context_ref {
            if info.seeds_current_book() || seeds.is_empty() {
                seeds.push(self.current_book_seed(input.raw_ref, context));
            }
        }
        debug!(raw_ref = %input.raw_ref.text(), seeds = seeds.len(), "unrefined matches");
        seeds
    }

    /// The context ref's node, consuming any relative parts.
    fn current_book_seed(&self, raw: &Arc<RawRef>, context: &Ref) -> ResolvedRef {
        let node = context.node();
        let mut seed = ResolvedRef::seed(raw.clone(), node, self.lib.node_ref(node));
        seed.resolved_parts = raw
            .parts()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.part_type() == PartType::Relative)
            .map(|(i, _)| PartRef::Whole(i))
            .collect();
        seed.context_ref = Some(context.clone());
        seed.context_type = Some(ContextType::CurrentBook);
        seed
    }

    /// Resolve the raw refs of many documents, each read inside its context ref.
    ///
    /// Failures are logged and skipped. Unresolved mentions are left out unless
    /// `Options::with_failures` is set.
    pub fn bulk_resolve_refs(
        &self,
        lang: Lang,
        context_refs: &[Option<Ref>],
        raw_refs: &[Vec<RawRef>],
        ibid: &mut IbidHistory,
    ) -> Vec<Vec<MentionResult>> {
        if context_refs.len() != raw_refs.len() {
            warn!(context_refs = context_refs.len(), documents = raw_refs.len(), "context refs and documents differ in length");
        }
        context_refs
            .iter()
            .zip(raw_refs)
            .map(|(context_ref, doc_refs)| {
                if self.options.reset_ibids_every_context_ref {
                    ibid.reset();
                }
                self.resolve_document(lang, context_ref.as_ref(), doc_refs, ibid)
            })
            .collect()
    }

    fn resolve_document(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw_refs: &[RawRef],
        ibid: &mut IbidHistory,
    ) -> Vec<MentionResult> {
        let mut results = Vec::new();
        for (i, raw_ref) in raw_refs.iter().enumerate() {
            let resolutions = match self.resolve_raw_ref(lang, context_ref, raw_ref, ibid) {
                Ok(resolutions) => resolutions,
                Err(err) => {
                    warn!(error = %err, raw_ref = %raw_ref.text(), "skipping raw ref");
                    Vec::new()
                }
            };
            if !resolutions.iter().any(Resolution::is_ambiguous) {
                if let Some(Resolution::Resolved(last)) = resolutions.last() {
                    ibid.record(&last.reference);
                }
            }
            if !resolutions.is_empty() || self.options.with_failures {
                results.push(MentionResult { raw_ref: i, resolutions });
            }
        }
        results
    }
}
