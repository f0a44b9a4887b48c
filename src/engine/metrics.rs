//! Engine run metrics.
//!
//! Small structs used to observe and debug what a resolution did.
//!
//! The intended usage is:
//!
//! - `Resolver::resolve_raw_ref` for normal operation.
//! - `Resolver::run` for profiling, debugging regressions, and inspecting
//!   every reading refinement produced before selection.
//!
//! Counters are cheap; the candidate list is only kept by `run`.

use super::{Resolution, ResolvedRef};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Resolver::run`](super::Resolver::run).
    pub total: Duration,
    /// Pieces the raw ref was split into (1 unless non-contiguous).
    pub pieces: usize,
    /// Title matches (and context seeds) before refinement.
    pub unrefined: usize,
    /// Matches expanded by refinement.
    pub refinement_steps: usize,
    /// Readings handed to selection.
    pub candidates: usize,
    /// Readings selection dropped.
    pub pruned: usize,
    /// Refinement stopped at `Options::max_refinement_steps`.
    pub budget_exhausted: bool,
}

/// Resolver output bundled with what led to it.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Selected resolutions, one per resolved piece.
    pub resolutions: Vec<Resolution>,
    /// Every reading before selection.
    pub candidates: Vec<ResolvedRef>,
    pub metrics: RunMetrics,
}
