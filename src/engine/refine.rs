//! Schema-tree refinement.
//!
//! A title match names a node; refinement walks down from it, consuming the
//! mention's remaining parts one child at a time:
//!
//! ```text
//! Berakhot ──(#דף כז)──▶ Berakhot 27a-27b
//!    │
//!    ├──(@פרק אלו דברים)──▶ Berakhot, Elu Devarim (51b-53b)
//!    │                          └──(#דף נב)──▶ Berakhot 52a-52b   (must overlap 51b-53b)
//!    └──(#פרק ח)──▶ 8th node of the numbered alt struct
//!
//! Rashi on Beitzah 15b ──(*שמא יפשע)──▶ Rashi on Beitzah 15b:8:1
//! ```
//!
//! Children of a match:
//!
//! - numbered level: a `Numbered` part decoded with the level's address type,
//!   or a `Range` part spanning as many levels as it has sections;
//! - dibur hamatchil: a `Dh` part looked up under the current ref;
//! - section context: the context ref's section at this level, when the
//!   context ref is in the same book family and agrees on the levels above;
//! - named children: alt-struct nodes and complex-schema children, by template;
//! - numbered alt struct: `פרק ב` picks the second node.
//!
//! Every match reached is kept; selection decides between them.

use super::context::same_family;
use super::dh::match_dh;
use super::matcher::MatchInput;
use super::{ContextPart, PartRef, ResolvedRef};
use crate::address::SectionValue;
use crate::library::Library;
use crate::library::refs::Ref;
use crate::library::schema::{ArrayMapSpec, JaggedSpec, NodeId, NodeKind};
use crate::raw_ref::{PartType, RefPart};
use crate::{Options, ResolutionThoroughness};
use std::collections::HashSet;
use tracing::{debug, warn};

type StateKey = (NodeId, Ref, Vec<PartRef>, Vec<ContextPart>);

pub(crate) struct Refiner<'a, 'i> {
    input: &'i MatchInput<'a>,
    options: &'a Options,
    pub steps: usize,
    pub exhausted: bool,
    seen: HashSet<StateKey>,
}

impl<'a, 'i> Refiner<'a, 'i> {
    pub fn new(input: &'i MatchInput<'a>, options: &'a Options) -> Self {
        Self { input, options, steps: 0, exhausted: false, seen: HashSet::new() }
    }

    fn lib(&self) -> &'a Library {
        self.input.lib
    }

    pub fn refine_all(&mut self, seeds: Vec<ResolvedRef>) -> Vec<ResolvedRef> {
        let mut out = Vec::new();
        for seed in seeds {
            out.extend(self.refine(seed));
        }
        out
    }

    /// `m` plus everything reachable from it.
    fn refine(&mut self, m: ResolvedRef) -> Vec<ResolvedRef> {
        let mut parts = m.resolved_parts.clone();
        parts.sort();
        let mut context = m.context_parts.clone();
        context.sort();
        if !self.seen.insert((m.node, m.reference.clone(), parts, context)) {
            return Vec::new();
        }
        if self.steps >= self.options.max_refinement_steps {
            if !self.exhausted {
                warn!(
                    raw_ref = %self.input.raw_ref.text(),
                    steps = self.steps,
                    "refinement budget exhausted; returning partial results"
                );
                self.exhausted = true;
            }
            return vec![m];
        }
        self.steps += 1;

        let children = self.children(&m);
        debug!(reference = %m.reference, children = children.len(), "refine");
        let mut out = vec![m];
        for child in children {
            out.extend(self.refine(child));
        }
        out
    }

    fn children(&self, m: &ResolvedRef) -> Vec<ResolvedRef> {
        let lib = self.lib();
        let node = lib.node(m.node);
        let mut out = Vec::new();
        match &node.kind {
            NodeKind::Jagged(spec) => {
                let numbered = self.jagged_children(m, spec);
                let consumed_text = numbered.iter().any(|c| c.resolved_parts.len() > m.resolved_parts.len());
                out.extend(numbered);
                let explore_alts = self.options.thoroughness == ResolutionThoroughness::High || !consumed_text;
                if m.reference.depth() == 0 && m.constraint.is_none() && explore_alts {
                    out.extend(self.named_children(m));
                    out.extend(self.numbered_alt_children(m));
                }
            }
            NodeKind::Schema => {
                out.extend(self.named_children(m));
                let default = node.children.iter().copied().find(|c| lib.node(*c).is_default);
                if let Some((default, spec)) = default.and_then(|d| lib.node(d).jagged().map(|s| (d, s))) {
                    let inner = m.child(default, lib.node_ref(default), []);
                    out.extend(self.jagged_children(&inner, spec));
                    out.extend(self.numbered_alt_children(&inner));
                }
            }
            NodeKind::ArrayMap(spec) if !spec.refs.is_empty() => out.extend(self.array_map_refs(m, spec)),
            NodeKind::ArrayMap(spec) => {
                let jagged = lib.default_jagged(node.index);
                if let Some((jagged, jagged_spec)) = jagged.and_then(|j| lib.node(j).jagged().map(|s| (j, s))) {
                    let mut inner = m.child(jagged, lib.node_ref(jagged), []);
                    inner.constraint = Some(spec.whole_ref.clone());
                    out.extend(self.jagged_children(&inner, jagged_spec));
                }
            }
            NodeKind::AltStruct { .. } => {}
        }
        out
    }

    fn free_parts<'m>(&'m self, m: &'m ResolvedRef) -> impl Iterator<Item = (usize, &'m RefPart)> + 'm {
        self.input.raw_ref.parts().iter().enumerate().filter(move |(i, _)| !m.is_consumed(*i))
    }

    fn satisfies_constraint(m: &ResolvedRef, candidate: &Ref) -> bool {
        m.constraint.as_ref().is_none_or(|c| c.overlaps(candidate))
    }

    fn jagged_children(&self, m: &ResolvedRef, spec: &JaggedSpec) -> Vec<ResolvedRef> {
        let depth = m.reference.depth();
        if depth >= spec.depth() {
            return Vec::new();
        }
        let lang = self.input.lang;
        let address_type = spec.address_types[depth];
        let mut out = Vec::new();

        // Numbers apply in written order: `ג:א` is never 1:3.
        let parts = self.input.raw_ref.parts();
        let last_number = m
            .resolved_parts
            .iter()
            .filter_map(|p| match *p {
                PartRef::Whole(i) if matches!(parts[i].part_type(), PartType::Numbered | PartType::Range) => Some(i),
                _ => None,
            })
            .max();

        for (i, part) in self.free_parts(m) {
            if last_number.is_some_and(|last| i < last) && part.part_type() != PartType::Dh {
                continue;
            }
            match part {
                RefPart::Single(p) if p.part_type == PartType::Numbered && !m.reference.is_range() => {
                    for value in address_type.possible_sections(lang, p.text()) {
                        if !spec.in_bounds(depth, value.start()) || !spec.in_bounds(depth, value.end()) {
                            continue;
                        }
                        let reference = match value {
                            SectionValue::Single(n) => m.reference.subref(n),
                            SectionValue::Span(a, b) => m.reference.subref_span(a, b),
                        };
                        if Self::satisfies_constraint(m, &reference) {
                            out.push(m.child(m.node, reference, [PartRef::Whole(i)]));
                        }
                    }
                }
                RefPart::Ranged(range) if !m.reference.is_range() && depth + range.sections.len() <= spec.depth() => {
                    let mut sections = m.reference.sections().to_vec();
                    let mut to_sections = sections.clone();
                    let sides = range.sections.iter().zip(&range.to_sections).enumerate();
                    let mut ok = true;
                    for (offset, (from, to)) in sides {
                        let level_type = spec.address_types[depth + offset];
                        let from = level_type.possible_sections(lang, from.text()).into_iter().next();
                        let to = level_type.possible_sections(lang, to.text()).into_iter().next();
                        let (Some(from), Some(to)) = (from, to) else {
                            ok = false;
                            break;
                        };
                        sections.push(from.start());
                        to_sections.push(to.end());
                    }
                    if !ok || to_sections < sections {
                        continue;
                    }
                    let reference = m.reference.with_sections(sections, to_sections);
                    if Self::satisfies_constraint(m, &reference) {
                        out.push(m.child(m.node, reference, [PartRef::Whole(i)]));
                    }
                }
                RefPart::Single(p) if p.part_type == PartType::Dh => {
                    let index = self.lib().node(m.node).index;
                    let Some(dh_index) = self.lib().dibur_hamatchils(index) else { continue };
                    let container = match (&m.constraint, depth) {
                        (Some(constraint), 0) => constraint.clone(),
                        _ => m.reference.clone(),
                    };
                    for reference in match_dh(dh_index, &container, p, self.options.dh_match_threshold) {
                        out.push(m.child(reference.node(), reference, [PartRef::Whole(i)]));
                    }
                }
                _ => {}
            }
        }

        if let Some(child) = self.section_context_child(m, depth) {
            out.push(child);
        }
        out
    }

    /// Fill level `depth` from the context ref.
    fn section_context_child(&self, m: &ResolvedRef, depth: usize) -> Option<ResolvedRef> {
        let context = m.context_ref.as_ref()?;
        if m.reference.is_range() || context.depth() <= depth || context.sections()[..depth] != *m.reference.sections() {
            return None;
        }
        if !self.shares_context(context, &m.reference, depth) {
            return None;
        }
        let section = context.sections()[depth];
        let reference = m.reference.subref(section);
        if !Self::satisfies_constraint(m, &reference) {
            return None;
        }
        let mut child = m.child(m.node, reference, []);
        child.context_parts.push(ContextPart::Section { level: depth, section });
        Some(child)
    }

    /// Same node, or books of one family (a text and its commentaries) paginated
    /// alike at `depth`.
    fn shares_context(&self, context: &Ref, reference: &Ref, depth: usize) -> bool {
        if context.node() == reference.node() {
            return true;
        }
        same_family(self.lib(), context, reference)
            && context.address_types().get(depth) == reference.address_types().get(depth)
    }

    fn named_children(&self, m: &ResolvedRef) -> Vec<ResolvedRef> {
        let lib = self.lib();
        let Some(trie) = lib.child_template_trie(m.node) else {
            return Vec::new();
        };
        self.input
            .walk_templates(trie, m.next_words(self.input.words), &[])
            .into_iter()
            .map(|hit| m.child(hit.leaf.node, lib.node_ref(hit.leaf.node), hit.consumed))
            .collect()
    }

    fn numbered_alt_children(&self, m: &ResolvedRef) -> Vec<ResolvedRef> {
        let lib = self.lib();
        let index = lib.index(lib.node(m.node).index);
        let mut out = Vec::new();
        for alt in &index.alt_structs {
            let alt = lib.node(*alt);
            let NodeKind::AltStruct { numbered_by: Some(address_type) } = alt.kind else { continue };
            for (i, part) in self.free_parts(m) {
                let RefPart::Single(p) = part else { continue };
                if p.part_type != PartType::Numbered {
                    continue;
                }
                for value in address_type.possible_sections_named(self.input.lang, p.text()) {
                    let SectionValue::Single(n) = value else { continue };
                    let Some(child) = n.checked_sub(1).and_then(|k| alt.children.get(k as usize)) else { continue };
                    out.push(m.child(*child, lib.node_ref(*child), [PartRef::Whole(i)]));
                }
            }
        }
        out
    }

    fn array_map_refs(&self, m: &ResolvedRef, spec: &ArrayMapSpec) -> Vec<ResolvedRef> {
        let mut out = Vec::new();
        for (i, part) in self.free_parts(m) {
            let RefPart::Single(p) = part else { continue };
            if p.part_type != PartType::Numbered {
                continue;
            }
            for value in spec.address_type.possible_sections(self.input.lang, p.text()) {
                let SectionValue::Single(n) = value else { continue };
                let Some(reference) = n.checked_sub(1).and_then(|k| spec.refs.get(k as usize)) else { continue };
                let mut child = m.child(reference.node(), reference.clone(), [PartRef::Whole(i)]);
                child.constraint = None;
                out.push(child);
            }
        }
        out
    }
}
