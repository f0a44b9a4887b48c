//! The canonical structured address.
//!
//! A [`Ref`] names a node of a work's schema plus the section numbers below it.
//! Ranges keep both ends as full-depth vectors: `Genesis 1:1-2` is sections
//! `[1, 1]`, to-sections `[1, 2]`. Single refs have identical ends.

use crate::Lang;
use crate::address::AddressType;
use crate::library::schema::NodeId;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    node: NodeId,
    index_title: Arc<str>,
    node_title: Arc<str>,
    address_types: Arc<[AddressType]>,
    sections: Vec<u32>,
    to_sections: Vec<u32>,
}

impl Ref {
    pub(crate) fn new(
        node: NodeId,
        index_title: Arc<str>,
        node_title: Arc<str>,
        address_types: Arc<[AddressType]>,
    ) -> Self {
        Self { node, index_title, node_title, address_types, sections: Vec::new(), to_sections: Vec::new() }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Title of the work this ref belongs to (`Rashi on Beitzah`).
    pub fn index_title(&self) -> &str {
        &self.index_title
    }

    /// Full title of the schema node (`Shulchan Arukh, Orach Chayim`).
    pub fn node_title(&self) -> &str {
        &self.node_title
    }

    pub fn sections(&self) -> &[u32] {
        &self.sections
    }

    pub fn to_sections(&self) -> &[u32] {
        &self.to_sections
    }

    pub fn address_types(&self) -> &[AddressType] {
        &self.address_types
    }

    pub fn is_range(&self) -> bool {
        self.sections != self.to_sections
    }

    /// Number of specified sections.
    pub fn depth(&self) -> usize {
        self.sections.len()
    }

    /// This ref narrowed by one more section.
    pub fn subref(&self, section: u32) -> Ref {
        let mut out = self.clone();
        out.sections.push(section);
        out.to_sections.push(section);
        out
    }

    /// This ref narrowed by a span of sections at the next level.
    pub fn subref_span(&self, start: u32, end: u32) -> Ref {
        let mut out = self.clone();
        out.sections.push(start);
        out.to_sections.push(end);
        out
    }

    /// Replace both ends explicitly.
    pub(crate) fn with_sections(&self, sections: Vec<u32>, to_sections: Vec<u32>) -> Ref {
        let mut out = self.clone();
        out.sections = sections;
        out.to_sections = to_sections;
        out
    }

    /// Truncate to the first `depth` sections.
    pub fn truncated(&self, depth: usize) -> Ref {
        let mut out = self.clone();
        out.sections.truncate(depth);
        out.to_sections.truncate(depth);
        out
    }

    /// Range from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Ref) -> Ref {
        let mut out = self.clone();
        out.to_sections = other.to_sections.clone();
        out
    }

    pub fn starting_ref(&self) -> Ref {
        self.with_sections(self.sections.clone(), self.sections.clone())
    }

    pub fn ending_ref(&self) -> Ref {
        self.with_sections(self.to_sections.clone(), self.to_sections.clone())
    }

    /// True when every address in `other` is an address in `self`.
    ///
    /// Unspecified trailing levels are open: `Genesis 1` contains `Genesis 1:5`.
    pub fn contains(&self, other: &Ref) -> bool {
        if self.node != other.node {
            return false;
        }
        let depth = self.sections.len().max(other.sections.len());
        let pad = |v: &[u32], fill: u32| -> Vec<u32> {
            let mut out = v.to_vec();
            out.resize(depth, fill);
            out
        };
        pad(&self.sections, 0) <= pad(&other.sections, 0) && pad(&other.to_sections, u32::MAX) <= pad(&self.to_sections, u32::MAX)
    }

    /// True when `self` and `other` share at least one address.
    pub fn overlaps(&self, other: &Ref) -> bool {
        if self.node != other.node {
            return false;
        }
        let depth = self.sections.len().max(other.sections.len());
        let pad = |v: &[u32], fill: u32| -> Vec<u32> {
            let mut out = v.to_vec();
            out.resize(depth, fill);
            out
        };
        pad(&self.sections, 0) <= pad(&other.to_sections, u32::MAX) && pad(&other.sections, 0) <= pad(&self.to_sections, u32::MAX)
    }

    /// Ancestor refs from the bare node down to the parent of this ref's depth.
    pub fn top_level_refs(&self) -> Vec<Ref> {
        (0..self.sections.len()).map(|d| self.truncated(d)).collect()
    }

    fn format_sections(&self, lang: Lang, sections: &[u32], offset: usize) -> String {
        sections
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let address_type = self.address_types.get(offset + i).copied().unwrap_or(AddressType::Integer);
                address_type.to_str(lang, *n)
            })
            .collect::<Vec<_>>()
            .join(":")
    }

    /// English normal form, e.g. `Genesis 1:1-2`, `Berakhot 27b`.
    pub fn normal(&self) -> String {
        if self.sections.is_empty() {
            return self.node_title.to_string();
        }
        let from = self.format_sections(Lang::En, &self.sections, 0);
        if !self.is_range() {
            return format!("{} {}", self.node_title, from);
        }
        let first_diff = self.sections.iter().zip(&self.to_sections).position(|(a, b)| a != b).unwrap_or(0);
        let to = self.format_sections(Lang::En, &self.to_sections[first_diff..], first_diff);
        format!("{} {}-{}", self.node_title, from, to)
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis() -> Ref {
        Ref::new(NodeId(0), "Genesis".into(), "Genesis".into(), vec![AddressType::Perek, AddressType::Pasuk].into())
    }

    fn berakhot() -> Ref {
        Ref::new(NodeId(1), "Berakhot".into(), "Berakhot".into(), vec![AddressType::Talmud, AddressType::Integer].into())
    }

    #[test]
    fn renders_normal_forms() {
        assert_eq!(genesis().normal(), "Genesis");
        assert_eq!(genesis().subref(1).subref(1).normal(), "Genesis 1:1");
        assert_eq!(genesis().subref(1).subref_span(1, 2).normal(), "Genesis 1:1-2");
        assert_eq!(genesis().subref(1).subref(1).to(&genesis().subref(2).subref(3)).normal(), "Genesis 1:1-2:3");
        assert_eq!(berakhot().subref(54).normal(), "Berakhot 27b");
        assert_eq!(berakhot().subref_span(53, 54).normal(), "Berakhot 27a-27b");
    }

    #[test]
    fn containment_treats_missing_levels_as_open() {
        let chapter = genesis().subref(1);
        assert!(chapter.contains(&genesis().subref(1).subref(5)));
        assert!(!chapter.contains(&genesis().subref(2).subref(1)));
        assert!(genesis().contains(&chapter));

        let perek = berakhot().subref_span(102, 106);
        assert!(perek.contains(&berakhot().subref(103)));
        assert!(!perek.contains(&berakhot().subref(54)));
        assert!(!chapter.contains(&berakhot().subref(1)));
    }

    #[test]
    fn overlap_is_symmetric_and_open_ended() {
        let elu_devarim = berakhot().subref_span(102, 106);
        assert!(elu_devarim.overlaps(&berakhot().subref_span(103, 104)));
        assert!(berakhot().subref_span(106, 107).overlaps(&elu_devarim));
        assert!(!elu_devarim.overlaps(&berakhot().subref(107)));
        assert!(genesis().subref(1).overlaps(&genesis().subref(1).subref(3)));
        assert!(!genesis().subref(1).overlaps(&berakhot()));
    }

    #[test]
    fn range_ends_are_single_refs() {
        let range = genesis().subref(1).subref(1).to(&genesis().subref(2).subref(3));
        assert_eq!(range.starting_ref().normal(), "Genesis 1:1");
        assert_eq!(range.ending_ref().normal(), "Genesis 2:3");
        assert!(!range.ending_ref().is_range());
    }

    #[test]
    fn top_level_refs_walk_down_from_the_book() {
        let r = genesis().subref(1).subref(5);
        let names: Vec<String> = r.top_level_refs().iter().map(Ref::normal).collect();
        assert_eq!(names, vec!["Genesis", "Genesis 1"]);
    }
}
