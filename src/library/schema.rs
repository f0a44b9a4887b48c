//! Schema arena.
//!
//! Every index owns a strict tree of nodes. Nodes of all indexes live in one
//! arena ([`Library::node`](super::Library::node)) and point at their parent by
//! [`NodeId`]. Alternate structures (chapters of a tractate laid over its daf
//! pagination) are separate trees rooted at an [`NodeKind::AltStruct`] node.
//!
//! ```text
//! Index "Shulchan Arukh"
//!   root  Schema ───────────────┐
//!     ├─ "Orach Chayim"  Jagged [Siman, Seif]
//!     └─ "Yoreh Deah"    Jagged [Siman, Seif]
//!
//! Index "Beitzah"
//!   root  Jagged [Talmud, Integer]
//!   alt   AltStruct "Chapters" (numbered by Perek)
//!     ├─ ArrayMap "ביצה"     whole_ref Beitzah 2a-15b
//!     └─ ArrayMap "יום טוב"  whole_ref Beitzah 15b-23b
//! ```

use crate::address::AddressType;
use crate::library::refs::Ref;
use crate::library::terms::{MatchTemplate, TitleGroup};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndexId(pub(crate) u32);

impl IndexId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A numbered (jagged array) level description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JaggedSpec {
    pub address_types: Arc<[AddressType]>,
    /// Highest valid section per level, where known.
    pub lengths: Vec<u32>,
    pub referenceable: Vec<bool>,
}

impl JaggedSpec {
    pub fn depth(&self) -> usize {
        self.address_types.len()
    }

    pub fn in_bounds(&self, level: usize, section: u32) -> bool {
        section >= 1 && self.lengths.get(level).is_none_or(|max| section <= *max)
    }

    pub fn is_referenceable(&self, level: usize) -> bool {
        self.referenceable.get(level).copied().unwrap_or(true)
    }
}

/// A node of an alternate structure mapping a name onto a span of the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMapSpec {
    pub whole_ref: Ref,
    /// Sub-refs addressed by number (`refs[n - 1]`), when the node has them.
    pub refs: Vec<Ref>,
    pub address_type: AddressType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Complex node whose children are named.
    Schema,
    Jagged(JaggedSpec),
    /// Root of an alternate structure; children are array map nodes.
    AltStruct { numbered_by: Option<AddressType> },
    ArrayMap(ArrayMapSpec),
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub id: NodeId,
    pub index: IndexId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub key: String,
    /// Title used in refs: `Genesis`, `Shulchan Arukh, Orach Chayim`.
    pub full_title: Arc<str>,
    /// Titles matched directly, outside any template.
    pub titles: TitleGroup,
    pub match_templates: Vec<MatchTemplate>,
    pub kind: NodeKind,
    pub is_default: bool,
}

impl SchemaNode {
    pub fn jagged(&self) -> Option<&JaggedSpec> {
        match &self.kind {
            NodeKind::Jagged(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn array_map(&self) -> Option<&ArrayMapSpec> {
        match &self.kind {
            NodeKind::ArrayMap(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A work in the corpus.
#[derive(Debug, Clone)]
pub struct Index {
    pub id: IndexId,
    pub title: Arc<str>,
    pub he_title: String,
    pub categories: Vec<String>,
    pub collective_title: Option<String>,
    pub base_text_titles: Vec<String>,
    pub root: NodeId,
    pub alt_structs: Vec<NodeId>,
    pub dh_regexes: Vec<String>,
}

impl Index {
    pub fn is_commentary(&self) -> bool {
        !self.base_text_titles.is_empty()
    }
}
