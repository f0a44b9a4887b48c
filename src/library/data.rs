//! Serialized corpus format.
//!
//! ```json
//! {
//!   "terms":   [{ "slug": "rashi", "titles": [{ "text": "רש\"י", "lang": "he", "primary": true }] }],
//!   "indexes": [{ "title": "Rashi on Beitzah", "he_title": "רש\"י על ביצה",
//!                 "base_text_titles": ["Beitzah"],
//!                 "schema": { "match_templates": [{ "term_slugs": ["rashi", "beitzah"] }],
//!                             "address_types": ["Talmud", "Integer", "Integer"] },
//!                 "segments": [{ "ref": "Rashi on Beitzah 15b:8:1", "text": "שמא יפשע. ..." }] }],
//!   "legacy_mappings": [{ "index": "...", "mapping": { "1:1": "..." } }]
//! }
//! ```

use crate::address::AddressType;
use crate::library::terms::{MatchScope, Title};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct LibraryData {
    #[serde(default)]
    pub terms: Vec<TermData>,
    pub indexes: Vec<IndexData>,
    #[serde(default)]
    pub legacy_mappings: Vec<LegacyMappingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermData {
    pub slug: String,
    pub titles: Vec<Title>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateData {
    pub term_slugs: Vec<String>,
    #[serde(default)]
    pub scope: Option<MatchScope>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeData {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub titles: Vec<Title>,
    #[serde(default)]
    pub match_templates: Vec<TemplateData>,
    #[serde(default)]
    pub address_types: Option<Vec<AddressType>>,
    #[serde(default)]
    pub lengths: Vec<u32>,
    #[serde(default)]
    pub referenceable: Vec<bool>,
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AltStructData {
    pub name: String,
    #[serde(default)]
    pub numbered_by: Option<AddressType>,
    pub nodes: Vec<AltNodeData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AltNodeData {
    pub key: String,
    #[serde(default)]
    pub titles: Vec<Title>,
    #[serde(default)]
    pub match_templates: Vec<TemplateData>,
    pub whole_ref: String,
    #[serde(default)]
    pub refs: Vec<String>,
    #[serde(default)]
    pub address_type: Option<AddressType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SegmentData {
    #[serde(rename = "ref")]
    pub reference: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexData {
    pub title: String,
    #[serde(default)]
    pub he_title: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub collective_title: Option<String>,
    #[serde(default)]
    pub base_text_titles: Vec<String>,
    pub schema: NodeData,
    #[serde(default)]
    pub alt_structs: Vec<AltStructData>,
    #[serde(default)]
    pub dh_regexes: Vec<String>,
    #[serde(default)]
    pub segments: Vec<SegmentData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LegacyMappingData {
    pub index: String,
    pub mapping: BTreeMap<String, String>,
}
