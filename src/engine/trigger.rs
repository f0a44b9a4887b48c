//! Trigger scanning (raw ref pre-classification).
//!
//! Before any trie work the resolver looks at which part types a raw ref
//! carries. The resulting [`PartTypeSet`] picks the resolution path: a
//! non-contiguous separator splits the mention first, an ibid part pulls from
//! the history, a mention with no named part can only resolve inside the
//! context book.
//!
//! This is a cheap, exact scan; the paths it picks still have to match.

use crate::raw_ref::{PartType, RawRef};

bitflags::bitflags! {
    /// Part types present in a raw ref.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PartTypeSet: u16 {
        const NAMED        = 1 << 0;
        const NUMBERED     = 1 << 1;
        const DH           = 1 << 2;
        const RANGE        = 1 << 3;
        const RANGE_SYMBOL = 1 << 4;
        const IBID         = 1 << 5;
        const RELATIVE     = 1 << 6;
        const NON_CTS      = 1 << 7;
    }
}

impl PartTypeSet {
    pub fn from_part_type(part_type: PartType) -> Self {
        match part_type {
            PartType::Named => Self::NAMED,
            PartType::Numbered => Self::NUMBERED,
            PartType::Dh => Self::DH,
            PartType::Range => Self::RANGE,
            PartType::RangeSymbol => Self::RANGE_SYMBOL,
            PartType::Ibid => Self::IBID,
            PartType::Relative => Self::RELATIVE,
            PartType::NonCts => Self::NON_CTS,
        }
    }
}

/// Which resolution strategy a raw ref takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    NonContiguous,
    Ibid,
    /// Title matching, with the context book as a fallback seed.
    Titled,
    /// No named part: only the context book can anchor the mention.
    CurrentBook,
}

#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub parts: PartTypeSet,
    pub num_parts: usize,
}

impl TriggerInfo {
    pub fn scan(raw_ref: &RawRef) -> Self {
        let parts = raw_ref
            .parts()
            .iter()
            .fold(PartTypeSet::empty(), |acc, part| acc | PartTypeSet::from_part_type(part.part_type()));
        Self { parts, num_parts: raw_ref.parts().len() }
    }

    pub fn path(&self) -> ResolutionPath {
        if self.parts.contains(PartTypeSet::NON_CTS) {
            ResolutionPath::NonContiguous
        } else if self.parts.contains(PartTypeSet::IBID) {
            ResolutionPath::Ibid
        } else if self.parts.contains(PartTypeSet::NAMED) {
            ResolutionPath::Titled
        } else {
            ResolutionPath::CurrentBook
        }
    }

    /// True when the context book should be tried as a seed alongside titles.
    pub fn seeds_current_book(&self) -> bool {
        self.parts.contains(PartTypeSet::RELATIVE) || !self.parts.contains(PartTypeSet::NAMED)
    }

    /// Only ibid parts: the answer is the last ref, as is.
    pub fn is_bare_ibid(&self) -> bool {
        self.parts == PartTypeSet::IBID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_resolution_paths() {
        let cases = [
            (raw_ref!(en, "@Exodus #9:#6~,#5"), ResolutionPath::NonContiguous),
            (raw_ref!(he, "&שם #פסוק ה"), ResolutionPath::Ibid),
            (raw_ref!(he, "@רש\"י @פרק יום טוב @בביצה"), ResolutionPath::Titled),
            (raw_ref!(he, "<לקמן #דף כז"), ResolutionPath::CurrentBook),
            (raw_ref!(he, "#דף כז"), ResolutionPath::CurrentBook),
        ];
        for (raw_ref, expected) in cases {
            assert_eq!(TriggerInfo::scan(&raw_ref).path(), expected, "path for '{}'", raw_ref.text());
        }
    }

    #[test]
    fn ranges_are_scanned_after_grouping() {
        let info = TriggerInfo::scan(&raw_ref!(he, "@בראשית #א:#א^-#ב"));
        assert!(info.parts.contains(PartTypeSet::NAMED | PartTypeSet::RANGE));
        assert!(!info.parts.contains(PartTypeSet::RANGE_SYMBOL));
        assert!(TriggerInfo::scan(&raw_ref!(he, "&שם")).is_bare_ibid());
        assert!(TriggerInfo::scan(&raw_ref!(he, "<לעיל @בברכות")).seeds_current_book());
    }
}
