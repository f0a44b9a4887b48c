//! Legacy ref mapping.
//!
//! Some books were re-segmented after citations to them were written. A
//! per-book table maps the old section strings onto current refs:
//!
//! ```text
//! "Tosefta Berakhot (Vilna) 1:3"    ──▶ table["1:3"] = "Tosefta Berakhot 1:2"
//! "Tosefta Berakhot (Vilna) 1:1-3"  ──▶ 1:1 and 1:3 mapped separately, joined
//!                                       as "Tosefta Berakhot 1:1-2"
//! ```

use crate::error::{LegacyRefError, LibraryError};
use crate::library::Library;
use crate::library::refs::Ref;
use std::sync::Arc;
use tracing::debug;

pub struct LegacyRefParser {
    library: Arc<Library>,
}

impl LegacyRefParser {
    pub fn new(library: Arc<Library>) -> Self {
        Self { library }
    }

    /// Map a legacy ref string onto a current ref.
    pub fn parse(&self, legacy_ref: &str) -> Result<Ref, LegacyRefError> {
        let legacy_ref = legacy_ref.trim();
        let title = self
            .library
            .legacy_titles()
            .filter(|t| legacy_ref.starts_with(t) && legacy_ref[t.len()..].starts_with(' '))
            .max_by_key(|t| t.len())
            .ok_or_else(|| LegacyRefError::NoParser(legacy_ref.to_string()))?;
        let mapping = self.library.legacy_mapping(title).ok_or_else(|| LegacyRefError::NoParser(title.to_string()))?;

        let sections = legacy_ref[title.len()..].trim();
        let (from, to) = match sections.split_once('-') {
            Some((from, to)) => (from.trim(), Some(to.trim())),
            None => (sections, None),
        };
        let lookup = |key: &str| -> Result<Ref, LegacyRefError> {
            let mapped = mapping.get(key).ok_or_else(|| LegacyRefError::MappingKey(format!("{title} {key}")))?;
            Ok(self.library.parse_ref(mapped)?)
        };

        let start = lookup(from)?;
        let Some(to) = to else {
            return Ok(start);
        };
        // `1:1-3` runs to `1:3`: the end inherits the start's leading sections.
        let from_levels: Vec<&str> = from.split(':').collect();
        let to_levels: Vec<&str> = to.split(':').collect();
        let keep = from_levels.len().saturating_sub(to_levels.len());
        let to_key = from_levels[..keep].iter().chain(&to_levels).copied().collect::<Vec<_>>().join(":");
        let end = lookup(&to_key)?;

        let (first, last) = (start.starting_ref(), end.ending_ref());
        if first.node() != last.node() || last.sections() < first.sections() {
            return Err(LibraryError::InvalidRef(legacy_ref.to_string()).into());
        }
        let joined = first.to(&last);
        debug!(legacy = legacy_ref, current = %joined, "mapped legacy ref");
        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> LegacyRefParser {
        LegacyRefParser::new(Library::sample())
    }

    #[test]
    fn maps_single_and_ranged_legacy_refs() {
        let cases = [
            ("Tosefta Berakhot (Vilna) 1:1", "Tosefta Berakhot 1:1"),
            ("Tosefta Berakhot (Vilna) 1:3", "Tosefta Berakhot 1:2"),
            ("Tosefta Berakhot (Vilna) 1:1-3", "Tosefta Berakhot 1:1-2"),
            ("Tosefta Berakhot (Vilna) 1:2-2:1", "Tosefta Berakhot 1:2-2:1"),
        ];
        for (legacy, expected) in cases {
            let got = parser().parse(legacy).unwrap_or_else(|e| panic!("'{legacy}' failed: {e}"));
            assert_eq!(got.normal(), expected, "mapping '{legacy}'");
        }
    }

    #[test]
    fn missing_keys_and_books_are_typed_errors() {
        assert!(matches!(parser().parse("Tosefta Berakhot (Vilna) 9:9"), Err(LegacyRefError::MappingKey(_))));
        assert!(matches!(parser().parse("Mishnah Berakhot 1:1"), Err(LegacyRefError::NoParser(_))));
    }
}
