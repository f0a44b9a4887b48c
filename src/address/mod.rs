//! Address types: how each level of a work is numbered and written.
//!
//! A jagged-array level carries an [`AddressType`]. The address type knows the
//! section names that may precede a number (`פרק`, `פ"`, `chapter`), which
//! [`NumeralCodec`](codec::NumeralCodec) parses the number, and how to render a
//! section back to text. Talmud pages are the odd one out: `כ"ז ע"ב` / `27b` is a
//! single section (`2 * daf`), and a daf written without an amud denotes both
//! sides.
//!
//! ```text
//! "פ"ח"        ── Perek  ──▶ Single(8)
//! "פסוקים מ"   ── Pasuk  ──▶ Single(40)
//! "דכ"ז ע"ב"   ── Talmud ──▶ Single(54)      (27b)
//! "דף כז"      ── Talmud ──▶ Span(53, 54)    (27a-27b)
//! "פסוק ה"     ── Perek  ──▶ []              (names another level)
//! ```

pub mod codec;
pub mod hebrew;

#[cfg(test)]
mod tests;

use crate::Lang;
use crate::normalize::is_nikkud;
use codec::{ArabicNumeral, HebrewNumeral, NumeralCodec, decode_number};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Numbering scheme of one addressable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressType {
    Integer,
    Perek,
    Pasuk,
    Mishnah,
    Talmud,
    Halakhah,
    Siman,
    Seif,
    SeifKatan,
    Volume,
}

/// A parsed section: one number, or an inclusive span of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionValue {
    Single(u32),
    Span(u32, u32),
}

impl SectionValue {
    pub fn start(self) -> u32 {
        match self {
            SectionValue::Single(n) | SectionValue::Span(n, _) => n,
        }
    }

    pub fn end(self) -> u32 {
        match self {
            SectionValue::Single(n) | SectionValue::Span(_, n) => n,
        }
    }
}

const ALL: [AddressType; 10] = [
    AddressType::Integer,
    AddressType::Perek,
    AddressType::Pasuk,
    AddressType::Mishnah,
    AddressType::Talmud,
    AddressType::Halakhah,
    AddressType::Siman,
    AddressType::Seif,
    AddressType::SeifKatan,
    AddressType::Volume,
];

impl AddressType {
    /// Regex matching `<section name> <rest>`; group 1 is the rest.
    fn section_name_regex(self, lang: Lang) -> Option<&'static Regex> {
        let re = match (self, lang) {
            (AddressType::Integer, _) => return None,
            (AddressType::Perek, Lang::He) => regex!(r#"^(?:פרקים|פרק|פ['"])\s*(\S.*)$"#),
            (AddressType::Perek, Lang::En) => regex!(r"^(?:chapters|chapter|chap\.?|ch\.?|perek)\s*(\S.*)$"),
            (AddressType::Pasuk, Lang::He) => regex!(r#"^(?:פסוקים|פסוק|פס['"])\s*(\S.*)$"#),
            (AddressType::Pasuk, Lang::En) => regex!(r"^(?:verses|verse|vv\.?|v\.|pasuk)\s*(\S.*)$"),
            (AddressType::Mishnah, Lang::He) => regex!(r#"^(?:משניות|משנה|מתני'|מ')\s*(\S.*)$"#),
            (AddressType::Mishnah, Lang::En) => regex!(r"^(?:mishnayot|mishnah|mishna)\s*(\S.*)$"),
            (AddressType::Talmud, Lang::He) => regex!(r#"^(?:דפים|דף|ד')\s*(\S.*)$"#),
            (AddressType::Talmud, Lang::En) => regex!(r"^(?:daf|dafs|folio|fol\.)\s*(\S.*)$"),
            (AddressType::Halakhah, Lang::He) => regex!(r#"^(?:הלכות|הלכה|הל')\s*(\S.*)$"#),
            (AddressType::Halakhah, Lang::En) => regex!(r"^(?:halakhot|halakhah|halakha|halacha)\s*(\S.*)$"),
            (AddressType::Siman, Lang::He) => regex!(r#"^(?:סימנים|סימן|סי'|ס')\s*(\S.*)$"#),
            (AddressType::Siman, Lang::En) => regex!(r"^(?:simanim|siman)\s*(\S.*)$"),
            (AddressType::Seif, Lang::He) => regex!(r#"^(?:סעיפים|סעיף|סע'|ס')\s*(\S.*)$"#),
            (AddressType::Seif, Lang::En) => regex!(r"^(?:seifim|seif)\s*(\S.*)$"),
            (AddressType::SeifKatan, Lang::He) => regex!(r#"^(?:סעיף קטן|ס"ק|סק')\s*(\S.*)$"#),
            (AddressType::SeifKatan, Lang::En) => regex!(r"^(?:seif katan)\s*(\S.*)$"),
            (AddressType::Volume, Lang::He) => regex!(r#"^(?:חלק|כרך)\s*(\S.*)$"#),
            (AddressType::Volume, Lang::En) => regex!(r"^(?:volume|vol\.?|part)\s*(\S.*)$"),
        };
        Some(re)
    }

    /// Strip this type's section name, if present.
    fn strip_section_name<'a>(self, lang: Lang, text: &'a str) -> Option<&'a str> {
        let re = self.section_name_regex(lang)?;
        re.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }

    /// True when `text` opens with a section name belonging to some other type
    /// and not to this one.
    fn names_other_level(self, lang: Lang, text: &str) -> bool {
        ALL.iter().filter(|t| **t != self).any(|t| t.strip_section_name(lang, text).is_some())
    }

    /// All readings of `text` as a section of this type.
    ///
    /// A leading section name for this type is stripped. Text naming a different
    /// level yields nothing. For Hebrew the bare number may carry a one-letter
    /// prefix (`דכ"ז`), which is tried after the unprefixed reading fails.
    pub fn possible_sections(self, lang: Lang, text: &str) -> Vec<SectionValue> {
        let cleaned = clean_section_text(text, lang);
        let rest = match self.strip_section_name(lang, &cleaned) {
            Some(rest) => rest.to_string(),
            None if self.names_other_level(lang, &cleaned) => return Vec::new(),
            None => cleaned,
        };

        let candidates: Vec<&str> = match lang {
            Lang::He => hebrew::prefix_variants(&rest),
            Lang::En => vec![rest.as_str()],
        };
        for candidate in candidates {
            if let Some(value) = self.decode(lang, candidate) {
                return vec![value];
            }
        }
        Vec::new()
    }

    /// Like [`possible_sections`](Self::possible_sections), but only when `text`
    /// carries this type's own section name (`פרק ב`, not `ב`).
    pub fn possible_sections_named(self, lang: Lang, text: &str) -> Vec<SectionValue> {
        if self.strip_section_name(lang, &clean_section_text(text, lang)).is_none() {
            return Vec::new();
        }
        self.possible_sections(lang, text)
    }

    /// Parse a bare number (no section name) in this type's notation.
    pub fn to_number(self, lang: Lang, s: &str) -> Option<u32> {
        match self.decode(lang, &clean_section_text(s, lang))? {
            SectionValue::Single(n) => Some(n),
            SectionValue::Span(start, _) => Some(start),
        }
    }

    fn decode(self, lang: Lang, s: &str) -> Option<SectionValue> {
        let s = s.trim();
        match self {
            AddressType::Talmud => decode_daf(lang, s),
            _ => {
                let s = s.trim_end_matches(['.', ':', ',', ';']);
                decode_number(lang, s).map(SectionValue::Single)
            }
        }
    }

    /// Render section `n` of this type, e.g. `Talmud.to_str(En, 54) == "27b"`.
    pub fn to_str(self, lang: Lang, n: u32) -> String {
        match (self, lang) {
            (AddressType::Talmud, Lang::En) => {
                let (daf, amud) = daf_amud(n);
                format!("{daf}{amud}")
            }
            (AddressType::Talmud, Lang::He) => {
                let (daf, amud) = daf_amud(n);
                let mark = if amud == 'a' { '.' } else { ':' };
                format!("{}{mark}", HebrewNumeral.encode(daf))
            }
            (_, Lang::He) => HebrewNumeral.encode(n),
            (_, Lang::En) => ArabicNumeral.encode(n),
        }
    }

    /// Default English section name, used when rendering debug output.
    pub fn section_name(self) -> &'static str {
        match self {
            AddressType::Integer => "Section",
            AddressType::Perek => "Chapter",
            AddressType::Pasuk => "Verse",
            AddressType::Mishnah => "Mishnah",
            AddressType::Talmud => "Daf",
            AddressType::Halakhah => "Halakhah",
            AddressType::Siman => "Siman",
            AddressType::Seif => "Seif",
            AddressType::SeifKatan => "Seif Katan",
            AddressType::Volume => "Volume",
        }
    }
}

fn daf_amud(n: u32) -> (u32, char) {
    let daf = n.div_ceil(2);
    let amud = if n % 2 == 1 { 'a' } else { 'b' };
    (daf, amud)
}

/// Pagination starts at daf 2.
fn daf_section(daf: u32, amud: Option<char>) -> Option<SectionValue> {
    if daf < 2 {
        return None;
    }
    let b = daf.checked_mul(2)?;
    let a = b - 1;
    Some(match amud {
        Some('a') => SectionValue::Single(a),
        Some(_) => SectionValue::Single(b),
        None => SectionValue::Span(a, b),
    })
}

fn decode_daf(lang: Lang, s: &str) -> Option<SectionValue> {
    match lang {
        Lang::En => {
            let caps = regex!(r"^(\d+)\s*([ab.:])?$").captures(s)?;
            let daf = ArabicNumeral.decode(caps.get(1)?.as_str())?;
            let amud = caps.get(2).map(|m| match m.as_str() {
                "a" | "." => 'a',
                _ => 'b',
            });
            daf_section(daf, amud)
        }
        Lang::He => {
            let caps = regex!(r#"^([א-ת'"]+?|\d+)\s*(?:(?:ע["']?|עמוד)\s*([אב])'?|([.:]))?$"#).captures(s)?;
            let number = caps.get(1)?.as_str();
            let daf = HebrewNumeral.decode(number).or_else(|| ArabicNumeral.decode(number))?;
            let amud = match (caps.get(2), caps.get(3)) {
                (Some(m), _) => Some(if m.as_str() == "א" { 'a' } else { 'b' }),
                (None, Some(m)) => Some(if m.as_str() == "." { 'a' } else { 'b' }),
                (None, None) => None,
            };
            daf_section(daf, amud)
        }
    }
}

fn clean_section_text(text: &str, lang: Lang) -> String {
    let folded: String = text
        .chars()
        .filter(|c| !is_nikkud(*c))
        .map(|c| match c {
            '\u{05F3}' | '\u{2018}' | '\u{2019}' => '\'',
            '\u{05F4}' | '\u{201C}' | '\u{201D}' => '"',
            _ => c,
        })
        .collect();
    let trimmed = folded.trim().trim_start_matches(['(', '[']).trim_end_matches([')', ']', ',', ';']).trim();
    match lang {
        Lang::En => trimmed.to_lowercase(),
        Lang::He => trimmed.to_string(),
    }
}
