//! Raw reference parts: a citation mention as it appears in text.
//!
//! A [`RawRef`] is one candidate citation: an ordered list of typed parts, each
//! pointing at its own span of the document. Parts are produced upstream (by a
//! tagger, or by [`RawRef::from_notation`] in tests and the CLI) and are never
//! edited afterwards, with one exception made at construction time: runs of the
//! form `NUMBERED+ RANGE_SYMBOL NUMBERED+` are grouped into a single
//! [`RangedRawRefParts`].
//!
//! ```text
//! בראשית   א    :א    -    ב
//!  @Named #Num #Num ^Sym #Num
//!                 └──── group ────┘
//! @Named  Range{ sections: [א, א], to_sections: [א (copied), ב] }
//! ```

use crate::Lang;
use crate::doc::{NeDoc, NeSpan};
use crate::error::ResolutionError;
use crate::normalize::{TextNormalizer, normalize_word};

/// Kind of a raw reference part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartType {
    /// A title word or phrase (`רש"י`, `Exodus`, `פרק יום טוב`).
    Named,
    /// A single section number, possibly with a section name (`פרק יד`).
    Numbered,
    /// A dibur hamatchil: the opening words of a commentary segment.
    Dh,
    /// A grouped range; only ever produced by range grouping.
    Range,
    /// The symbol joining the two sides of a range (`-`, `עד`).
    RangeSymbol,
    /// Ibid (`שם`, `ibid`).
    Ibid,
    /// Relative reference into the current book (`לקמן`, `לעיל`, `above`).
    Relative,
    /// Separator between non-contiguous references (`9:6,5`).
    NonCts,
}

impl PartType {
    fn from_sigil(c: char) -> Option<Self> {
        let t = match c {
            '@' => PartType::Named,
            '#' => PartType::Numbered,
            '*' => PartType::Dh,
            '^' => PartType::RangeSymbol,
            '&' => PartType::Ibid,
            '<' => PartType::Relative,
            '~' => PartType::NonCts,
            _ => return None,
        };
        Some(t)
    }
}

/// One normalized word of a part with its character range relative to the part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartWord {
    pub text: String,
    pub range: (usize, usize),
}

/// A single typed part of a raw reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRefPart {
    pub part_type: PartType,
    pub span: NeSpan,
    /// Text right after a DH part that may belong to the same opening phrase.
    pub potential_dh_continuation: Option<String>,
}

impl RawRefPart {
    pub fn new(part_type: PartType, span: NeSpan) -> Self {
        Self { part_type, span, potential_dh_continuation: None }
    }

    pub fn with_dh_continuation(mut self, continuation: impl Into<String>) -> Self {
        self.potential_dh_continuation = Some(continuation.into());
        self
    }

    pub fn text(&self) -> &str {
        self.span.text()
    }

    /// Normalized text, used as the lookup key.
    pub fn key(&self) -> String {
        TextNormalizer::for_matching().normalize(self.text()).text.trim().to_string()
    }

    /// Normalized words, each tied back to its character range in the part.
    ///
    /// A raw word that normalizes into several (maqaf-joined words) yields several
    /// entries sharing the same range.
    pub fn words(&self) -> Vec<PartWord> {
        let text = self.text();
        let mut out = Vec::new();
        for (start, end) in self.span.word_ranges() {
            let raw: String = text.chars().skip(start).take(end - start).collect();
            let normalized = TextNormalizer::for_matching().normalize(&raw).text;
            for piece in normalized.split(' ') {
                let word = normalize_word(piece);
                if !word.is_empty() {
                    out.push(PartWord { text: word, range: (start, end) });
                }
            }
        }
        out
    }
}

/// A range: section parts and the to-section parts they run to.
///
/// `to_sections` is left-padded with the leading section parts so both sides
/// have the same length (`א:א-ב` runs to `א:ב`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangedRawRefParts {
    pub sections: Vec<RawRefPart>,
    pub to_sections: Vec<RawRefPart>,
    pub span: NeSpan,
}

impl RangedRawRefParts {
    pub fn new(sections: Vec<RawRefPart>, to_sections: Vec<RawRefPart>) -> Option<Self> {
        let first = sections.first()?;
        let last = to_sections.last()?;
        let span = first.span.union(&last.span);
        let mut padded = sections[..sections.len().saturating_sub(to_sections.len())].to_vec();
        padded.extend(to_sections);
        Some(Self { sections, to_sections: padded, span })
    }
}

/// A part as stored in a [`RawRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefPart {
    Single(RawRefPart),
    Ranged(RangedRawRefParts),
}

impl RefPart {
    pub fn part_type(&self) -> PartType {
        match self {
            RefPart::Single(p) => p.part_type,
            RefPart::Ranged(_) => PartType::Range,
        }
    }

    pub fn span(&self) -> &NeSpan {
        match self {
            RefPart::Single(p) => &p.span,
            RefPart::Ranged(r) => &r.span,
        }
    }

    pub fn text(&self) -> &str {
        self.span().text()
    }

    pub fn as_single(&self) -> Option<&RawRefPart> {
        match self {
            RefPart::Single(p) => Some(p),
            RefPart::Ranged(_) => None,
        }
    }

    pub fn as_ranged(&self) -> Option<&RangedRawRefParts> {
        match self {
            RefPart::Single(_) => None,
            RefPart::Ranged(r) => Some(r),
        }
    }
}

/// One candidate citation found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRef {
    pub lang: Lang,
    parts: Vec<RefPart>,
    span: NeSpan,
}

impl RawRef {
    /// Build a raw ref from its parts; ranged parts are grouped here.
    ///
    /// An empty part list is accepted: the resolver reports it as an error so
    /// that a batch can log and skip it.
    pub fn new(lang: Lang, parts: Vec<RawRefPart>, span: NeSpan) -> Result<Self, ResolutionError> {
        for part in &parts {
            if !part.span.is_valid() {
                let (start, end) = part.span.char_indices();
                return Err(ResolutionError::SpanOutOfBounds { start, end, len: part.span.doc().len() });
            }
        }
        Ok(Self { lang, parts: group_ranged_parts(parts), span })
    }

    /// Build a raw ref from `(type, start, end)` character ranges over `doc`.
    pub fn from_spans(lang: Lang, doc: &NeDoc, parts: &[(PartType, usize, usize)]) -> Result<Self, ResolutionError> {
        let raw_parts: Vec<RawRefPart> =
            parts.iter().map(|&(t, start, end)| RawRefPart::new(t, doc.span(start, end))).collect();
        let span = match (parts.first(), parts.last()) {
            (Some(first), Some(last)) => doc.span(first.1, last.2),
            _ => doc.span(0, 0),
        };
        Self::new(lang, raw_parts, span)
    }

    /// Parse mention notation: a sigil opens each part and the document text is
    /// the notation with the sigils removed.
    ///
    /// Sigils: `@` named, `#` numbered, `*` dibur hamatchil, `^` range symbol,
    /// `&` ibid, `<` relative, `~` non-contiguous separator. Text after a `|`
    /// follows the mention in the document; a trailing DH part takes it as its
    /// potential continuation.
    ///
    /// ```text
    /// "@Exodus #9:#6~,#5"  ->  doc "Exodus 9:6,5"
    ///                          parts [Named "Exodus", Numbered "9:", Numbered "6", NonCts ",", Numbered "5"]
    /// ```
    pub fn from_notation(lang: Lang, notation: &str) -> Result<Self, ResolutionError> {
        let (mention, trailing) = match notation.split_once('|') {
            Some((m, t)) => (m, Some(t)),
            None => (notation, None),
        };

        let mut doc_text = String::new();
        let mut doc_len = 0;
        // (type, start, end) with `end` advanced as text is appended.
        let mut raw_parts: Vec<(PartType, usize, usize)> = Vec::new();
        for c in mention.chars() {
            if let Some(t) = PartType::from_sigil(c) {
                raw_parts.push((t, doc_len, doc_len));
                continue;
            }
            doc_text.push(c);
            doc_len += 1;
            if let Some(last) = raw_parts.last_mut() {
                last.2 = doc_len;
            }
        }
        if let Some(t) = trailing {
            doc_text.push_str(t);
        }

        let chars: Vec<char> = doc_text.chars().collect();
        let mut trimmed = Vec::with_capacity(raw_parts.len());
        for (t, mut start, mut end) in raw_parts {
            while start < end && chars[start].is_whitespace() {
                start += 1;
            }
            while end > start && chars[end - 1].is_whitespace() {
                end -= 1;
            }
            if start == end {
                return Err(ResolutionError::InvalidNotation(notation.to_string()));
            }
            trimmed.push((t, start, end));
        }

        let doc = NeDoc::new(doc_text.as_str());
        let mut raw_ref = Self::from_spans(lang, &doc, &trimmed)?;
        if let Some(continuation) = trailing.map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(RefPart::Single(last)) = raw_ref.parts.last_mut() {
                if last.part_type == PartType::Dh {
                    last.potential_dh_continuation = Some(continuation.to_string());
                }
            }
        }
        Ok(raw_ref)
    }

    pub fn parts(&self) -> &[RefPart] {
        &self.parts
    }

    pub fn span(&self) -> &NeSpan {
        &self.span
    }

    pub fn text(&self) -> &str {
        self.span.text()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Split on non-contiguous separators: `Exodus 9:6,5` becomes `Exodus 9:6`
    /// and `5`. The pieces keep written order; the resolver lets later pieces
    /// inherit the earlier piece's upper sections.
    pub fn split_non_cts(&self) -> Vec<RawRef> {
        if !self.parts.iter().any(|p| p.part_type() == PartType::NonCts) {
            return vec![self.clone()];
        }
        let mut pieces = Vec::new();
        let mut current: Vec<RefPart> = Vec::new();
        let flush = |current: &mut Vec<RefPart>, pieces: &mut Vec<RawRef>| {
            if let (Some(first), Some(last)) = (current.first(), current.last()) {
                let span = first.span().union(last.span());
                pieces.push(RawRef { lang: self.lang, parts: std::mem::take(current), span });
            }
        };
        for part in &self.parts {
            if part.part_type() == PartType::NonCts {
                flush(&mut current, &mut pieces);
            } else {
                current.push(part.clone());
            }
        }
        flush(&mut current, &mut pieces);
        pieces
    }
}

/// Collapse `NUMBERED+ RANGE_SYMBOL NUMBERED+` runs into ranged parts.
pub fn group_ranged_parts(parts: Vec<RawRefPart>) -> Vec<RefPart> {
    let mut out: Vec<RefPart> = Vec::with_capacity(parts.len());
    let mut i = 0;
    while i < parts.len() {
        let is_range_symbol = parts[i].part_type == PartType::RangeSymbol;
        let numbered_before = out.last().is_some_and(|p| p.part_type() == PartType::Numbered);
        let numbered_after = parts.get(i + 1).is_some_and(|p| p.part_type == PartType::Numbered);
        if !(is_range_symbol && numbered_before && numbered_after) {
            out.push(RefPart::Single(parts[i].clone()));
            i += 1;
            continue;
        }

        let mut sections = Vec::new();
        while let Some(RefPart::Single(p)) = out.last() {
            if p.part_type != PartType::Numbered {
                break;
            }
            sections.push(p.clone());
            out.pop();
        }
        sections.reverse();

        let mut to_sections = Vec::new();
        let mut j = i + 1;
        while j < parts.len() && parts[j].part_type == PartType::Numbered {
            to_sections.push(parts[j].clone());
            j += 1;
        }

        match RangedRawRefParts::new(sections.clone(), to_sections) {
            Some(ranged) => out.push(RefPart::Ranged(ranged)),
            None => out.extend(sections.into_iter().map(RefPart::Single)),
        }
        i = j;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(parts: &[RawRefPart]) -> Vec<&str> {
        parts.iter().map(|p| p.text()).collect()
    }

    #[test]
    fn notation_builds_exact_spans() {
        let raw = RawRef::from_notation(Lang::En, "@Exodus #9:#6~,#5").unwrap();
        assert_eq!(raw.text(), "Exodus 9:6,5");
        let got: Vec<(PartType, &str)> = raw.parts().iter().map(|p| (p.part_type(), p.text())).collect();
        assert_eq!(
            got,
            vec![
                (PartType::Named, "Exodus"),
                (PartType::Numbered, "9:"),
                (PartType::Numbered, "6"),
                (PartType::NonCts, ","),
                (PartType::Numbered, "5"),
            ]
        );
    }

    #[test]
    fn part_text_round_trips_through_span() {
        let raw = RawRef::from_notation(Lang::He, "@רש\"י @פרק יום טוב @בביצה").unwrap();
        let doc_text = raw.span().doc().text().to_string();
        for part in raw.parts() {
            let (start, end) = part.span().char_indices();
            let slice: String = doc_text.chars().skip(start).take(end - start).collect();
            assert_eq!(part.text(), slice);
        }
    }

    #[test]
    fn groups_range_with_inherited_chapter() {
        let raw = RawRef::from_notation(Lang::He, "@בראשית #א:#א^-#ב").unwrap();
        assert_eq!(raw.parts().len(), 2);
        let ranged = raw.parts()[1].as_ranged().expect("ranged part");
        assert_eq!(texts(&ranged.sections), vec!["א:", "א"]);
        assert_eq!(texts(&ranged.to_sections), vec!["א:", "ב"]);
        assert_eq!(ranged.span.text(), "א:א-ב");
    }

    #[test]
    fn groups_named_sections_in_range() {
        let raw = RawRef::from_notation(Lang::He, "@דברים #פרק יד #פסוקים מ^-#מה").unwrap();
        let ranged = raw.parts()[1].as_ranged().expect("ranged part");
        assert_eq!(texts(&ranged.sections), vec!["פרק יד", "פסוקים מ"]);
        assert_eq!(texts(&ranged.to_sections), vec!["פרק יד", "מה"]);
    }

    #[test]
    fn range_symbol_without_numbers_is_left_alone() {
        let raw = RawRef::from_notation(Lang::En, "@Genesis ^- #3").unwrap();
        assert_eq!(raw.parts().len(), 3);
        assert_eq!(raw.parts()[1].part_type(), PartType::RangeSymbol);
    }

    #[test]
    fn splits_non_contiguous_parts() {
        let raw = RawRef::from_notation(Lang::En, "@Exodus #9:#6~,#5").unwrap();
        let pieces = raw.split_non_cts();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].text(), "Exodus 9:6");
        assert_eq!(pieces[1].text(), "5");
    }

    #[test]
    fn trailing_text_becomes_dh_continuation() {
        let raw = RawRef::from_notation(Lang::He, "@רש\"י *שמא יפשע| וכו'").unwrap();
        let dh = raw.parts()[1].as_single().unwrap();
        assert_eq!(dh.text(), "שמא יפשע");
        assert_eq!(dh.potential_dh_continuation.as_deref(), Some("וכו'"));
        assert_eq!(raw.text(), "רש\"י שמא יפשע");
    }

    #[test]
    fn empty_part_is_rejected() {
        assert!(matches!(RawRef::from_notation(Lang::En, "@Genesis #"), Err(ResolutionError::InvalidNotation(_))));
    }

    #[test]
    fn words_keep_char_ranges() {
        let raw = RawRef::from_notation(Lang::He, "@פרק  יום טוב").unwrap();
        let words = raw.parts()[0].as_single().unwrap().words();
        let got: Vec<(&str, (usize, usize))> = words.iter().map(|w| (w.text.as_str(), w.range)).collect();
        assert_eq!(got, vec![("פרק", (0, 3)), ("יום", (5, 8)), ("טוב", (9, 12))]);
    }
}
