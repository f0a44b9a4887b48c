//! Text normalization with character-index mapping.
//!
//! Titles, terms and mentions are compared in a normalized form: cantillation and
//! vowel points removed, the many geresh/gershayim look-alikes folded onto ASCII
//! `'` and `"`, Latin text lowercased. Normalizing changes character offsets, so
//! [`NormalizedText`] keeps a per-character map back to the original text and
//! [`NormalizedText::map_new_indices`] translates spans found in normalized text
//! back onto the source document.

/// A single rewrite applied by a [`TextNormalizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStep {
    /// Drop Hebrew cantillation marks and vowel points (U+0591..U+05C7).
    StripNikkud,
    /// Fold geresh/gershayim and typographic quotes to `'` / `"`, maqaf to space.
    UnifyQuotes,
    /// Lowercase (no-op for Hebrew).
    Lowercase,
    /// Collapse whitespace runs to a single space.
    CollapseWhitespace,
}

/// An ordered list of normalization steps.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    steps: Vec<NormalizeStep>,
}

/// Normalized text plus the map back to the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    /// `origin[i]` is the original char index of normalized char `i`; the final
    /// entry is the original length so exclusive ends map cleanly.
    origin: Vec<usize>,
}

impl TextNormalizer {
    pub fn new(steps: &[NormalizeStep]) -> Self {
        Self { steps: steps.to_vec() }
    }

    /// The normalizer used for every title and mention key.
    pub fn for_matching() -> Self {
        Self::new(&[
            NormalizeStep::StripNikkud,
            NormalizeStep::UnifyQuotes,
            NormalizeStep::Lowercase,
            NormalizeStep::CollapseWhitespace,
        ])
    }

    /// No-op normalizer.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn normalize(&self, input: &str) -> NormalizedText {
        let mut chars: Vec<(char, usize)> = input.chars().enumerate().map(|(i, c)| (c, i)).collect();
        let original_len = chars.len();

        for step in &self.steps {
            chars = match step {
                NormalizeStep::StripNikkud => chars.into_iter().filter(|(c, _)| !is_nikkud(*c)).collect(),
                NormalizeStep::UnifyQuotes => chars.into_iter().map(|(c, i)| (unify_quote(c), i)).collect(),
                NormalizeStep::Lowercase => chars
                    .into_iter()
                    .flat_map(|(c, i)| {
                        let mut lower = c.to_lowercase();
                        // Multi-char lowercasings are rare; keep only the first to preserve the map.
                        lower.next().map(|l| (l, i))
                    })
                    .collect(),
                NormalizeStep::CollapseWhitespace => {
                    let mut out: Vec<(char, usize)> = Vec::with_capacity(chars.len());
                    for (c, i) in chars {
                        if c.is_whitespace() {
                            if out.last().is_some_and(|(prev, _)| *prev == ' ') {
                                continue;
                            }
                            out.push((' ', i));
                        } else {
                            out.push((c, i));
                        }
                    }
                    out
                }
            };
        }

        let text = chars.iter().map(|(c, _)| *c).collect();
        let mut origin: Vec<usize> = chars.into_iter().map(|(_, i)| i).collect();
        origin.push(original_len);
        NormalizedText { text, origin }
    }
}

impl NormalizedText {
    /// Map `(start, end)` ranges over the normalized text back to the original.
    ///
    /// Ends are exclusive; an end maps to one past the original index of the last
    /// normalized char in the range, so stripped marks inside a word stay inside
    /// the mapped span.
    pub fn map_new_indices(&self, indices: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let last = self.char_len();
        indices
            .iter()
            .map(|&(start, end)| {
                let start = start.min(last);
                let end = end.min(last);
                let orig_start = self.origin[start];
                let orig_end = if end > start { self.origin[end - 1] + 1 } else { orig_start };
                (orig_start, orig_end)
            })
            .collect()
    }

    pub fn char_len(&self) -> usize {
        self.origin.len() - 1
    }
}

pub(crate) fn is_nikkud(c: char) -> bool {
    ('\u{0591}'..='\u{05C7}').contains(&c) && c != '\u{05BE}' && c != '\u{05C0}' && c != '\u{05C3}' && c != '\u{05C6}'
}

fn unify_quote(c: char) -> char {
    match c {
        '\u{05F3}' | '\u{2018}' | '\u{2019}' | '`' | '\u{00B4}' => '\'',
        '\u{05F4}' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
        '\u{05BE}' => ' ',
        _ => c,
    }
}

/// Normalize a single title or mention word for trie lookup.
///
/// Surrounding punctuation is trimmed but quote marks inside or trailing a word
/// survive, since they carry meaning in abbreviations like `רש"י` and `תוס'`.
pub fn normalize_word(word: &str) -> String {
    let normalized = TextNormalizer::for_matching().normalize(word).text;
    normalized
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '(' | ')' | '[' | ']' | '!' | '?'))
        .trim_start_matches(['\'', '"'])
        .to_string()
}

/// Normalize a title or phrase into lookup words.
pub fn normalize_words(text: &str) -> Vec<String> {
    TextNormalizer::for_matching()
        .normalize(text)
        .text
        .split(' ')
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nikkud_and_maps_back() {
        let input = "בְּרֵאשִׁית א";
        let normalized = TextNormalizer::for_matching().normalize(input);
        assert_eq!(normalized.text, "בראשית א");

        // "א" is the last normalized char; it maps to the last original char.
        let mapped = normalized.map_new_indices(&[(7, 8)]);
        assert_eq!(mapped, vec![(12, 13)]);
        // The whole word keeps its inner vowel marks.
        assert_eq!(normalized.map_new_indices(&[(0, 6)]), vec![(0, 11)]);
    }

    #[test]
    fn identity_normalization_maps_indices_to_themselves() {
        let input = "Rashi on Genesis 1:1";
        let normalized = TextNormalizer::identity().normalize(input);
        assert_eq!(normalized.text, input);

        let indices = [(0, 5), (9, 16), (17, 20), (3, 3)];
        let once = normalized.map_new_indices(&indices);
        assert_eq!(once, indices.to_vec());
        assert_eq!(normalized.map_new_indices(&once), once);
    }

    #[test]
    fn folds_quote_variants() {
        assert_eq!(normalize_word("רש״י"), "רש\"י");
        assert_eq!(normalize_word("תוס׳"), "תוס'");
        assert_eq!(normalize_word("(Ex.)"), "ex");
    }

    #[test]
    fn collapse_whitespace_keeps_first_position() {
        let normalized = TextNormalizer::new(&[NormalizeStep::CollapseWhitespace]).normalize("a   b");
        assert_eq!(normalized.text, "a b");
        assert_eq!(normalized.map_new_indices(&[(2, 3)]), vec![(4, 5)]);
    }

    #[test]
    fn normalize_words_splits_maqaf() {
        assert_eq!(normalize_words("בין־השמשות"), vec!["בין", "השמשות"]);
    }
}
