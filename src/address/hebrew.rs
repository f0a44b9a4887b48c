//! Hebrew prefix handling.
//!
//! Hebrew attaches conjunctions and prepositions directly to the following word:
//! `בביצה` is "in Beitzah", `ותוס'` is "and Tosafot", `דכ"ז` is "of 27". Title and
//! number lookups try the word as written first and then each prefix-stripped
//! variant.

/// One- to three-letter prefixes, longest first.
const PREFIXES: &[&str] = &[
    "לכש", "וכש", "ושב", "ושה", "כש", "מש", "שב", "של", "שה", "שמ", "דב", "דה", "דל", "בה", "לה", "מה", "וב", "וד",
    "וה", "וכ", "ול", "ומ", "וש", "ו", "ב", "ד", "ה", "כ", "ל", "מ", "ש",
];

/// `word` followed by every variant with a known prefix removed.
///
/// Variants that would leave fewer than two letters are skipped so that a bare
/// letter is never produced from a longer word.
pub fn prefix_variants(word: &str) -> Vec<&str> {
    let mut variants = vec![word];
    for prefix in PREFIXES {
        if let Some(rest) = word.strip_prefix(prefix) {
            let letters = rest.chars().filter(|c| c.is_alphabetic()).count();
            if letters >= 2 && !variants.contains(&rest) {
                variants.push(rest);
            }
        }
    }
    variants
}

pub fn is_hebrew(text: &str) -> bool {
    text.chars().any(|c| ('\u{05D0}'..='\u{05EA}').contains(&c))
}
