//! Fuzzy dibur hamatchil lookup.
//!
//! A DH part is compared to every indexed lemma under the current container
//! ref. Scores:
//!
//! ```text
//! lemma starts with mention (or the reverse)   1.0
//! mention appears inside the lemma             0.9
//! words in order, small edit distance allowed  0.85 * matched / mention words
//! ```
//!
//! The mention's potential continuation (the words that follow it in the
//! document) is appended and tried longest first, so `שמא | יפשע וכו'` can
//! still find `שמא יפשע`.

use crate::library::dibur_hamatchil::DiburHamatchilIndex;
use crate::library::refs::Ref;
use crate::normalize::normalize_words;
use crate::raw_ref::RawRefPart;
use tracing::debug;

/// Words that introduce a lemma rather than belong to it.
const DH_MARKERS: &[&str] = &["ד\"ה", "בד\"ה", "וד\"ה", "דיבור", "המתחיל", "s.v", "s.v.", "sv"];

fn mention_words(text: &str) -> Vec<String> {
    let mut words = normalize_words(text);
    while words.first().is_some_and(|w| DH_MARKERS.contains(&w.as_str())) {
        words.remove(0);
    }
    words
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            row[j + 1] = substitution.min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

fn close(a: &str, b: &str) -> bool {
    let tolerance = match a.chars().count() {
        0..=3 => 0,
        4..=6 => 1,
        _ => 2,
    };
    edit_distance(a, b) <= tolerance
}

/// Score of `mention` against `lemma`, both as normalized words.
pub(crate) fn dh_score(mention: &[String], lemma: &[String]) -> f64 {
    if mention.is_empty() || lemma.is_empty() {
        return 0.0;
    }
    if lemma.starts_with(mention) || mention.starts_with(lemma) {
        return 1.0;
    }
    if lemma.len() > mention.len() && lemma.windows(mention.len()).any(|w| w == mention) {
        return 0.9;
    }
    let mut matched = 0;
    let mut next = 0;
    for word in mention {
        if let Some(offset) = lemma[next..].iter().position(|l| close(word, l)) {
            matched += 1;
            next += offset + 1;
        }
    }
    0.85 * matched as f64 / mention.len() as f64
}

/// Refs of the best-scoring lemmas under `container`, if any clears `threshold`.
pub(crate) fn match_dh(index: &DiburHamatchilIndex, container: &Ref, part: &RawRefPart, threshold: f64) -> Vec<Ref> {
    let base = mention_words(part.text());
    if base.is_empty() {
        return Vec::new();
    }
    let continuation = part.potential_dh_continuation.as_deref().map(normalize_words).unwrap_or_default();

    let lemmas: Vec<(Vec<String>, &Ref)> = index
        .within(container)
        .into_iter()
        .map(|node| (node.dibur_hamatchil.split(' ').map(str::to_string).collect(), &node.reference))
        .collect();

    for extra in (0..=continuation.len()).rev() {
        let mut candidate = base.clone();
        candidate.extend(continuation[..extra].iter().cloned());

        let scored: Vec<(f64, &Ref)> = lemmas.iter().map(|(lemma, r)| (dh_score(&candidate, lemma), *r)).collect();
        let best = scored.iter().map(|(s, _)| *s).fold(0.0, f64::max);
        if best < threshold {
            continue;
        }
        let mut out: Vec<Ref> = Vec::new();
        for (score, r) in scored {
            if score == best && !out.contains(r) {
                out.push(r.clone());
            }
        }
        debug!(mention = %candidate.join(" "), container = %container, best, hits = out.len(), "dibur hamatchil match");
        return out;
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        normalize_words(s)
    }

    #[test]
    fn scores_prefix_substring_and_fuzzy() {
        assert_eq!(dh_score(&words("שמא יפשע"), &words("שמא יפשע")), 1.0);
        assert_eq!(dh_score(&words("שמא יפשע וכו'"), &words("שמא יפשע")), 1.0);
        assert_eq!(dh_score(&words("יפשע"), &words("שמא יפשע")), 0.9);
        let fuzzy = dh_score(&words("שמא יפשיע"), &words("שמא יפשע"));
        assert!((0.8..0.9).contains(&fuzzy), "fuzzy score {fuzzy}");
        assert!(dh_score(&words("עירובי תבשילין"), &words("שמא יפשע")) < 0.8);
    }

    #[test]
    fn strips_dh_markers() {
        assert_eq!(mention_words("ד\"ה שמא יפשע"), words("שמא יפשע"));
        assert_eq!(mention_words("s.v. ve-rav huna"), words("ve-rav huna"));
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("יפשע", "יפשיע"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }
}
