//! Document and span model.
//!
//! An [`NeDoc`] owns the text of a document. An [`NeSpan`] is a cheap view into a
//! doc: a shared handle plus a character range and an optional label. Spans never
//! own text and compare by `(text, start, end, label)`, so two spans over
//! identical text compare equal even when they come from different `NeDoc`s.
//!
//! Offsets are *character* offsets, not bytes: Hebrew is multi-byte in UTF-8 and
//! downstream consumers render links by character position.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A document: the full text that spans slice into.
#[derive(Debug, Clone)]
pub struct NeDoc {
    text: Arc<str>,
    char_len: usize,
}

impl NeDoc {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self { text, char_len }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// A span over `start..end` (character offsets).
    pub fn span(&self, start: usize, end: usize) -> NeSpan {
        NeSpan { doc: self.clone(), start, end, label: None }
    }

    /// A span covering the whole document.
    pub fn whole(&self) -> NeSpan {
        self.span(0, self.char_len)
    }
}

/// A labelled character range over an [`NeDoc`].
#[derive(Debug, Clone)]
pub struct NeSpan {
    doc: NeDoc,
    start: usize,
    end: usize,
    label: Option<Arc<str>>,
}

impl NeSpan {
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn doc(&self) -> &NeDoc {
        &self.doc
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// `(start, end)` in characters, as consumed by link renderers.
    pub fn char_indices(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// True when both ends fall inside the document.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end && self.end <= self.doc.len()
    }

    /// The text this span covers. Out-of-range spans yield the clamped slice.
    pub fn text(&self) -> &str {
        let text = self.doc.text();
        let start = byte_offset(text, self.start);
        let end = byte_offset(text, self.end).max(start);
        &text[start..end]
    }

    /// A span relative to this one: `start..end` are character offsets into
    /// `self.text()`.
    pub fn subspan(&self, start: usize, end: usize) -> NeSpan {
        let len = self.end.saturating_sub(self.start);
        NeSpan {
            doc: self.doc.clone(),
            start: self.start + start.min(len),
            end: self.start + end.min(len),
            label: self.label.clone(),
        }
    }

    /// Smallest span covering both `self` and `other` (same doc assumed).
    pub fn union(&self, other: &NeSpan) -> NeSpan {
        NeSpan {
            doc: self.doc.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            label: self.label.clone(),
        }
    }

    /// Character ranges of whitespace-separated words, relative to this span.
    pub fn word_ranges(&self) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let mut word_start = None;
        let mut idx = 0;
        for c in self.text().chars() {
            match (c.is_whitespace(), word_start) {
                (true, Some(s)) => {
                    ranges.push((s, idx));
                    word_start = None;
                }
                (false, None) => word_start = Some(idx),
                _ => {}
            }
            idx += 1;
        }
        if let Some(s) = word_start {
            ranges.push((s, idx));
        }
        ranges
    }
}

impl PartialEq for NeSpan {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.label == other.label
            && (Arc::ptr_eq(&self.doc.text, &other.doc.text) || self.doc.text == other.doc.text)
    }
}

impl Eq for NeSpan {}

impl Hash for NeSpan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc.text.hash(state);
        self.start.hash(state);
        self.end.hash(state);
        self.label.hash(state);
    }
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices().nth(char_idx).map(|(b, _)| b).unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn span_text_uses_character_offsets() {
        let doc = NeDoc::new("רש\"י על ביצה");
        let span = doc.span(5, 7);
        assert_eq!(span.text(), "על");
        assert_eq!(span.char_indices(), (5, 7));
    }

    #[test]
    fn spans_over_equal_text_are_identical_across_docs() {
        let a = NeDoc::new("Genesis 1:1").span(0, 7);
        let b = NeDoc::new("Genesis 1:1").span(0, 7);
        assert_eq!(a, b);

        let set: HashSet<NeSpan> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn label_participates_in_equality() {
        let doc = NeDoc::new("Genesis");
        assert_ne!(doc.span(0, 7), doc.span(0, 7).with_label("citation"));
    }

    #[test]
    fn subspan_is_relative_and_clamped() {
        let doc = NeDoc::new("see Exodus 9:6");
        let span = doc.span(4, 14);
        let sub = span.subspan(7, 40);
        assert_eq!(sub.text(), "9:6");
        assert_eq!(sub.char_indices(), (11, 14));
    }

    #[test]
    fn word_ranges_skip_whitespace_runs() {
        let doc = NeDoc::new("פרק  יום טוב");
        assert_eq!(doc.whole().word_ranges(), vec![(0, 3), (5, 8), (9, 12)]);
    }
}
