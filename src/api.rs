use crate::engine::{ContextType, IbidHistory, MentionResult, Resolution, Resolver, RunResult};
use crate::error::ResolutionError;
use crate::library::Library;
use crate::library::refs::Ref;
use crate::{Lang, RawRef};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// How hard refinement searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionThoroughness {
    /// Alt structs are only tried when the numbered levels consumed nothing.
    #[default]
    Normal,
    /// Alt structs are always tried, and titles may start at any word of a part.
    High,
}

/// Options that affect resolution behavior.
///
/// Deserializable so a caller can keep them in a JSON config; missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub thoroughness: ResolutionThoroughness,
    /// Books the ibid history remembers.
    pub ibid_history_size: usize,
    /// Lowest dibur hamatchil score accepted.
    pub dh_match_threshold: f64,
    /// Matches refinement may expand for one raw ref piece.
    pub max_refinement_steps: usize,
    /// Start each document of a batch with an empty ibid history.
    pub reset_ibids_every_context_ref: bool,
    /// Keep unresolved mentions in batch output (with no resolutions).
    pub with_failures: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            thoroughness: ResolutionThoroughness::Normal,
            ibid_history_size: 3,
            dh_match_threshold: 0.8,
            max_refinement_steps: 10_000,
            reset_ibids_every_context_ref: true,
            with_failures: false,
        }
    }
}

/// A resolution flattened for output.
///
/// `char_indices` and `part_spans` are character offsets into the mention's
/// document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedRef {
    pub text: String,
    pub char_indices: (usize, usize),
    /// Normal forms; more than one when ambiguous.
    pub refs: Vec<String>,
    pub ambiguous: bool,
    pub context_ref: Option<String>,
    pub context_type: Option<ContextType>,
    /// Spans of the parts the (first) reading consumed.
    pub part_spans: Vec<(usize, usize)>,
}

impl LinkedRef {
    pub fn from_resolution(resolution: &Resolution) -> Option<Self> {
        let first = resolution.readings().first()?;
        Some(Self {
            text: first.raw_ref.text().to_string(),
            char_indices: first.raw_ref.span().char_indices(),
            refs: resolution.refs().iter().map(|r| r.normal()).collect(),
            ambiguous: resolution.is_ambiguous(),
            context_ref: first.context_ref.as_ref().map(Ref::normal),
            context_type: first.context_type,
            part_spans: first.part_spans().iter().map(|s| s.char_indices()).collect(),
        })
    }
}

/// The linker: a shared library plus options.
///
/// Cheap to clone; the library is behind an `Arc` and never mutated.
#[derive(Debug, Clone)]
pub struct Linker {
    library: Arc<Library>,
    options: Options,
}

impl Linker {
    pub fn new(library: Arc<Library>, options: Options) -> Self {
        Self { library, options }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// An empty history sized by `Options::ibid_history_size`.
    pub fn new_ibid_history(&self) -> IbidHistory {
        IbidHistory::new(self.options.ibid_history_size)
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.library, &self.options)
    }

    /// Resolve one raw ref with no ibid history.
    ///
    /// No match is `Ok(vec![])`; a raw ref with no parts is an error.
    pub fn resolve_raw_ref(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw_ref: &RawRef,
    ) -> Result<Vec<Resolution>, ResolutionError> {
        self.resolver().resolve_raw_ref(lang, context_ref, raw_ref, &self.new_ibid_history())
    }

    /// Resolve one raw ref against the caller's ibid history (left unchanged).
    pub fn resolve_with_history(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw_ref: &RawRef,
        ibid: &IbidHistory,
    ) -> Result<Vec<Resolution>, ResolutionError> {
        self.resolver().resolve_raw_ref(lang, context_ref, raw_ref, ibid)
    }

    /// Resolve one raw ref and keep every candidate reading plus run counters.
    pub fn resolve_verbose(
        &self,
        lang: Lang,
        context_ref: Option<&Ref>,
        raw_ref: &RawRef,
        ibid: &IbidHistory,
    ) -> Result<RunResult, ResolutionError> {
        self.resolver().run(lang, context_ref, raw_ref, ibid)
    }

    /// Resolve the raw refs of each document inside its context ref, recording
    /// unambiguous results into `ibid` as it goes.
    pub fn bulk_resolve_refs(
        &self,
        lang: Lang,
        context_refs: &[Option<Ref>],
        raw_refs: &[Vec<RawRef>],
        ibid: &mut IbidHistory,
    ) -> Vec<Vec<MentionResult>> {
        self.resolver().bulk_resolve_refs(lang, context_refs, raw_refs, ibid)
    }

    /// [`bulk_resolve_refs`](Self::bulk_resolve_refs) over `workers` threads.
    ///
    /// Documents are split into contiguous chunks, one per worker, each with
    /// its own ibid history. Output keeps document order.
    pub fn bulk_resolve_parallel(
        &self,
        lang: Lang,
        context_refs: &[Option<Ref>],
        raw_refs: &[Vec<RawRef>],
        workers: usize,
    ) -> Vec<Vec<MentionResult>> {
        let chunk = raw_refs.len().div_ceil(workers.max(1)).max(1);
        std::thread::scope(|scope| {
            let handles: Vec<_> = context_refs
                .chunks(chunk)
                .zip(raw_refs.chunks(chunk))
                .map(|(contexts, docs)| {
                    let handle = scope.spawn(move || {
                        let mut ibid = self.new_ibid_history();
                        self.bulk_resolve_refs(lang, contexts, docs, &mut ibid)
                    });
                    (docs.len(), handle)
                })
                .collect();

            let mut out = Vec::with_capacity(raw_refs.len());
            for (docs, handle) in handles {
                match handle.join() {
                    Ok(results) => out.extend(results),
                    Err(_) => {
                        warn!(documents = docs, "resolution worker panicked; leaving its documents empty");
                        out.extend(std::iter::repeat_with(Vec::new).take(docs));
                    }
                }
            }
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linker() -> Linker {
        Linker::new(Library::sample(), Options::default())
    }

    #[test]
    fn options_fill_missing_fields_with_defaults() {
        let options: Options = serde_json::from_str(r#"{"thoroughness": "high", "ibid_history_size": 1}"#).unwrap();
        assert_eq!(options.thoroughness, ResolutionThoroughness::High);
        assert_eq!(options.ibid_history_size, 1);
        assert_eq!(options.max_refinement_steps, 10_000);
        assert!(options.reset_ibids_every_context_ref);
    }

    #[test]
    fn resolve_raw_ref_returns_resolutions() {
        let res = linker().resolve_raw_ref(Lang::En, None, &raw_ref!(en, "@Genesis #1:#3")).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].refs()[0].normal(), "Genesis 1:3");
    }

    #[test]
    fn linked_ref_serializes_spans_and_context() {
        let linker = linker();
        let context = linker.library().parse_ref("Genesis 1:1").unwrap();
        let res = linker.resolve_raw_ref(Lang::He, Some(&context), &raw_ref!(he, "<לקמן #פרק ב")).unwrap();
        let linked = LinkedRef::from_resolution(&res[0]).unwrap();

        assert_eq!(linked.refs, vec!["Genesis 2"]);
        assert_eq!(linked.text, "לקמן פרק ב");
        assert_eq!(linked.char_indices, (0, 10));
        assert_eq!(linked.part_spans, vec![(0, 4), (5, 10)]);
        assert_eq!(linked.context_type, Some(ContextType::CurrentBook));

        let json = serde_json::to_value(&linked).unwrap();
        assert_eq!(json["refs"][0], "Genesis 2");
        assert_eq!(json["context_type"], "current_book");
        assert_eq!(json["ambiguous"], false);
    }

    #[test]
    fn parallel_bulk_matches_sequential() {
        let linker = linker();
        let lib = linker.library();
        let contexts = vec![None, Some(lib.parse_ref("Berakhot 2a").unwrap()), None];
        let docs = vec![
            vec![raw_ref!(he, "@בראשית #א:#א"), raw_ref!(he, "&שם")],
            vec![raw_ref!(he, "<לקמן #דף כז")],
            vec![raw_ref!(he, "@שמות #ט:#ו~,#ה"), raw_ref!(he, "@פלוני #ג")],
        ];

        let mut ibid = linker.new_ibid_history();
        let sequential = linker.bulk_resolve_refs(Lang::He, &contexts, &docs, &mut ibid);
        let parallel = linker.bulk_resolve_parallel(Lang::He, &contexts, &docs, 2);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 3);
        assert_eq!(sequential[0].len(), 2);
        assert_eq!(sequential[2].len(), 1, "unresolved mentions are dropped without with_failures");
    }
}
