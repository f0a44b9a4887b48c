use super::{ContextType, IbidHistory, Resolution, Resolver};
use crate::doc::NeDoc;
use crate::error::ResolutionError;
use crate::library::Library;
use crate::{Lang, Options, RawRef, ResolutionThoroughness};
use std::sync::Arc;

fn library() -> Arc<Library> {
    Library::sample()
}

/// One string per resolution; ambiguous readings sorted and joined by ` | `.
fn render(resolutions: &[Resolution]) -> Vec<String> {
    resolutions
        .iter()
        .map(|r| {
            let mut refs: Vec<String> = r.refs().iter().map(|r| r.normal()).collect();
            refs.sort();
            refs.join(" | ")
        })
        .collect()
}

fn resolve(lang: Lang, notation: &str, context: Option<&str>) -> Vec<String> {
    let lib = library();
    let options = Options::default();
    let context_ref = context.map(|c| lib.parse_ref(c).unwrap_or_else(|e| panic!("context '{c}': {e}")));
    let raw = RawRef::from_notation(lang, notation).unwrap();
    let resolutions = Resolver::new(&lib, &options)
        .resolve_raw_ref(lang, context_ref.as_ref(), &raw, &IbidHistory::new(options.ibid_history_size))
        .unwrap_or_else(|e| panic!("'{notation}' failed: {e}"));
    render(&resolutions)
}

#[test]
fn test_resolve_mentions() {
    // (lang, notation, context ref, expected resolutions)
    let cases: Vec<(Lang, &str, Option<&str>, Vec<&str>)> = vec![
        (Lang::En, "@Genesis #1:#3", None, vec!["Genesis 1:3"]),
        (Lang::He, "@בראשית #א:#ג", None, vec!["Genesis 1:3"]),
        (Lang::He, "@ברכות #פרק ב", None, vec!["Berakhot 13a-17b"]),
        (Lang::He, "@ביצה #פרק ב #דף טז", None, vec!["Beitzah 16a-16b"]),
        (Lang::He, "@רש\"י @פרק יום טוב @בביצה", None, vec!["Rashi on Beitzah 15b-23b"]),
        (Lang::He, "@פרק אלו דברים", None, vec!["Berakhot 51b-53b | Pesachim 65b-73b"]),
        (Lang::He, "@פרק אלו דברים #דף נב", None, vec!["Berakhot 52a-52b"]),
        (Lang::He, "@תוספתא ברכות #א:#א", None, vec!["Tosefta Berakhot (Lieberman) 1:1 | Tosefta Berakhot 1:1"]),
        (Lang::He, "@שו\"ע @או\"ח #סימן א #סעיף ב", None, vec!["Shulchan Arukh, Orach Chayim 1:2"]),
        (Lang::En, "@Exodus #9:#6~,#5", None, vec!["Exodus 9:6", "Exodus 9:5"]),
        (Lang::He, "@בראשית #א:#א^-#ב", None, vec!["Genesis 1:1-2"]),
        (Lang::He, "@דברים #פרק יד #פסוקים מ^-#מה", None, vec!["Deuteronomy 14:40-45"]),
        (Lang::He, "@תוס' *ורב הונא", None, vec!["Tosafot on Berakhot 27b:1:1"]),
        (Lang::He, "@ותוס' #דכ\"ז ע\"ב", Some("Rashi on Berakhot 2a:1:1"), vec!["Tosafot on Berakhot 27b"]),
        (Lang::He, "@רש\"י *שמא יפשע", Some("Beitzah 15b"), vec!["Rashi on Beitzah 15b:8:1"]),
        (Lang::He, "@רש\"י *שמא| יפשע וכו'", Some("Beitzah 15b"), vec!["Rashi on Beitzah 15b:8:1"]),
        (Lang::He, "<לקמן #דף כז", Some("Berakhot 2a"), vec!["Berakhot 27a-27b"]),
        (Lang::He, "#פסוק ה", Some("Genesis 1:1"), vec!["Genesis 1:5"]),
        (Lang::En, "@Foobar #3", None, vec![]),
        (Lang::En, "@Berakhot #3000000000b", None, vec!["Berakhot"]),
    ];

    for (lang, notation, context, expected) in cases {
        let got = resolve(lang, notation, context);
        assert_eq!(got, expected, "resolving '{}' in context {:?}", notation, context);
    }
}

#[test]
fn test_current_book_resolution_carries_context() {
    let lib = library();
    let options = Options::default();
    let context = lib.parse_ref("Berakhot 2a").unwrap();
    let raw = RawRef::from_notation(Lang::He, "<לקמן #דף כז").unwrap();
    let res = Resolver::new(&lib, &options)
        .resolve_raw_ref(Lang::He, Some(&context), &raw, &IbidHistory::new(3))
        .unwrap();

    let resolved = res[0].resolved().expect("unambiguous");
    assert_eq!(resolved.context_type, Some(ContextType::CurrentBook));
    assert_eq!(resolved.context_ref.as_ref(), Some(&context));
    assert_eq!(resolved.num_resolved_parts(), 2);
}

#[test]
fn test_empty_raw_ref_is_an_error() {
    let lib = library();
    let options = Options::default();
    let raw = RawRef::new(Lang::En, vec![], NeDoc::new("x").span(0, 0)).unwrap();
    let got = Resolver::new(&lib, &options).resolve_raw_ref(Lang::En, None, &raw, &IbidHistory::new(3));
    assert!(matches!(got, Err(ResolutionError::EmptyRawRef)), "got {got:?}");
}

#[test]
fn test_refinement_budget_returns_partial_results() {
    let lib = library();
    let options = Options { max_refinement_steps: 1, ..Options::default() };
    let raw = RawRef::from_notation(Lang::He, "@בראשית #א:#א").unwrap();
    let run = Resolver::new(&lib, &options).run(Lang::He, None, &raw, &IbidHistory::new(3)).unwrap();

    assert!(run.metrics.budget_exhausted);
    assert_eq!(run.metrics.refinement_steps, 1);
    assert_eq!(render(&run.resolutions), vec!["Genesis 1"]);
}

#[test]
fn test_high_thoroughness_explores_more() {
    let lib = library();
    let raw = RawRef::from_notation(Lang::He, "@ביצה #פרק ב #דף טז").unwrap();
    let normal = Options::default();
    let high = Options { thoroughness: ResolutionThoroughness::High, ..Options::default() };

    let normal_run = Resolver::new(&lib, &normal).run(Lang::He, None, &raw, &IbidHistory::new(3)).unwrap();
    let high_run = Resolver::new(&lib, &high).run(Lang::He, None, &raw, &IbidHistory::new(3)).unwrap();

    assert_eq!(render(&normal_run.resolutions), vec!["Beitzah 16a-16b"]);
    assert_eq!(render(&high_run.resolutions), vec!["Beitzah 16a-16b"]);
    assert!(high_run.metrics.refinement_steps > normal_run.metrics.refinement_steps);
    assert!(!normal_run.metrics.budget_exhausted);
}

#[test]
fn test_perek_name_stays_ambiguous_under_high_thoroughness() {
    let lib = library();
    let options = Options { thoroughness: ResolutionThoroughness::High, ..Options::default() };
    let raw = RawRef::from_notation(Lang::He, "@פרק אלו דברים").unwrap();
    let res = Resolver::new(&lib, &options).resolve_raw_ref(Lang::He, None, &raw, &IbidHistory::new(3)).unwrap();

    assert_eq!(res.len(), 1);
    assert!(res[0].is_ambiguous());
    assert!(res[0].refs().len() >= 2, "{:?}", render(&res));
    assert_eq!(render(&res), vec!["Berakhot 51b-53b | Pesachim 65b-73b"]);
}

#[test]
fn test_run_keeps_candidates_and_counts() {
    let lib = library();
    let options = Options::default();
    let raw = RawRef::from_notation(Lang::En, "@Exodus #9:#6~,#5").unwrap();
    let run = Resolver::new(&lib, &options).run(Lang::En, None, &raw, &IbidHistory::new(3)).unwrap();

    assert_eq!(run.metrics.pieces, 2);
    assert_eq!(run.metrics.candidates, run.candidates.len());
    assert!(run.candidates.len() >= run.resolutions.len());
    let second = run.resolutions[1].resolved().expect("unambiguous");
    assert_eq!(second.context_type, Some(ContextType::PreviousPiece));
}

fn bulk(options: Options, docs: &[(Option<&str>, &[&str])]) -> Vec<Vec<String>> {
    let lib = library();
    let contexts: Vec<_> = docs.iter().map(|(c, _)| c.map(|c| lib.parse_ref(c).unwrap())).collect();
    let raws: Vec<Vec<RawRef>> =
        docs.iter().map(|(_, refs)| refs.iter().map(|n| RawRef::from_notation(Lang::He, n).unwrap()).collect()).collect();
    let mut ibid = IbidHistory::new(options.ibid_history_size);
    Resolver::new(&lib, &options)
        .bulk_resolve_refs(Lang::He, &contexts, &raws, &mut ibid)
        .into_iter()
        .map(|doc| doc.iter().flat_map(|m| render(&m.resolutions)).collect())
        .collect()
}

#[test]
fn test_bulk_ibid_sequences() {
    // (documents, expected resolutions per document)
    type Docs<'a> = &'a [(Option<&'a str>, &'a [&'a str])];
    let cases: &[(Docs, &[&[&str]])] = &[
        (&[(None, &["@בראשית #א:#ג", "&שם"])], &[&["Genesis 1:3", "Genesis 1:3"]]),
        (&[(None, &["@בראשית #א:#ג", "&שם #פסוק ה"])], &[&["Genesis 1:3", "Genesis 1:5"]]),
        (
            &[(None, &["@בראשית #א:#ג", "@שמות #ב:#א", "&שם #פסוק ה"])],
            &[&["Genesis 1:3", "Exodus 2:1", "Exodus 2:5 | Genesis 1:5"]],
        ),
        // Ambiguous results are not recorded.
        (
            &[(None, &["@בראשית #א:#ג", "@פרק אלו דברים", "&שם"])],
            &[&["Genesis 1:3", "Berakhot 51b-53b | Pesachim 65b-73b", "Genesis 1:3"]],
        ),
        // The history starts empty in each document.
        (&[(None, &["@בראשית #א:#ג"]), (None, &["&שם"])], &[&["Genesis 1:3"], &[]]),
    ];

    for (docs, expected) in cases {
        let got = bulk(Options::default(), docs);
        let got: Vec<Vec<&str>> = got.iter().map(|doc| doc.iter().map(String::as_str).collect()).collect();
        let expected: Vec<Vec<&str>> = expected.iter().map(|doc| doc.to_vec()).collect();
        assert_eq!(got, expected, "bulk resolving {:?}", docs);
    }
}

#[test]
fn test_bulk_history_can_span_documents() {
    let options = Options { reset_ibids_every_context_ref: false, ..Options::default() };
    let docs: &[(Option<&str>, &[&str])] = &[(None, &["@בראשית #א:#ג"]), (None, &["&שם"])];
    assert_eq!(bulk(options, docs), vec![vec!["Genesis 1:3"], vec!["Genesis 1:3"]]);
}

#[test]
fn test_bulk_with_failures_keeps_unresolved_mentions() {
    let lib = library();
    let options = Options { with_failures: true, ..Options::default() };
    let raws = vec![vec![
        RawRef::from_notation(Lang::He, "@פלוני #ג").unwrap(),
        RawRef::from_notation(Lang::He, "@בראשית #א:#ג").unwrap(),
    ]];
    let mut ibid = IbidHistory::new(3);
    let out = Resolver::new(&lib, &options).bulk_resolve_refs(Lang::He, &[None], &raws, &mut ibid);

    assert_eq!(out[0].len(), 2);
    assert_eq!(out[0][0].raw_ref, 0);
    assert!(out[0][0].resolutions.is_empty());
    assert_eq!(out[0][1].raw_ref, 1);
    assert_eq!(ibid.last_ref().map(|r| r.normal()), Some("Genesis 1:3".to_string()));
}
