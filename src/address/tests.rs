use super::{AddressType, SectionValue};
use crate::Lang;

#[test]
fn test_possible_sections() {
    use SectionValue::{Single, Span};

    let cases: &[(AddressType, Lang, &str, &[SectionValue])] = &[
        (AddressType::Perek, Lang::He, "פ\"ח", &[Single(8)]),
        (AddressType::Perek, Lang::He, "פ״ח", &[Single(8)]),
        (AddressType::Perek, Lang::He, "פרק יד", &[Single(14)]),
        (AddressType::Perek, Lang::He, "יג", &[Single(13)]),
        (AddressType::Perek, Lang::He, "פסוק ה", &[]),
        (AddressType::Pasuk, Lang::He, "פסוקים מ", &[Single(40)]),
        (AddressType::Pasuk, Lang::He, "מה", &[Single(45)]),
        (AddressType::Pasuk, Lang::He, "פרק ב", &[]),
        (AddressType::Talmud, Lang::He, "דכ\"ז ע\"ב", &[Single(54)]),
        (AddressType::Talmud, Lang::He, "כ\"ז ע\"א", &[Single(53)]),
        (AddressType::Talmud, Lang::He, "כז:", &[Single(54)]),
        (AddressType::Talmud, Lang::He, "ב.", &[Single(3)]),
        (AddressType::Talmud, Lang::He, "דף כז", &[Span(53, 54)]),
        (AddressType::Talmud, Lang::He, "דף ט\"ו עמוד ב", &[Single(30)]),
        (AddressType::Talmud, Lang::En, "27b", &[Single(54)]),
        (AddressType::Talmud, Lang::En, "Daf 2a", &[Single(3)]),
        (AddressType::Talmud, Lang::En, "3000000000b", &[]),
        (AddressType::Talmud, Lang::He, "דף 3000000000", &[]),
        (AddressType::Integer, Lang::En, "9:", &[Single(9)]),
        (AddressType::Integer, Lang::En, "chapter 9", &[]),
        (AddressType::Perek, Lang::En, "Chapter 9", &[Single(9)]),
        (AddressType::Halakhah, Lang::He, "הלכה ג", &[Single(3)]),
        (AddressType::SeifKatan, Lang::He, "ס\"ק ד", &[Single(4)]),
        (AddressType::Seif, Lang::He, "ס\"ק ד", &[]),
        (AddressType::Mishnah, Lang::He, "מ'", &[Single(40)]),
        (AddressType::Integer, Lang::He, "אלו", &[]),
    ];

    for (address_type, lang, input, expected) in cases {
        let got = address_type.possible_sections(*lang, input);
        assert_eq!(got.as_slice(), *expected, "{:?} {:?} parsing '{}'", address_type, lang, input);
    }
}

#[test]
fn test_to_str() {
    let cases = [
        (AddressType::Talmud, Lang::En, 54, "27b"),
        (AddressType::Talmud, Lang::En, 3, "2a"),
        (AddressType::Talmud, Lang::He, 54, "כ\"ז:"),
        (AddressType::Perek, Lang::He, 8, "ח'"),
        (AddressType::Pasuk, Lang::En, 45, "45"),
    ];
    for (address_type, lang, n, expected) in cases {
        assert_eq!(address_type.to_str(lang, n), expected, "{:?} {:?} rendering {}", address_type, lang, n);
    }
}

#[test]
fn test_possible_sections_named_requires_section_name() {
    assert_eq!(AddressType::Perek.possible_sections_named(Lang::He, "פרק ב"), vec![SectionValue::Single(2)]);
    assert!(AddressType::Perek.possible_sections_named(Lang::He, "ב").is_empty());
    assert!(AddressType::Perek.possible_sections_named(Lang::He, "דף ב").is_empty());
}

#[test]
fn test_to_number_ignores_spans() {
    assert_eq!(AddressType::Talmud.to_number(Lang::He, "כז"), Some(53));
    assert_eq!(AddressType::Perek.to_number(Lang::He, "ח"), Some(8));
    assert_eq!(AddressType::Perek.to_number(Lang::En, "eight"), None);
}
