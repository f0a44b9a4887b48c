//! Numeral codecs.
//!
//! Every address type delegates the "digits" part of a section string to a
//! [`NumeralCodec`]. The matcher never sees an encoding: it asks the address type
//! for numbers and the address type asks its codec.

use crate::Lang;

/// Converts between a section number and its written form.
pub trait NumeralCodec: Send + Sync {
    /// Parse `s` as a number. `s` is already trimmed and quote-normalized.
    fn decode(&self, s: &str) -> Option<u32>;

    /// Render `n` in this numeral system.
    fn encode(&self, n: u32) -> String;
}

/// ASCII decimal digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArabicNumeral;

impl NumeralCodec for ArabicNumeral {
    fn decode(&self, s: &str) -> Option<u32> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().filter(|n| *n > 0)
    }

    fn encode(&self, n: u32) -> String {
        n.to_string()
    }
}

/// Hebrew letter numerals (gematria), e.g. `כ"ז` = 27, `ט"ו` = 15.
///
/// Letters must be written in non-increasing value order, which keeps ordinary
/// words (`אלו`, `יום`) from decoding as numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HebrewNumeral;

const ONES: [&str; 10] = ["", "א", "ב", "ג", "ד", "ה", "ו", "ז", "ח", "ט"];
const TENS: [&str; 10] = ["", "י", "כ", "ל", "מ", "נ", "ס", "ע", "פ", "צ"];
const HUNDREDS: [&str; 5] = ["", "ק", "ר", "ש", "ת"];

pub(crate) fn hebrew_letter_value(c: char) -> Option<u32> {
    let v = match c {
        'א' => 1,
        'ב' => 2,
        'ג' => 3,
        'ד' => 4,
        'ה' => 5,
        'ו' => 6,
        'ז' => 7,
        'ח' => 8,
        'ט' => 9,
        'י' => 10,
        'כ' | 'ך' => 20,
        'ל' => 30,
        'מ' | 'ם' => 40,
        'נ' | 'ן' => 50,
        'ס' => 60,
        'ע' => 70,
        'פ' | 'ף' => 80,
        'צ' | 'ץ' => 90,
        'ק' => 100,
        'ר' => 200,
        'ש' => 300,
        'ת' => 400,
        _ => return None,
    };
    Some(v)
}

impl NumeralCodec for HebrewNumeral {
    fn decode(&self, s: &str) -> Option<u32> {
        let letters: Vec<char> = s.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
        if letters.is_empty() {
            return None;
        }
        // A numeral carries at most one geresh/gershayim.
        if s.chars().filter(|c| matches!(c, '\'' | '"')).count() > 1 {
            return None;
        }

        let mut total = 0;
        let mut prev = u32::MAX;
        for c in letters {
            let value = hebrew_letter_value(c)?;
            if value > prev {
                return None;
            }
            total += value;
            prev = value;
        }
        Some(total)
    }

    fn encode(&self, n: u32) -> String {
        let mut letters = String::new();
        let mut rest = n;
        while rest >= 400 {
            letters.push('ת');
            rest -= 400;
        }
        letters.push_str(HUNDREDS[(rest / 100) as usize]);
        rest %= 100;
        match rest {
            15 => letters.push_str("טו"),
            16 => letters.push_str("טז"),
            _ => {
                letters.push_str(TENS[(rest / 10) as usize]);
                letters.push_str(ONES[(rest % 10) as usize]);
            }
        }

        let count = letters.chars().count();
        match count {
            0 => String::new(),
            1 => format!("{letters}'"),
            _ => {
                let split = letters.char_indices().last().map(|(b, _)| b).unwrap_or(0);
                format!("{}\"{}", &letters[..split], &letters[split..])
            }
        }
    }
}

/// Default codec for plain numbers in `lang`.
pub fn codec_for(lang: Lang) -> &'static dyn NumeralCodec {
    match lang {
        Lang::He => &HebrewNumeral,
        Lang::En => &ArabicNumeral,
    }
}

/// Decode with the language's codec, falling back to digits in Hebrew text.
pub fn decode_number(lang: Lang, s: &str) -> Option<u32> {
    codec_for(lang).decode(s).or_else(|| ArabicNumeral.decode(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_gematria() {
        let cases = [("א", 1), ("ח'", 8), ("כ\"ז", 27), ("כז", 27), ("ט\"ו", 15), ("טז", 16), ("קמ\"ה", 145), ("תתק", 900)];
        for (input, expected) in cases {
            assert_eq!(HebrewNumeral.decode(input), Some(expected), "decoding '{input}'");
        }
    }

    #[test]
    fn rejects_words_and_malformed_numerals() {
        for input in ["אלו", "יום", "ab", "", "כ\"ז\"", "אב"] {
            assert_eq!(HebrewNumeral.decode(input), None, "'{input}' should not decode");
        }
    }

    #[test]
    fn encodes_with_geresh_and_gershayim() {
        assert_eq!(HebrewNumeral.encode(8), "ח'");
        assert_eq!(HebrewNumeral.encode(27), "כ\"ז");
        assert_eq!(HebrewNumeral.encode(15), "ט\"ו");
        assert_eq!(HebrewNumeral.encode(16), "ט\"ז");
        assert_eq!(HebrewNumeral.encode(400), "ת'");
        assert_eq!(HebrewNumeral.encode(613), "תרי\"ג");
    }

    #[test]
    fn arabic_rejects_zero_and_letters() {
        assert_eq!(ArabicNumeral.decode("27"), Some(27));
        assert_eq!(ArabicNumeral.decode("0"), None);
        assert_eq!(ArabicNumeral.decode("27b"), None);
    }

    #[test]
    fn decode_number_accepts_digits_in_hebrew() {
        assert_eq!(decode_number(Lang::He, "12"), Some(12));
        assert_eq!(decode_number(Lang::En, "יב"), None);
    }
}
