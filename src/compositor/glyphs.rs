//! Character handling for the standard Type1 fonts.
//!
//! Helvetica carries the Latin-1 repertoire plus most of Latin Extended-A, but
//! WinAnsiEncoding only addresses the former. [`TextEncoder`] writes WinAnsi
//! characters directly and hands out unused codes for the other glyphs, which
//! the font encoding then names through its `/Differences` array.

use std::collections::{BTreeSet, HashMap};

/// WinAnsi codes in 0x80..=0x9F, where it departs from Latin-1.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20ac}', 0x80),
    ('\u{201a}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201e}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02c6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8a),
    ('\u{2039}', 0x8b),
    ('\u{0152}', 0x8c),
    ('\u{017d}', 0x8e),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201c}', 0x93),
    ('\u{201d}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02dc}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9a),
    ('\u{203a}', 0x9b),
    ('\u{0153}', 0x9c),
    ('\u{017e}', 0x9e),
    ('\u{0178}', 0x9f),
];

/// Codes WinAnsi leaves unassigned, minus the whitespace controls.
const FREE_CODES: [u8; 32] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x0b, 0x0e, 0x0f, 0x10, 0x11, 0x12, 0x13, 0x14,
    0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f, 0x7f, 0x81, 0x8d, 0x8f,
    0x90, 0x9d,
];

/// Helvetica glyphs outside WinAnsi, by standard glyph name.
const EXTENDED_GLYPHS: &[(char, &str)] = &[
    ('Ā', "Amacron"),
    ('ā', "amacron"),
    ('Ă', "Abreve"),
    ('ă', "abreve"),
    ('Ą', "Aogonek"),
    ('ą', "aogonek"),
    ('Ć', "Cacute"),
    ('ć', "cacute"),
    ('Č', "Ccaron"),
    ('č', "ccaron"),
    ('Ď', "Dcaron"),
    ('ď', "dcaron"),
    ('Đ', "Dcroat"),
    ('đ', "dcroat"),
    ('Ē', "Emacron"),
    ('ē', "emacron"),
    ('Ė', "Edotaccent"),
    ('ė', "edotaccent"),
    ('Ę', "Eogonek"),
    ('ę', "eogonek"),
    ('Ě', "Ecaron"),
    ('ě', "ecaron"),
    ('Ğ', "Gbreve"),
    ('ğ', "gbreve"),
    ('Ģ', "Gcommaaccent"),
    ('ģ', "gcommaaccent"),
    ('Ī', "Imacron"),
    ('ī', "imacron"),
    ('Į', "Iogonek"),
    ('į', "iogonek"),
    ('İ', "Idotaccent"),
    ('ı', "dotlessi"),
    ('Ķ', "Kcommaaccent"),
    ('ķ', "kcommaaccent"),
    ('Ĺ', "Lacute"),
    ('ĺ', "lacute"),
    ('Ļ', "Lcommaaccent"),
    ('ļ', "lcommaaccent"),
    ('Ľ', "Lcaron"),
    ('ľ', "lcaron"),
    ('Ł', "Lslash"),
    ('ł', "lslash"),
    ('Ń', "Nacute"),
    ('ń', "nacute"),
    ('Ņ', "Ncommaaccent"),
    ('ņ', "ncommaaccent"),
    ('Ň', "Ncaron"),
    ('ň', "ncaron"),
    ('Ō', "Omacron"),
    ('ō', "omacron"),
    ('Ő', "Ohungarumlaut"),
    ('ő', "ohungarumlaut"),
    ('Ŕ', "Racute"),
    ('ŕ', "racute"),
    ('Ŗ', "Rcommaaccent"),
    ('ŗ', "rcommaaccent"),
    ('Ř', "Rcaron"),
    ('ř', "rcaron"),
    ('Ś', "Sacute"),
    ('ś', "sacute"),
    ('Ş', "Scedilla"),
    ('ş', "scedilla"),
    ('Ș', "Scommaaccent"),
    ('ș', "scommaaccent"),
    ('Ţ', "Tcommaaccent"),
    ('ţ', "tcommaaccent"),
    ('Ť', "Tcaron"),
    ('ť', "tcaron"),
    ('Ū', "Umacron"),
    ('ū', "umacron"),
    ('Ů', "Uring"),
    ('ů', "uring"),
    ('Ű', "Uhungarumlaut"),
    ('ű', "uhungarumlaut"),
    ('Ų', "Uogonek"),
    ('ų', "uogonek"),
    ('Ź', "Zacute"),
    ('ź', "zacute"),
    ('Ż', "Zdotaccent"),
    ('ż', "zdotaccent"),
];

/// Plain ASCII stand-ins, grouped by replacement.
const ASCII_FOLDS: &[(&str, &str)] = &[
    ("ÀÁÂÃÄÅĀĂĄ", "A"),
    ("àáâãäåāăą", "a"),
    ("Æ", "AE"),
    ("æ", "ae"),
    ("ÇĆĈĊČ", "C"),
    ("çćĉċč", "c"),
    ("ÐĎĐ", "D"),
    ("ðďđ", "d"),
    ("ÈÉÊËĒĔĖĘĚ", "E"),
    ("èéêëēĕėęě", "e"),
    ("ĜĞĠĢ", "G"),
    ("ĝğġģ", "g"),
    ("ĤĦ", "H"),
    ("ĥħ", "h"),
    ("ÌÍÎÏĨĪĬĮİ", "I"),
    ("ìíîïĩīĭįı", "i"),
    ("Ĳ", "IJ"),
    ("ĳ", "ij"),
    ("Ĵ", "J"),
    ("ĵ", "j"),
    ("Ķ", "K"),
    ("ķĸ", "k"),
    ("ĹĻĽĿŁ", "L"),
    ("ĺļľŀł", "l"),
    ("ÑŃŅŇŊ", "N"),
    ("ñńņňŉŋ", "n"),
    ("ÒÓÔÕÖØŌŎŐ", "O"),
    ("òóôõöøōŏő", "o"),
    ("Œ", "OE"),
    ("œ", "oe"),
    ("ŔŖŘ", "R"),
    ("ŕŗř", "r"),
    ("ŚŜŞŠȘ", "S"),
    ("śŝşšș", "s"),
    ("ß", "ss"),
    ("ŢŤŦȚ", "T"),
    ("ţťŧț", "t"),
    ("Þ", "TH"),
    ("þ", "th"),
    ("ÙÚÛÜŨŪŬŮŰŲ", "U"),
    ("ùúûüũūŭůűų", "u"),
    ("Ŵ", "W"),
    ("ŵ", "w"),
    ("ÝŶŸ", "Y"),
    ("ýÿŷ", "y"),
    ("ŹŻŽ", "Z"),
    ("źżž", "z"),
    ("\u{2018}\u{2019}\u{201a}\u{2032}", "'"),
    ("\u{201c}\u{201d}\u{201e}\u{2033}", "\""),
    ("\u{2010}\u{2011}\u{2013}\u{2014}\u{2212}", "-"),
    ("\u{2026}", "..."),
    ("\u{2022}", "*"),
    ("\u{20ac}", "EUR"),
    ("\u{2122}", "TM"),
    ("\u{00a0}\u{2007}\u{202f}", " "),
];

/// The WinAnsi byte for `c`, if the encoding has one.
pub fn win_ansi_code(c: char) -> Option<u8> {
    match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => u8::try_from(c).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, code)| *code),
    }
}

/// Standard glyph name of a Helvetica glyph WinAnsi cannot address.
pub fn extended_glyph_name(c: char) -> Option<&'static str> {
    EXTENDED_GLYPHS
        .iter()
        .find(|(ch, _)| *ch == c)
        .map(|(_, name)| *name)
}

/// ASCII replacement for an accented letter or typographic mark.
pub fn fold_char(c: char) -> Option<&'static str> {
    ASCII_FOLDS
        .iter()
        .find(|(group, _)| group.contains(c))
        .map(|(_, folded)| *folded)
}

/// Replace accented letters and typographic marks with ASCII.
///
/// Characters without a stand-in are kept as they are.
pub fn fold_to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_char(c) {
            Some(folded) if !c.is_ascii() => out.push_str(folded),
            _ => out.push(c),
        }
    }
    out
}

/// Encodes text for one document and records the extra glyphs it used.
#[derive(Debug, Default)]
pub struct TextEncoder {
    assigned: HashMap<char, u8>,
    differences: Vec<(u8, &'static str)>,
    missing: BTreeSet<char>,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `text` as single-byte codes for the document font.
    ///
    /// Glyphs that do not fit the encoding fall back to their ASCII stand-in,
    /// and characters Helvetica has no glyph for print as `?`.
    pub fn encode(&mut self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for c in text.chars() {
            if let Some(code) = win_ansi_code(c).or_else(|| self.extra_code(c)) {
                out.push(code);
            } else if let Some(folded) = fold_char(c) {
                out.extend_from_slice(folded.as_bytes());
            } else {
                self.missing.insert(c);
                out.push(b'?');
            }
        }
        out
    }

    /// `(code, glyph name)` pairs for the font's `/Differences` array.
    pub fn differences(&self) -> &[(u8, &'static str)] {
        &self.differences
    }

    /// Characters printed as `?`.
    pub fn missing(&self) -> impl Iterator<Item = char> + '_ {
        self.missing.iter().copied()
    }

    fn extra_code(&mut self, c: char) -> Option<u8> {
        if let Some(code) = self.assigned.get(&c) {
            return Some(*code);
        }
        let glyph = extended_glyph_name(c)?;
        let code = *FREE_CODES.get(self.differences.len())?;
        self.assigned.insert(c, code);
        self.differences.push((code, glyph));
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_codes() {
        assert_eq!(win_ansi_code('A'), Some(b'A'));
        assert_eq!(win_ansi_code('é'), Some(0xe9));
        assert_eq!(win_ansi_code('\u{2014}'), Some(0x97));
        assert_eq!(win_ansi_code('Š'), Some(0x8a));
        assert_eq!(win_ansi_code('\u{80}'), None);
        assert_eq!(win_ansi_code('Ł'), None);
    }

    #[test]
    fn test_polish_name_uses_extra_codes() {
        let mut encoder = TextEncoder::new();
        assert_eq!(encoder.encode("Łukasz Żółw"), b"\x01ukasz \x02\xf3\x03w".to_vec());
        assert_eq!(encoder.encode("ł"), vec![0x03]);
        assert_eq!(
            encoder.differences(),
            &[(0x01, "Lslash"), (0x02, "Zdotaccent"), (0x03, "lslash")]
        );
        assert_eq!(encoder.missing().count(), 0);
    }

    #[test]
    fn test_fallbacks_when_no_glyph_or_code() {
        let mut encoder = TextEncoder::new();
        assert_eq!(encoder.encode("Ĉ"), b"C".to_vec());
        assert_eq!(encoder.encode("\u{2713} \u{4e2d}"), b"? ?".to_vec());
        assert_eq!(encoder.missing().collect::<Vec<_>>(), vec!['\u{2713}', '\u{4e2d}']);

        let mut encoder = TextEncoder::new();
        let all: String = EXTENDED_GLYPHS.iter().map(|(c, _)| *c).collect();
        let encoded = encoder.encode(&all);
        assert_eq!(encoder.differences().len(), FREE_CODES.len());
        assert_eq!(encoded.len(), EXTENDED_GLYPHS.len());
        assert!(encoder.missing().next().is_none());
    }

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Łukasz Żółw"), "Lukasz Zolw");
        assert_eq!(fold_to_ascii("Émile Straße"), "Emile Strasse");
        assert_eq!(fold_to_ascii("O\u{2019}Neil"), "O'Neil");
        assert_eq!(fold_to_ascii("\u{4e2d}"), "\u{4e2d}");
    }
}
