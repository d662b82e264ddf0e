//! HTML entity decoding.
//!
//! Decodes named character references (the HTML 4 working set) and decimal
//! or hexadecimal numeric references. Anything unrecognized or malformed is
//! passed through verbatim; decoding never fails.
//!
//! The tokenizer applies this to text runs before delivering them; the
//! extraction core applies it itself to the specific meta attribute values
//! it reads (description, keywords, robots). Attribute values are otherwise
//! delivered raw.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Named character references and their replacement characters.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    [
        // Markup-significant
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        // Spacing and punctuation
        ("nbsp", '\u{a0}'),
        ("ensp", '\u{2002}'),
        ("emsp", '\u{2003}'),
        ("thinsp", '\u{2009}'),
        ("ndash", '\u{2013}'),
        ("mdash", '\u{2014}'),
        ("lsquo", '\u{2018}'),
        ("rsquo", '\u{2019}'),
        ("sbquo", '\u{201a}'),
        ("ldquo", '\u{201c}'),
        ("rdquo", '\u{201d}'),
        ("bdquo", '\u{201e}'),
        ("dagger", '\u{2020}'),
        ("Dagger", '\u{2021}'),
        ("bull", '\u{2022}'),
        ("hellip", '\u{2026}'),
        ("permil", '\u{2030}'),
        ("prime", '\u{2032}'),
        ("Prime", '\u{2033}'),
        ("lsaquo", '\u{2039}'),
        ("rsaquo", '\u{203a}'),
        ("oline", '\u{203e}'),
        ("frasl", '\u{2044}'),
        ("euro", '\u{20ac}'),
        ("trade", '\u{2122}'),
        // Latin-1 block
        ("iexcl", '\u{a1}'),
        ("cent", '\u{a2}'),
        ("pound", '\u{a3}'),
        ("curren", '\u{a4}'),
        ("yen", '\u{a5}'),
        ("brvbar", '\u{a6}'),
        ("sect", '\u{a7}'),
        ("uml", '\u{a8}'),
        ("copy", '\u{a9}'),
        ("ordf", '\u{aa}'),
        ("laquo", '\u{ab}'),
        ("not", '\u{ac}'),
        ("shy", '\u{ad}'),
        ("reg", '\u{ae}'),
        ("macr", '\u{af}'),
        ("deg", '\u{b0}'),
        ("plusmn", '\u{b1}'),
        ("sup2", '\u{b2}'),
        ("sup3", '\u{b3}'),
        ("acute", '\u{b4}'),
        ("micro", '\u{b5}'),
        ("para", '\u{b6}'),
        ("middot", '\u{b7}'),
        ("cedil", '\u{b8}'),
        ("sup1", '\u{b9}'),
        ("ordm", '\u{ba}'),
        ("raquo", '\u{bb}'),
        ("frac14", '\u{bc}'),
        ("frac12", '\u{bd}'),
        ("frac34", '\u{be}'),
        ("iquest", '\u{bf}'),
        ("times", '\u{d7}'),
        ("divide", '\u{f7}'),
        // Accented letters (Latin-1)
        ("Agrave", '\u{c0}'),
        ("Aacute", '\u{c1}'),
        ("Acirc", '\u{c2}'),
        ("Atilde", '\u{c3}'),
        ("Auml", '\u{c4}'),
        ("Aring", '\u{c5}'),
        ("AElig", '\u{c6}'),
        ("Ccedil", '\u{c7}'),
        ("Egrave", '\u{c8}'),
        ("Eacute", '\u{c9}'),
        ("Ecirc", '\u{ca}'),
        ("Euml", '\u{cb}'),
        ("Igrave", '\u{cc}'),
        ("Iacute", '\u{cd}'),
        ("Icirc", '\u{ce}'),
        ("Iuml", '\u{cf}'),
        ("ETH", '\u{d0}'),
        ("Ntilde", '\u{d1}'),
        ("Ograve", '\u{d2}'),
        ("Oacute", '\u{d3}'),
        ("Ocirc", '\u{d4}'),
        ("Otilde", '\u{d5}'),
        ("Ouml", '\u{d6}'),
        ("Oslash", '\u{d8}'),
        ("Ugrave", '\u{d9}'),
        ("Uacute", '\u{da}'),
        ("Ucirc", '\u{db}'),
        ("Uuml", '\u{dc}'),
        ("Yacute", '\u{dd}'),
        ("THORN", '\u{de}'),
        ("szlig", '\u{df}'),
        ("agrave", '\u{e0}'),
        ("aacute", '\u{e1}'),
        ("acirc", '\u{e2}'),
        ("atilde", '\u{e3}'),
        ("auml", '\u{e4}'),
        ("aring", '\u{e5}'),
        ("aelig", '\u{e6}'),
        ("ccedil", '\u{e7}'),
        ("egrave", '\u{e8}'),
        ("eacute", '\u{e9}'),
        ("ecirc", '\u{ea}'),
        ("euml", '\u{eb}'),
        ("igrave", '\u{ec}'),
        ("iacute", '\u{ed}'),
        ("icirc", '\u{ee}'),
        ("iuml", '\u{ef}'),
        ("eth", '\u{f0}'),
        ("ntilde", '\u{f1}'),
        ("ograve", '\u{f2}'),
        ("oacute", '\u{f3}'),
        ("ocirc", '\u{f4}'),
        ("otilde", '\u{f5}'),
        ("ouml", '\u{f6}'),
        ("oslash", '\u{f8}'),
        ("ugrave", '\u{f9}'),
        ("uacute", '\u{fa}'),
        ("ucirc", '\u{fb}'),
        ("uuml", '\u{fc}'),
        ("yacute", '\u{fd}'),
        ("thorn", '\u{fe}'),
        ("yuml", '\u{ff}'),
    ]
    .into_iter()
    .collect()
});

/// Windows-1252 mapping for numeric references in the C1 control range.
///
/// Documents authored on legacy systems routinely emit `&#147;` and friends
/// meaning smart quotes; browsers interpret 0x80-0x9F references through
/// windows-1252, so we do too.
const C1_REPLACEMENTS: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

/// Decode HTML character references in `text`.
///
/// Returns the input with every well-formed `&name;`, `&#NNN;` and `&#xHH;`
/// reference replaced. References must be semicolon-terminated; anything
/// else (stray `&`, unknown name, out-of-range codepoint) is copied through
/// unchanged.
///
/// # Examples
///
/// ```
/// use rs_htmltotext::decode_entities;
///
/// assert_eq!(decode_entities("fish &amp; chips"), "fish & chips");
/// assert_eq!(decode_entities("&#163;5 &#x2014; cheap"), "\u{a3}5 \u{2014} cheap");
/// assert_eq!(decode_entities("AT&T"), "AT&T");
/// ```
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Try to decode one reference at the start of `tail` (which begins with
/// `&`). Returns the replacement character and the number of bytes consumed.
fn decode_one(tail: &str) -> Option<(char, usize)> {
    let body = &tail[1..];
    let end = body.find(';')?;
    // References are short; a distant semicolon means this `&` is literal.
    if end == 0 || end > 10 {
        return None;
    }
    let name = &body[..end];
    let consumed = end + 2;

    if let Some(digits) = name.strip_prefix('#') {
        let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            digits.parse::<u32>().ok()?
        };
        let ch = if (0x80..=0x9f).contains(&code) {
            C1_REPLACEMENTS[(code - 0x80) as usize]
        } else {
            char::from_u32(code)?
        };
        return Some((ch, consumed));
    }

    NAMED_ENTITIES.get(name).map(|&ch| (ch, consumed))
}
