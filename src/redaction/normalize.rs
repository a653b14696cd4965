//! Repair of UTF-8 text that was decoded as Windows-1252
//!
//! Spreadsheets exported through legacy tools often carry sequences such as
//! `â€™` where a typographic apostrophe was intended. These break word
//! boundaries for both the analyzer and the pattern rules.

use std::borrow::Cow;

const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"),
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"),
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"),
    ("\u{c2}\u{a0}", " "),
    ("\u{c3}\u{a9}", "\u{e9}"),
    // Closing quote whose final byte was dropped in transit; must stay last
    ("\u{e2}\u{20ac}", "\u{201d}"),
];

/// Returns `text` with known mojibake sequences repaired
///
/// Borrows when nothing needs replacing, which is the common case.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    // Every sequence starts with one of these lead characters
    if !text.contains(['\u{e2}', '\u{c2}', '\u{c3}']) {
        return Cow::Borrowed(text);
    }

    let mut repaired = text.to_string();
    for (broken, fixed) in REPLACEMENTS {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }

    if repaired == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(repaired)
    }
}
