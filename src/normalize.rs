//! Filename normalization
//!
//! Two passes over a raw file name:
//! - Cyrillic letters are transliterated to Latin digraphs
//! - every run of non-word characters in the name part becomes a single `_`
//!
//! The extension (text after the final `.`) only goes through the first pass.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Source alphabet, paired index by index with [`LATIN`]
const CYRILLIC: &str = "абвгґдеєжзиіїйклмнопрстуфхцчшщьюяёъы";

const LATIN: [&str; 36] = [
    "a", "b", "v", "h", "g", "d", "e", "ye", "zh", "z", "y", "i", "yi", "y", "k", "l", "m", "n",
    "o", "p", "r", "s", "t", "u", "f", "kh", "ts", "ch", "sh", "sch", "", "yu", "ya", "yo", "", "y",
];

static TRANSLITERATION: OnceLock<HashMap<char, String>> = OnceLock::new();
static NON_WORD: OnceLock<Regex> = OnceLock::new();

fn transliteration_table() -> &'static HashMap<char, String> {
    TRANSLITERATION.get_or_init(|| {
        let mut table = HashMap::with_capacity(LATIN.len() * 2);
        for (cyr, lat) in CYRILLIC.chars().zip(LATIN) {
            table.insert(cyr, lat.to_string());
            for upper in cyr.to_uppercase() {
                table.insert(upper, lat.to_uppercase());
            }
        }
        table
    })
}

fn non_word() -> &'static Regex {
    NON_WORD.get_or_init(|| Regex::new(r"\W+").unwrap())
}

/// Replace every character of the source alphabet with its Latin spelling
pub fn transliterate(text: &str) -> String {
    let table = transliteration_table();
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match table.get(&ch) {
            Some(latin) => out.push_str(latin),
            None => out.push(ch),
        }
    }
    out
}

/// Collapse every run of non-word characters into one underscore
fn sanitize(name: &str) -> String {
    non_word().replace_all(name, "_").into_owned()
}

/// Turn a raw file name into a filesystem-safe, transliterated one
///
/// `normalize(normalize(x)) == normalize(x)` holds for every input.
pub fn normalize(file_name: &str) -> String {
    let latin = transliterate(file_name);
    match latin.rsplit_once('.') {
        Some((name, extension)) => format!("{}.{}", sanitize(name), extension),
        None => sanitize(&latin),
    }
}
