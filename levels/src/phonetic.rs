use rphonetic::Encoder;
use std::collections::{BTreeMap, HashSet};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Maps a token to the code of its pronunciation class.
///
/// Distinct tokens are expected to collide; that is how spelling variants
/// end up matching each other.
pub trait PhoneticEncoder: Send + Sync {
    fn code(&self, token: &str) -> String;
}

/// Metaphone encoder.
///
/// Only the ASCII-folded form of a token reaches the encoder: accents are
/// stripped (`résumé` -> `resume`) and other non-ASCII characters dropped.
/// Tokens the algorithm has nothing to say about (digits, underscores, CJK)
/// encode to themselves so they stay searchable.
#[derive(Default)]
pub struct Metaphone {
    inner: rphonetic::Metaphone,
}

impl PhoneticEncoder for Metaphone {
    fn code(&self, token: &str) -> String {
        let folded = ascii_fold(token);
        if !folded.bytes().any(|b| b.is_ascii_alphabetic()) {
            return token.to_string();
        }
        let code = self.inner.encode(&folded);
        if code.is_empty() {
            token.to_string()
        } else {
            code
        }
    }
}

/// Decompose, drop combining marks, keep what is left of ASCII.
fn ascii_fold(token: &str) -> String {
    token.nfd().filter(|c| !is_combining_mark(*c) && c.is_ascii()).collect()
}

/// Token to code, one entry per distinct token.
pub fn code_table<E: PhoneticEncoder + ?Sized>(encoder: &E, tokens: &[String]) -> BTreeMap<String, String> {
    let mut table = BTreeMap::new();
    for t in tokens {
        if !table.contains_key(t) {
            table.insert(t.clone(), encoder.code(t));
        }
    }
    table
}

/// Distinct codes in order of first appearance.
pub fn codes<E: PhoneticEncoder + ?Sized>(encoder: &E, tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for t in tokens {
        let code = encoder.code(t);
        if seen.insert(code.clone()) {
            out.push(code);
        }
    }
    out
}
