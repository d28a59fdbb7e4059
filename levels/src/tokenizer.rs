use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Reduces a token to its stem.
pub trait Stem: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Membership test for words that carry no search value.
pub trait StopWords: Send + Sync {
    fn is_stop_word(&self, token: &str) -> bool;
}

/// Snowball English stemmer.
pub struct EnglishStemmer {
    inner: Stemmer,
}

impl Default for EnglishStemmer {
    fn default() -> Self {
        Self { inner: Stemmer::create(Algorithm::English) }
    }
}

impl Stem for EnglishStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Fixed English stop-word list. Matching is case-sensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishStopWords;

impl StopWords for EnglishStopWords {
    fn is_stop_word(&self, token: &str) -> bool {
        STOPWORDS.contains(token)
    }
}

/// Split text into maximal runs of word characters (letters, digits, underscore).
///
/// The text is NFKC-normalized first; case is preserved.
pub fn words(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>();
    WORD_RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

pub fn strip_stop_words<S: StopWords + ?Sized>(stop_words: &S, words: Vec<String>) -> Vec<String> {
    words.into_iter().filter(|w| !stop_words.is_stop_word(w)).collect()
}

pub fn lowercase(words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

pub fn stem<S: Stem + ?Sized>(stemmer: &S, words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|w| stemmer.stem(&w)).collect()
}

/// Number of occurrences of each word.
pub fn count_words(words: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for w in words {
        *counts.entry(w.clone()).or_insert(0) += 1;
    }
    counts
}
