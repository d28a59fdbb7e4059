use crate::phonetic::{self, Metaphone, PhoneticEncoder};
use crate::tokenizer::{self, EnglishStemmer, EnglishStopWords, Stem, StopWords};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The text pipeline shared by indexing and querying:
/// word runs, stop-word removal, stemming, phonetic coding.
#[derive(Clone)]
pub struct Analyzer {
    stemmer: Arc<dyn Stem>,
    encoder: Arc<dyn PhoneticEncoder>,
    stop_words: Arc<dyn StopWords>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(EnglishStemmer::default(), Metaphone::default(), EnglishStopWords)
    }
}

impl Analyzer {
    pub fn new<S, E, W>(stemmer: S, encoder: E, stop_words: W) -> Self
    where
        S: Stem + 'static,
        E: PhoneticEncoder + 'static,
        W: StopWords + 'static,
    {
        Self { stemmer: Arc::new(stemmer), encoder: Arc::new(encoder), stop_words: Arc::new(stop_words) }
    }

    /// Word runs of `text` with stop words removed, then lowercased and stemmed.
    ///
    /// Stop words match case-sensitively; stemming always sees lowercase.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let words = tokenizer::strip_stop_words(self.stop_words.as_ref(), tokenizer::words(text));
        tokenizer::stem(self.stemmer.as_ref(), tokenizer::lowercase(words))
    }

    pub fn code_table(&self, tokens: &[String]) -> BTreeMap<String, String> {
        phonetic::code_table(self.encoder.as_ref(), tokens)
    }

    pub fn codes(&self, tokens: &[String]) -> Vec<String> {
        phonetic::codes(self.encoder.as_ref(), tokens)
    }

    /// Distinct phonetic codes for `text`.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.codes(&self.tokenize(text))
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;
    impl PhoneticEncoder for Upper {
        fn code(&self, token: &str) -> String {
            token.to_uppercase()
        }
    }

    struct Identity;
    impl Stem for Identity {
        fn stem(&self, token: &str) -> String {
            token.to_string()
        }
    }

    #[test]
    fn tokenizes_in_text_order() {
        let a = Analyzer::default();
        assert_eq!(a.tokenize("foo bar baz "), vec!["foo", "bar", "baz"]);
        assert_eq!(a.tokenize("computing stuff"), vec!["comput", "stuff"]);
    }

    #[test]
    fn stop_words_only_analyze_to_nothing() {
        let a = Analyzer::default();
        assert!(a.tokenize("is a").is_empty());
        assert!(a.analyze("is a").is_empty());
        assert!(a.analyze("").is_empty());
    }

    #[test]
    fn collaborators_are_injectable() {
        let a = Analyzer::new(Identity, Upper, EnglishStopWords);
        assert_eq!(a.analyze("running Running the end"), vec!["RUNNING", "END"]);
        let table = a.code_table(&a.tokenize("running Running"));
        assert_eq!(table.len(), 1);
        assert_eq!(table["running"], "RUNNING");
    }

    #[test]
    fn upper_case_inflections_stem_like_lower_case() {
        let a = Analyzer::default();
        assert_eq!(a.tokenize("RUNNING Running running"), vec!["run", "run", "run"]);
        assert_eq!(a.analyze("RUNNING"), a.analyze("running"));
        assert_eq!(a.analyze("COMPUTING"), a.analyze("computing"));
    }

    #[test]
    fn stop_word_check_happens_before_lowercasing() {
        let a = Analyzer::default();
        assert_eq!(a.tokenize("The the"), vec!["the"]);
    }

    #[test]
    fn accented_text_analyzes() {
        let a = Analyzer::default();
        assert_eq!(a.analyze("naïve résumé").len(), 2);
        assert_eq!(a.analyze("Café"), a.analyze("cafe"));
    }

    #[test]
    fn spelling_variants_share_a_code() {
        let a = Analyzer::default();
        assert_eq!(a.analyze("Tobi"), a.analyze("tobi"));
    }
}
