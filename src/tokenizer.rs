//! Word splitting and sentence normalization.
//!
//! The target NLU service counts entity positions in tokens, so the split
//! here has to agree with the service's own tokenizer character for
//! character. A token is either a maximal run of word characters or a single
//! character that is neither a word character nor whitespace.
//!
//! ```text
//! "I'd like l.a."  ->  I | ' | d | like | l | . | a | .
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token and its byte range in the tokenized string (`end` is exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Whether `c` belongs to the word class.
///
/// ASCII letters and digits, the ordinal indicators, the micro sign,
/// Latin-1 Supplement and Latin Extended-A letters (the multiplication and
/// division signs are symbols, not letters), spacing modifier letters, and
/// the Greek/Coptic and Cyrillic blocks. Underscore is deliberately absent.
pub fn is_word_char(c: char) -> bool {
    matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '0'..='9'
        | '\u{00AA}' // ª
        | '\u{00B5}' // µ
        | '\u{00BA}' // º
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{017F}'
        | '\u{02B0}'..='\u{02FF}'
        | '\u{0370}'..='\u{03FF}'
        | '\u{0400}'..='\u{04FF}'
    )
}

/// Split `text` into tokens.
///
/// # Example
///
/// ```ignore
/// let words: Vec<&str> = tokenize("a,b,c").iter().map(|t| t.text).collect();
/// assert_eq!(words, vec!["a", ",", "b", ",", "c"]);
/// ```
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let text = text.trim_end();
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (pos, c) in text.char_indices() {
        if is_word_char(c) {
            word_start.get_or_insert(pos);
            continue;
        }

        if let Some(start) = word_start.take() {
            tokens.push(Token {
                text: &text[start..pos],
                start,
                end: pos,
            });
        }

        if !c.is_whitespace() {
            let end = pos + c.len_utf8();
            tokens.push(Token {
                text: &text[pos..end],
                start: pos,
                end,
            });
        }
    }

    if let Some(start) = word_start {
        tokens.push(Token {
            text: &text[start..],
            start,
            end: text.len(),
        });
    }

    tokens
}

/// Number of tokens [`tokenize`] produces for `text`
pub fn word_count(text: &str) -> usize {
    tokenize(text).len()
}

/// Tokenize and join the tokens back with single spaces (`"a,b"` -> `"a , b"`)
pub fn spaced_tokens(text: &str) -> String {
    tokenize(text)
        .iter()
        .map(|token| token.text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Culture code of the model being built (`en-us`, `es-es`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Culture(String);

/// How a culture lowercases text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFolding {
    /// Only `A-Z` are lowercased; everything else is left as written
    AsciiOnly,
    /// Full Unicode lowercasing
    Full,
}

impl Culture {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// The service only folds ASCII letters for `en-us` models.
    pub fn case_folding(&self) -> CaseFolding {
        if self.0.eq_ignore_ascii_case("en-us") {
            CaseFolding::AsciiOnly
        } else {
            CaseFolding::Full
        }
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::new("en-us")
    }
}

impl From<&str> for Culture {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Culture {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collapse whitespace runs to one space, trim, then lowercase per culture.
pub fn normalize(text: &str, culture: &Culture) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match culture.case_folding() {
        CaseFolding::AsciiOnly => collapsed.to_ascii_lowercase(),
        CaseFolding::Full => collapsed.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        tokenize(text).iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_punctuation() {
        let tokens = tokenize("a,b,c");
        assert_eq!(words("a,b,c"), vec!["a", ",", "b", ",", "c"]);

        // contiguous and covering the whole input
        assert_eq!(tokens.first().map(|t| t.start), Some(0));
        assert_eq!(tokens.last().map(|t| t.end), Some(5));
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_tokenize_offsets_slice_input() {
        let text = "  go to  l.a. now  ";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_tokenize_contractions_and_abbreviations() {
        assert_eq!(
            words("i'd like to go to o'brian and l.a."),
            vec!["i", "'", "d", "like", "to", "go", "to", "o", "'", "brian", "and", "l", ".", "a", "."]
        );
    }

    #[test]
    fn test_tokenize_underscore_is_its_own_token() {
        assert_eq!(words("great_britain"), vec!["great", "_", "britain"]);
        assert_eq!(words("_love_"), vec!["_", "love", "_"]);
    }

    #[test]
    fn test_tokenize_ordinals_stay_in_word() {
        assert_eq!(words("the 2ºc apartment"), vec!["the", "2ºc", "apartment"]);
        assert_eq!(words("2º floor"), vec!["2º", "floor"]);
        assert_eq!(words("ºª"), vec!["ºª"]);
    }

    #[test]
    fn test_tokenize_accented_greek_cyrillic() {
        assert_eq!(words("cigüeña, Éspaña"), vec!["cigüeña", ",", "Éspaña"]);
        assert_eq!(words("αβγ-где"), vec!["αβγ", "-", "где"]);
    }

    #[test]
    fn test_tokenize_symbols_are_single_tokens() {
        assert_eq!(words("×÷·¬"), vec!["×", "÷", "·", "¬"]);
        assert_eq!(words("!!"), vec!["!", "!"]);
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_word_count_matches_tokenize() {
        for text in ["hello world", "in-the-world", "symbols! ºª\\!|\"@", "  x  "] {
            assert_eq!(word_count(text), tokenize(text).len());
        }
    }

    #[test]
    fn test_spaced_tokens() {
        assert_eq!(spaced_tokens("hola-caracola"), "hola - caracola");
        assert_eq!(spaced_tokens("I'd like"), "I ' d like");
        assert_eq!(spaced_tokens("Que tAl"), "Que tAl");
    }

    #[test]
    fn test_normalize_en_us_folds_ascii_only() {
        let culture = Culture::new("en-us");
        assert_eq!(normalize("Çç CAFÉ", &culture), "Çç cafÉ");
        // decomposed accent: the base letter is ASCII, the combining mark is kept
        assert_eq!(normalize("Çç CAFE\u{301}", &culture), "Çç cafe\u{301}");
        assert_eq!(normalize("vayÁ cÓn", &culture), "vayÁ cÓn");
    }

    #[test]
    fn test_normalize_other_cultures_fold_everything() {
        let culture = Culture::new("es-es");
        assert_eq!(normalize("Çç vayÁ  cÓn Úna eÑes", &culture), "çç vayá cón úna eñes");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let culture = Culture::default();
        assert_eq!(normalize("  Hello \t\n  World  ", &culture), "hello world");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for code in ["en-us", "es-es"] {
            let culture = Culture::new(code);
            for text in ["  Çç   CAFÉ ", "Hello\tWORLD", "ΑΒΓ где"] {
                let once = normalize(text, &culture);
                assert_eq!(normalize(&once, &culture), once);
            }
        }
    }

    #[test]
    fn test_culture_case_folding() {
        assert_eq!(Culture::new("en-US").case_folding(), CaseFolding::AsciiOnly);
        assert_eq!(Culture::new("es-es").case_folding(), CaseFolding::Full);
    }
}
