//! Checks on the authored input.
//!
//! Every check records diagnostics and returns; none of them stops the
//! conversion.

use crate::config::ValidationConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::entities::extract;
use crate::variables::VariableExpander;
use regex::Regex;
use std::sync::LazyLock;

/// A word glued to an entity annotation, as in `word[value:type]`
static MISSING_WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\[.+?:.+?\]").expect("whitespace pattern is valid"));

#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Intent names longer than the service accepts are an error.
    pub fn check_intent_name(&self, intent: &str, diagnostics: &mut Diagnostics) -> bool {
        let length = intent.chars().count();
        if length <= self.config.max_intent_name_length {
            return true;
        }

        diagnostics.error(
            DiagnosticKind::IntentNameTooLong,
            format!(
                "Intent \"{}\" should be less than {} characters. was {}",
                intent, self.config.max_intent_name_length, length
            ),
        );
        false
    }

    /// An annotation glued to the previous word would merge with it into a
    /// single token and shift every entity position.
    pub fn check_entity_whitespace(&self, sentence: &str, diagnostics: &mut Diagnostics) -> bool {
        let mut ok = true;
        for fragment in MISSING_WHITESPACE_PATTERN.find_iter(sentence) {
            diagnostics.error(
                DiagnosticKind::MissingWhitespace,
                format!(
                    "White space missing before entity declaration in entry \"{}\" -> \"{}\"",
                    sentence,
                    fragment.as_str()
                ),
            );
            ok = false;
        }
        ok
    }

    /// Phrase list words are joined with commas, so they cannot hold one.
    /// A blank annotation value such as `[ :city]` would be dropped from the
    /// utterance without a span.
    pub fn check_entity_values(&self, sentence: &str, diagnostics: &mut Diagnostics) -> bool {
        let mut ok = true;
        for annotation in extract(sentence) {
            if annotation.value.trim().is_empty() {
                diagnostics.error(
                    DiagnosticKind::EmptyEntityValue,
                    format!(
                        "Entity \"{}\" has an empty value in entry \"{}\"",
                        annotation.type_name, sentence
                    ),
                );
                ok = false;
            }
        }
        ok
    }

    pub fn check_phrase_list_word(&self, list: &str, word: &str, diagnostics: &mut Diagnostics) -> bool {
        if !word.contains(',') {
            return true;
        }

        diagnostics.error(
            DiagnosticKind::PhraseListComma,
            format!("Phrase list \"{}\" can not contain commas ('{}')", list, word),
        );
        false
    }

    /// One aggregated error naming every intent below the minimum.
    ///
    /// # Arguments
    ///
    /// * `counts` - Intent name and its number of distinct utterances
    pub fn check_min_utterances<'a, I>(&self, counts: I, diagnostics: &mut Diagnostics)
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let min = self.config.min_utterances_per_intent;
        let short: Vec<&str> = counts
            .into_iter()
            .filter(|(_, count)| *count < min)
            .map(|(intent, _)| intent)
            .collect();

        if short.is_empty() {
            return;
        }

        let listing: String = short.iter().map(|intent| format!("\n - {}", intent)).collect();
        diagnostics.error(
            DiagnosticKind::TooFewExamples,
            format!("The following intents have less than {} examples:{}", min, listing),
        );
    }

    pub fn report_conflicting_intents(
        &self,
        text: &str,
        previous: &str,
        current: &str,
        diagnostics: &mut Diagnostics,
    ) {
        diagnostics.error(
            DiagnosticKind::ConflictingIntents,
            format!(
                "Utterance \"{}\" is assigned to more than one intent: \"{}\" and \"{}\"",
                text, previous, current
            ),
        );
    }

    /// Warn about referenced-but-undeclared and declared-but-unused lists.
    pub fn report_list_usage(&self, expander: &VariableExpander<'_>, diagnostics: &mut Diagnostics) {
        for name in expander.missing_keys() {
            diagnostics.warning(
                DiagnosticKind::UndeclaredList,
                format!("The list \"{}\" is used in some example but has not been declared", name),
            );
        }
        for name in expander.unused_keys() {
            diagnostics.warning(
                DiagnosticKind::UnusedList,
                format!("The list \"{}\" has been declared but is not used in any example", name),
            );
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
