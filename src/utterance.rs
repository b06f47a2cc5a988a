//! Turns one concrete example sentence into a normalized utterance.

use crate::entities::entity_pattern;
use crate::model::{EntitySpan, Utterance};
use crate::tokenizer::{normalize, word_count, Culture};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Builds utterances for a single culture
#[derive(Debug, Clone)]
pub struct UtteranceBuilder {
    culture: Culture,
}

impl UtteranceBuilder {
    pub fn new(culture: Culture) -> Self {
        Self { culture }
    }

    /// Strip the annotations out of `sentence` and record where each entity
    /// value lands in the token stream.
    ///
    /// `"Santiago went to [Santiago Bernabeu:place]."` becomes the text
    /// `"santiago went to santiago bernabeu."` with a `place` span over
    /// tokens 3..=4. Positions are counted on the concatenation before
    /// normalization; normalizing only folds case and whitespace, so the
    /// token sequence is the same.
    pub fn build(&self, sentence: &str, intent: &str) -> Utterance {
        let sentence = sentence.trim();
        let mut text = String::with_capacity(sentence.len());
        let mut entities = Vec::new();
        let mut last = 0;

        for caps in entity_pattern().captures_iter(sentence) {
            let (Some(whole), Some(value), Some(type_name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };

            text.push_str(&sentence[last..whole.start()]);
            last = whole.end();

            let start_token = word_count(&text);
            text.push_str(value.as_str());
            let tokens_after = word_count(&text);

            // a value made only of whitespace covers no token
            if tokens_after == start_token {
                continue;
            }

            entities.push(EntitySpan {
                entity: type_name.as_str().to_string(),
                start_token,
                end_token: tokens_after - 1,
            });
        }
        text.push_str(&sentence[last..]);

        Utterance {
            text: normalize(&text, &self.culture),
            intent: intent.to_string(),
            entities,
        }
    }
}

/// Utterances keyed by normalized text.
///
/// Two sentences that normalize to the same text are one utterance. The
/// last one inserted wins, but keeps the position of the first.
#[derive(Debug, Clone, Default)]
pub struct UtteranceSet {
    by_text: IndexMap<String, Utterance>,
}

impl UtteranceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `utterance`, returning the intent it displaced when the same
    /// text was already claimed by a different intent.
    pub fn insert(&mut self, utterance: Utterance) -> Option<String> {
        let conflict = self
            .by_text
            .get(&utterance.text)
            .filter(|existing| existing.intent != utterance.intent)
            .map(|existing| existing.intent.clone());

        self.by_text.insert(utterance.text.clone(), utterance);
        conflict
    }

    pub fn get(&self, text: &str) -> Option<&Utterance> {
        self.by_text.get(text)
    }

    /// Number of stored utterances per intent
    pub fn counts_by_intent(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for utterance in self.by_text.values() {
            *counts.entry(utterance.intent.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_text.is_empty()
    }

    pub fn into_vec(self) -> Vec<Utterance> {
        self.by_text.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn builder() -> UtteranceBuilder {
        UtteranceBuilder::new(Culture::new("en-us"))
    }

    fn span_text(utterance: &Utterance, index: usize) -> String {
        let span = &utterance.entities[index];
        tokenize(&utterance.text)[span.start_token..=span.end_token]
            .iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_build_single_entity() {
        let utterance = builder().build("go to [Madrid:city].", "intent.a");

        assert_eq!(utterance.text, "go to madrid.");
        assert_eq!(utterance.intent, "intent.a");
        assert_eq!(utterance.entities.len(), 1);
        assert_eq!(utterance.entities[0].entity, "city");
        assert_eq!(span_text(&utterance, 0), "madrid");
    }

    #[test]
    fn test_build_multi_word_entity() {
        let utterance = builder().build("Santiago went to the [Santiago Bernabeu:place].", "i");

        assert_eq!(utterance.text, "santiago went to the santiago bernabeu.");
        assert_eq!(utterance.entities[0].start_token, 4);
        assert_eq!(utterance.entities[0].end_token, 5);
    }

    #[test]
    fn test_build_entity_with_punctuation_tokens() {
        let utterance = builder().build("I'd like to go to [o'brian:location] and [l.a.:location]", "i");

        assert_eq!(utterance.text, "i'd like to go to o'brian and l.a.");
        assert_eq!((utterance.entities[0].start_token, utterance.entities[0].end_token), (7, 9));
        assert_eq!((utterance.entities[1].start_token, utterance.entities[1].end_token), (11, 14));
    }

    #[test]
    fn test_build_entity_at_start() {
        let utterance = builder().build("[Spain:country]", "i");

        assert_eq!(utterance.text, "spain");
        assert_eq!(utterance.entities[0].start_token, 0);
        assert_eq!(utterance.entities[0].end_token, 0);
    }

    #[test]
    fn test_build_keeps_composite_type_unsplit() {
        let utterance = builder().build("from [London:location::origin]", "i");
        assert_eq!(utterance.entities[0].entity, "location::origin");
    }

    #[test]
    fn test_build_collapses_spaces() {
        let utterance = builder().build("  i love   open spaces , like [bei   jing:location]  ", "i");

        assert_eq!(utterance.text, "i love open spaces , like bei jing");
        assert_eq!(span_text(&utterance, 0), "bei jing");
    }

    #[test]
    fn test_build_without_entities() {
        let utterance = builder().build("This is a test utterance 1", "i");
        assert_eq!(utterance.text, "this is a test utterance 1");
        assert!(utterance.entities.is_empty());
    }

    #[test]
    fn test_build_full_lowercase_for_other_cultures() {
        let builder = UtteranceBuilder::new(Culture::new("es-es"));
        let utterance = builder.build("Ní cigüenas en [PARÍS:location]", "i");

        assert_eq!(utterance.text, "ní cigüenas en parís");
        assert_eq!(utterance.entities[0].start_token, 3);
    }

    #[test]
    fn test_utterance_set_collapses_same_text() {
        let builder = builder();
        let mut set = UtteranceSet::new();

        assert_eq!(set.insert(builder.build("Hello  World", "greet")), None);
        assert_eq!(set.insert(builder.build("hello world", "greet")), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_utterance_set_reports_conflict_and_last_writer_wins() {
        let builder = builder();
        let mut set = UtteranceSet::new();

        set.insert(builder.build("hello world", "greet"));
        set.insert(builder.build("bye", "farewell"));
        let conflict = set.insert(builder.build("hello world", "other"));

        assert_eq!(conflict.as_deref(), Some("greet"));
        assert_eq!(set.get("hello world").unwrap().intent, "other");

        let texts: Vec<String> = set.into_vec().into_iter().map(|u| u.text).collect();
        assert_eq!(texts, vec!["hello world", "bye"]);
    }

    #[test]
    fn test_utterance_set_counts() {
        let builder = builder();
        let mut set = UtteranceSet::new();
        set.insert(builder.build("one", "a"));
        set.insert(builder.build("two", "a"));
        set.insert(builder.build("three", "b"));

        let counts = set.counts_by_intent();
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
    }
}
