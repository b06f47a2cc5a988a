//! Entity annotations inside example sentences.
//!
//! Examples tag entities inline as `[value:type]`, e.g. `[Burgos:city]`.
//! A type written as `parent::child` declares a hierarchical entity.
//! Brackets and colons cannot be escaped and annotations do not nest.

use crate::model::Entity;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::sync::LazyLock;

/// Separator between parent and child in a composite entity type
pub const COMPOSITE_SEPARATOR: &str = "::";

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?):(.+?)\]").expect("entity pattern is valid"));

/// The `[value:type]` pattern shared by extraction and utterance building
pub(crate) fn entity_pattern() -> &'static Regex {
    &ENTITY_PATTERN
}

/// One `[value:type]` annotation found in a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityAnnotation<'a> {
    pub value: &'a str,
    pub type_name: &'a str,
}

/// Find every annotation in `sentence`, left to right, non-overlapping.
pub fn extract(sentence: &str) -> Vec<EntityAnnotation<'_>> {
    ENTITY_PATTERN
        .captures_iter(sentence)
        .filter_map(|caps| {
            Some(EntityAnnotation {
                value: caps.get(1)?.as_str(),
                type_name: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// Split `parent::child` into its parts; plain types have no child.
///
/// Only the first separator counts: `a::b::c` is parent `a`, child `b::c`.
pub fn split_composite(type_name: &str) -> (&str, Option<&str>) {
    match type_name.split_once(COMPOSITE_SEPARATOR) {
        Some((parent, child)) => (parent, Some(child)),
        None => (type_name, None),
    }
}

/// Entity types discovered so far, keyed by parent in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: IndexMap<String, IndexSet<String>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type name as it appears in an annotation
    pub fn register(&mut self, type_name: &str) {
        let (parent, child) = split_composite(type_name);
        let children = self.entities.entry(parent.to_string()).or_default();
        if let Some(child) = child {
            children.insert(child.to_string());
        }
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
            .into_iter()
            .map(|(name, children)| Entity {
                name,
                children: children.into_iter().collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_entities() {
        let found = extract("from [London:location::origin] to [Madrid:location::destination]");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "London");
        assert_eq!(found[0].type_name, "location::origin");
        assert_eq!(found[1].value, "Madrid");
        assert_eq!(found[1].type_name, "location::destination");
    }

    #[test]
    fn test_extract_value_with_spaces_and_punctuation() {
        let found = extract("I'd go to [o'brian:location] and [l.a.:location]");
        let values: Vec<&str> = found.iter().map(|e| e.value).collect();
        assert_eq!(values, vec!["o'brian", "l.a."]);
    }

    #[test]
    fn test_extract_first_colon_separates() {
        let found = extract("[a:b:c]");
        assert_eq!(found[0].value, "a");
        assert_eq!(found[0].type_name, "b:c");
    }

    #[test]
    fn test_extract_ignores_incomplete_annotations() {
        assert!(extract("no entities [here] or :there").is_empty());
        assert!(extract("[:type]").is_empty());
    }

    #[test]
    fn test_split_composite() {
        assert_eq!(split_composite("location::origin"), ("location", Some("origin")));
        assert_eq!(split_composite("country"), ("country", None));
        assert_eq!(split_composite("a::b::c"), ("a", Some("b::c")));
    }

    #[test]
    fn test_registry_keeps_first_seen_order_and_unique_children() {
        let mut registry = EntityRegistry::new();
        registry.register("location::origin");
        registry.register("location::destination");
        registry.register("country");
        registry.register("location::origin");

        let entities = registry.into_entities();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name, "location");
        assert_eq!(entities[0].children, vec!["origin", "destination"]);
        assert_eq!(entities[1].name, "country");
        assert!(entities[1].children.is_empty());
    }
}
