//! Substitution lists and `${name}` placeholder expansion.
//!
//! A list declared as
//!
//! ```yaml
//! list.${country}:
//!   - spain
//!   - france
//! ```
//!
//! turns `"flights to ${country}"` into one sentence per value. Sentences
//! referencing several lists expand to every combination, so the number of
//! results is the product of the list sizes.

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::sync::LazyLock;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Literal placeholder text for a list name
pub fn placeholder(name: &str) -> String {
    format!("${{{}}}", name)
}

/// Names of every `${name}` placeholder in `sentence`, in order of appearance
pub fn placeholders(sentence: &str) -> Vec<&str> {
    PLACEHOLDER_PATTERN
        .captures_iter(sentence)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Declared substitution lists, in declaration order, values deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    lists: IndexMap<String, Vec<String>>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values to a list, creating it if needed. Repeated values are dropped.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.lists.entry(name.into()).or_default();
        for value in values {
            let value = value.into();
            if !list.contains(&value) {
                list.push(value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    /// The declared name and values of a list
    pub fn entry(&self, name: &str) -> Option<(&str, &[String])> {
        self.lists
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Result of expanding one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Concrete sentences, distinct, in generation order
    pub sentences: Vec<String>,
    /// More than `max_variants` distinct sentences exist; `sentences` holds the first ones
    pub truncated: bool,
    /// A list reachable from the sentence refers back to itself, so
    /// expansion never finishes. Nothing is expanded in that case.
    pub cycle: Option<String>,
}

/// Expands sentences against a [`VariableTable`], remembering which lists
/// were used and which referenced lists do not exist.
#[derive(Debug)]
pub struct VariableExpander<'t> {
    table: &'t VariableTable,
    max_variants: usize,
    used: IndexSet<String>,
    missing: IndexSet<String>,
}

impl<'t> VariableExpander<'t> {
    /// # Arguments
    ///
    /// * `table` - Declared lists
    /// * `max_variants` - Upper bound on distinct sentences produced from one input sentence
    pub fn new(table: &'t VariableTable, max_variants: usize) -> Self {
        Self {
            table,
            max_variants,
            used: IndexSet::new(),
            missing: IndexSet::new(),
        }
    }

    /// Expand every placeholder in `sentence`.
    ///
    /// Works through a queue of partially expanded variants: each step
    /// replaces the first occurrence of the first declared list found in the
    /// variant with each of that list's values. Variants with nothing left
    /// to replace are finished. Undeclared placeholders are left as written.
    pub fn expand(&mut self, sentence: &str) -> Expansion {
        for name in placeholders(sentence) {
            if !self.table.contains(name) {
                self.missing.insert(name.to_string());
            }
        }

        if let Some(list) = self.find_cycle(sentence) {
            tracing::debug!(sentence, list, "list refers to itself, sentence not expanded");
            self.used.insert(list.to_string());
            return Expansion {
                sentences: Vec::new(),
                truncated: false,
                cycle: Some(list.to_string()),
            };
        }

        let mut queue = VecDeque::from([sentence.to_string()]);
        let mut finished: IndexSet<String> = IndexSet::new();
        let mut truncated = false;

        while let Some(variant) = queue.pop_front() {
            let Some((name, values)) = self.first_replaceable(&variant) else {
                if !finished.contains(&variant) {
                    if finished.len() >= self.max_variants {
                        truncated = true;
                        break;
                    }
                    finished.insert(variant);
                }
                continue;
            };

            self.used.insert(name.to_string());
            let search = placeholder(name);
            for value in values {
                queue.push_back(variant.replacen(&search, value, 1));
            }
        }

        if truncated {
            tracing::debug!(sentence, max_variants = self.max_variants, "expansion stopped at the variant limit");
        }

        Expansion {
            sentences: finished.into_iter().collect(),
            truncated,
            cycle: None,
        }
    }

    /// First list on a reference cycle reachable from `sentence`. Only
    /// non-empty lists count, empty ones are never substituted.
    fn find_cycle(&self, sentence: &str) -> Option<&'t str> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        placeholders(sentence)
            .into_iter()
            .find_map(|name| self.visit(name, &mut path, &mut done))
    }

    fn visit(&self, name: &str, path: &mut Vec<&'t str>, done: &mut HashSet<&'t str>) -> Option<&'t str> {
        let (name, values) = self.table.entry(name).filter(|(_, values)| !values.is_empty())?;
        if path.contains(&name) {
            return Some(name);
        }
        if done.contains(name) {
            return None;
        }

        path.push(name);
        let cycle = values
            .iter()
            .flat_map(|value| placeholders(value))
            .find_map(|next| self.visit(next, path, done));
        path.pop();
        done.insert(name);
        cycle
    }

    fn first_replaceable(&self, variant: &str) -> Option<(&'t str, &'t [String])> {
        self.table
            .iter()
            .find(|(name, values)| !values.is_empty() && variant.contains(&placeholder(name)))
    }

    pub fn used_keys(&self) -> &IndexSet<String> {
        &self.used
    }

    /// Referenced but undeclared list names, in first-seen order
    pub fn missing_keys(&self) -> &IndexSet<String> {
        &self.missing
    }

    /// Declared lists no sentence has referenced so far
    pub fn unused_keys(&self) -> Vec<&'t str> {
        self.table
            .names()
            .filter(|name| !self.used.contains(*name))
            .collect()
    }
}
