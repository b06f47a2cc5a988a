//! Source documents and the deep merge that combines them.
//!
//! Model definitions are usually split across several files. Each file is
//! deserialized into a [`SourceDocument`] and all of them are merged, in
//! order, into one mapping:
//!
//! - mapping + mapping: merged key by key
//! - sequence + sequence: union, first-seen order, no repeats
//! - anything else: the later value wins
//! - null or empty values never overwrite what is already there
//!
//! A key that is a mapping in one file and something else in another cannot
//! be merged and stops the pipeline.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ConvertError;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// A parsed input document and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// File name or any label used in messages
    pub origin: String,
    pub content: Value,
}

impl SourceDocument {
    pub fn new(origin: impl Into<String>, content: Value) -> Self {
        Self {
            origin: origin.into(),
            content,
        }
    }

    /// Parse YAML text into a document
    pub fn from_yaml_str(origin: impl Into<String>, text: &str) -> Result<Self, ConvertError> {
        let origin = origin.into();
        let content = serde_yaml::from_str(text).map_err(|source| ConvertError::Yaml {
            path: origin.clone(),
            source,
        })?;
        Ok(Self { origin, content })
    }
}

/// Render a scalar the way it would read in the source file.
///
/// Returns `None` for null, sequences and mappings.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

fn key_label(key: &Value) -> String {
    scalar_to_string(key).unwrap_or_else(|| format!("{:?}", key))
}

fn breadcrumb(path: &[String]) -> String {
    path.join("/")
}

/// Merge all sources, in order, into one mapping.
///
/// Each source is first checked on its own for sequences that repeat a
/// value; every such key gets one `DuplicateValues` warning. Repeats that
/// only appear once files are combined are absorbed silently.
///
/// # Errors
///
/// `InvalidDocument` if a source root is not a mapping, `MergeConflict` if a
/// key is a mapping in one source and not in another.
pub fn merge(sources: &[SourceDocument], diagnostics: &mut Diagnostics) -> Result<Mapping, ConvertError> {
    let mut merged = Value::Mapping(Mapping::new());

    for source in sources {
        match &source.content {
            Value::Null => {
                tracing::debug!(origin = %source.origin, "skipping empty document");
                continue;
            }
            Value::Mapping(_) => {}
            _ => {
                return Err(ConvertError::InvalidDocument {
                    origin: source.origin.clone(),
                })
            }
        }

        report_duplicates(&source.content, &mut Vec::new(), &source.origin, diagnostics);

        let mut path = Vec::new();
        merge_value(&mut merged, &source.content, &mut path, &source.origin)?;
        tracing::debug!(origin = %source.origin, "merged document");
    }

    match merged {
        Value::Mapping(map) => Ok(map),
        _ => Ok(Mapping::new()),
    }
}

fn merge_value(
    target: &mut Value,
    source: &Value,
    path: &mut Vec<String>,
    origin: &str,
) -> Result<(), ConvertError> {
    if is_empty(source) && !target.is_null() {
        return Ok(());
    }

    match (target, source) {
        (Value::Mapping(target_map), Value::Mapping(source_map)) => {
            merge_mappings(target_map, source_map, path, origin)
        }
        (target @ Value::Null, Value::Mapping(source_map)) => {
            let mut fresh = Mapping::new();
            merge_mappings(&mut fresh, source_map, path, origin)?;
            *target = Value::Mapping(fresh);
            Ok(())
        }
        (target, source) if target.is_mapping() || source.is_mapping() => Err(ConvertError::merge_conflict(
            origin,
            breadcrumb(path),
            format!(
                "{} in an earlier document, {} here",
                value_kind(target),
                value_kind(source)
            ),
        )),
        (Value::Sequence(target_seq), Value::Sequence(source_seq)) => {
            for item in source_seq {
                if !target_seq.contains(item) {
                    target_seq.push(item.clone());
                }
            }
            Ok(())
        }
        (target, Value::Sequence(source_seq)) => {
            let mut fresh = Vec::with_capacity(source_seq.len());
            for item in source_seq {
                if !fresh.contains(item) {
                    fresh.push(item.clone());
                }
            }
            *target = Value::Sequence(fresh);
            Ok(())
        }
        (target, scalar) => {
            *target = scalar.clone();
            Ok(())
        }
    }
}

fn merge_mappings(
    target: &mut Mapping,
    source: &Mapping,
    path: &mut Vec<String>,
    origin: &str,
) -> Result<(), ConvertError> {
    for (key, value) in source {
        path.push(key_label(key));
        let slot = target.entry(key.clone()).or_insert(Value::Null);
        let result = merge_value(slot, value, path, origin);
        path.pop();
        result?;
    }
    Ok(())
}

fn report_duplicates(value: &Value, path: &mut Vec<String>, origin: &str, diagnostics: &mut Diagnostics) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                path.push(key_label(key));
                report_duplicates(child, path, origin, diagnostics);
                path.pop();
            }
        }
        Value::Sequence(seq) => {
            let mut counts: IndexMap<&Value, usize> = IndexMap::new();
            for item in seq {
                *counts.entry(item).or_insert(0) += 1;
            }

            let duplicated: Vec<String> = counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(item, _)| format!("\"{}\"", key_label(item)))
                .collect();

            if !duplicated.is_empty() {
                diagnostics.warning(
                    DiagnosticKind::DuplicateValues,
                    format!(
                        "Duplicated values in \"{}\" ({}): {}",
                        breadcrumb(path),
                        origin,
                        duplicated.join(", ")
                    ),
                );
            }
        }
        _ => {}
    }
}
