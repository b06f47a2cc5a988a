//! Orchestrates the conversion of merged source documents into a model.
//!
//! Recognized top-level sections:
//!
//! ```yaml
//! intents:                 # or intents as top-level keys
//!   travel.book:
//!     - book a flight to [Madrid:city]
//!     - fly to ${city}
//! list.${city}:            # or `lists: {city: [...]}`
//!   - london
//!   - paris
//! phraselist:
//!   colors:
//!     activated: true
//!     mode: true
//!     words: [red, light blue]
//! builtin:
//!   - datetime
//! ```

use crate::config::ConverterConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::document::{self, scalar_to_string, SourceDocument};
use crate::entities::EntityRegistry;
use crate::error::ConvertError;
use crate::model::{Intent, Model, ModelFeature};
use crate::tokenizer::spaced_tokens;
use crate::utterance::{UtteranceBuilder, UtteranceSet};
use crate::validation::Validator;
use crate::variables::{VariableExpander, VariableTable};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

const INTENTS_SECTION: &str = "intents";
const LISTS_SECTION: &str = "lists";
const LIST_PREFIX: &str = "list.";
const PHRASELIST_SECTION: &str = "phraselist";
const BUILTIN_SECTION: &str = "builtin";

/// The finished model plus everything worth telling the author
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub model: Model,
    pub diagnostics: Diagnostics,
}

/// Merge `sources` and convert them into a model.
///
/// # Errors
///
/// Only structural problems are errors: see [`document::merge`]. Domain
/// problems end up in [`ParseOutput::diagnostics`] and the model is still
/// returned.
///
/// # Example
///
/// ```ignore
/// use language_model_converter::{parse, ConverterConfig, SourceDocument};
///
/// let source = SourceDocument::from_yaml_str("inline", "greet: [hi, hello, hey]")?;
/// let output = parse(&[source], &ConverterConfig::for_culture("en-us"))?;
/// assert_eq!(output.model.utterances.len(), 3);
/// ```
pub fn parse(sources: &[SourceDocument], config: &ConverterConfig) -> Result<ParseOutput, ConvertError> {
    let mut diagnostics = Diagnostics::new();
    let merged = document::merge(sources, &mut diagnostics)?;

    let assembler = ModelAssembler::new(config.clone());
    let output = assembler.assemble(&merged);
    diagnostics.extend(output.diagnostics);

    Ok(ParseOutput {
        model: output.model,
        diagnostics,
    })
}

/// Sections of a merged document, split by role
#[derive(Debug, Default)]
struct Sections<'a> {
    intents: IndexMap<String, Vec<String>>,
    lists: VariableTable,
    phraselist: Option<&'a Value>,
    builtin: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct PhraseListDef {
    activated: Option<bool>,
    mode: Option<bool>,
    words: Option<Vec<Value>>,
}

/// Builds a [`Model`] from one merged document
#[derive(Debug, Clone)]
pub struct ModelAssembler {
    config: ConverterConfig,
    builder: UtteranceBuilder,
    validator: Validator,
}

impl ModelAssembler {
    pub fn new(config: ConverterConfig) -> Self {
        let builder = UtteranceBuilder::new(config.culture.clone());
        let validator = Validator::new(config.validation.clone());
        Self {
            config,
            builder,
            validator,
        }
    }

    /// Convert a merged document. All working state is local to this call.
    pub fn assemble(&self, merged: &Mapping) -> ParseOutput {
        let mut diagnostics = Diagnostics::new();
        let sections = split_sections(merged, &mut diagnostics);

        let mut expander = VariableExpander::new(&sections.lists, self.config.expansion.max_variants);
        let mut entities = EntityRegistry::new();
        let mut utterances = UtteranceSet::new();

        for (intent, examples) in &sections.intents {
            self.validator.check_intent_name(intent, &mut diagnostics);

            for example in examples {
                self.validator.check_entity_whitespace(example, &mut diagnostics);
                self.validator.check_entity_values(example, &mut diagnostics);

                let expansion = expander.expand(example);
                if let Some(list) = &expansion.cycle {
                    diagnostics.error(
                        DiagnosticKind::CyclicList,
                        format!(
                            "The list \"{}\" refers to itself, \"{}\" in intent \"{}\" was not expanded",
                            list, example, intent
                        ),
                    );
                }
                if expansion.truncated {
                    diagnostics.error(
                        DiagnosticKind::ExpansionLimit,
                        format!(
                            "Expanding \"{}\" in intent \"{}\" stopped after {} variants",
                            example, intent, self.config.expansion.max_variants
                        ),
                    );
                }
                tracing::debug!(intent = %intent, variants = expansion.sentences.len(), "expanded example");

                for sentence in &expansion.sentences {
                    let utterance = self.builder.build(sentence, intent);
                    for span in &utterance.entities {
                        entities.register(&span.entity);
                    }

                    let text = utterance.text.clone();
                    if let Some(previous) = utterances.insert(utterance) {
                        self.validator
                            .report_conflicting_intents(&text, &previous, intent, &mut diagnostics);
                    }
                }
            }
        }

        let counts = utterances.counts_by_intent();
        self.validator.check_min_utterances(
            sections
                .intents
                .keys()
                .map(|intent| (intent.as_str(), counts.get(intent.as_str()).copied().unwrap_or(0))),
            &mut diagnostics,
        );
        self.validator.report_list_usage(&expander, &mut diagnostics);

        let features = self.build_features(sections.phraselist, &mut diagnostics);
        let builtin = match sections.builtin {
            Some(value) => string_items(value, BUILTIN_SECTION, &mut diagnostics),
            None => Vec::new(),
        };

        let info = &self.config.model;
        let mut model = Model::new(
            info.schema_version.clone(),
            info.name.clone(),
            info.description.clone(),
            self.config.culture.clone(),
        );
        model.intents = sections
            .intents
            .keys()
            .map(|name| Intent { name: name.clone() })
            .collect();
        model.entities = entities.into_entities();
        model.model_features = features;
        model.bing_entities = builtin;
        model.utterances = utterances.into_vec();

        tracing::debug!(
            intents = model.intents.len(),
            entities = model.entities.len(),
            utterances = model.utterances.len(),
            "assembled model"
        );

        ParseOutput { model, diagnostics }
    }

    fn build_features(&self, section: Option<&Value>, diagnostics: &mut Diagnostics) -> Vec<ModelFeature> {
        let lists = match section {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Mapping(lists)) => lists,
            Some(_) => {
                diagnostics.error(
                    DiagnosticKind::MalformedSection,
                    format!("Section \"{}\" must be a mapping of phrase lists", PHRASELIST_SECTION),
                );
                return Vec::new();
            }
        };

        let mut features = Vec::with_capacity(lists.len());
        for (key, def) in lists {
            let name = scalar_to_string(key).unwrap_or_else(|| format!("{:?}", key));

            let def: PhraseListDef = match def {
                Value::Null => PhraseListDef {
                    activated: None,
                    mode: None,
                    words: None,
                },
                other => match serde_yaml::from_value(other.clone()) {
                    Ok(def) => def,
                    Err(e) => {
                        diagnostics.error(
                            DiagnosticKind::MalformedSection,
                            format!("Phrase list \"{}\" is malformed: {}", name, e),
                        );
                        continue;
                    }
                },
            };

            let words: Vec<String> = def
                .words
                .unwrap_or_default()
                .iter()
                .filter_map(scalar_to_string)
                .filter(|word| self.validator.check_phrase_list_word(&name, word, diagnostics))
                .map(|word| spaced_tokens(&word))
                .collect();

            features.push(ModelFeature {
                name,
                mode: def.mode.unwrap_or(true),
                words: words.join(","),
                activated: def.activated.unwrap_or(true),
            });
        }
        features
    }
}

/// `list.${city}` and `list.city` both name the list `city`
fn list_name(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(LIST_PREFIX)?;
    let name = rest
        .strip_prefix("${")
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(rest);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Scalars of a sequence as strings. A lone scalar counts as a one-item
/// sequence and null as an empty one.
fn string_items(value: &Value, context: &str, diagnostics: &mut Diagnostics) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => {
            let mut strings = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Null => {}
                    Value::Sequence(_) | Value::Mapping(_) => diagnostics.error(
                        DiagnosticKind::MalformedSection,
                        format!("Entry in \"{}\" must be a single value, got {:?}", context, item),
                    ),
                    scalar => strings.extend(scalar_to_string(scalar)),
                }
            }
            strings
        }
        Value::Mapping(_) => {
            diagnostics.error(
                DiagnosticKind::MalformedSection,
                format!("\"{}\" must be a list of values, not a mapping", context),
            );
            Vec::new()
        }
        scalar => scalar_to_string(scalar).into_iter().collect(),
    }
}

fn split_sections<'a>(merged: &'a Mapping, diagnostics: &mut Diagnostics) -> Sections<'a> {
    let mut sections = Sections::default();

    for (key, value) in merged {
        let Some(key) = scalar_to_string(key) else {
            diagnostics.error(
                DiagnosticKind::MalformedSection,
                format!("Top-level key {:?} is not a name", key),
            );
            continue;
        };

        match key.as_str() {
            INTENTS_SECTION => match value {
                Value::Null => {}
                Value::Mapping(intents) => {
                    for (name, examples) in intents {
                        let name = scalar_to_string(name).unwrap_or_else(|| format!("{:?}", name));
                        let examples = string_items(examples, &name, diagnostics);
                        sections.intents.entry(name).or_default().extend(examples);
                    }
                }
                _ => diagnostics.error(
                    DiagnosticKind::MalformedSection,
                    format!("Section \"{}\" must be a mapping of intent names", INTENTS_SECTION),
                ),
            },
            LISTS_SECTION => match value {
                Value::Null => {}
                Value::Mapping(lists) => {
                    for (name, values) in lists {
                        let name = scalar_to_string(name).unwrap_or_else(|| format!("{:?}", name));
                        let values = string_items(values, &name, diagnostics);
                        sections.lists.insert(name, values);
                    }
                }
                _ => diagnostics.error(
                    DiagnosticKind::MalformedSection,
                    format!("Section \"{}\" must be a mapping of list names", LISTS_SECTION),
                ),
            },
            PHRASELIST_SECTION => sections.phraselist = Some(value),
            BUILTIN_SECTION => sections.builtin = Some(value),
            other if other.starts_with(PHRASELIST_SECTION) || other.starts_with(BUILTIN_SECTION) => {
                diagnostics.warning(
                    DiagnosticKind::ReservedKey,
                    format!("Top-level key \"{}\" is reserved and was ignored", other),
                );
            }
            other if other.starts_with(LIST_PREFIX) => match list_name(other) {
                Some(name) => {
                    let values = string_items(value, other, diagnostics);
                    sections.lists.insert(name, values);
                }
                None => diagnostics.error(
                    DiagnosticKind::MalformedSection,
                    format!("List key \"{}\" has no name", other),
                ),
            },
            _ => {
                let examples = string_items(value, &key, diagnostics);
                sections.intents.entry(key).or_default().extend(examples);
            }
        }
    }

    sections
}
