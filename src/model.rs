//! Training model record handed to the NLU service.
//!
//! Field names follow the service's import format, which is why some of
//! them are snake_case and others camelCase on the wire.

use crate::tokenizer::Culture;
use serde::{Deserialize, Serialize};

/// Complete training model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub luis_schema_version: String,
    pub name: String,
    pub desc: String,
    pub culture: Culture,
    pub intents: Vec<Intent>,
    pub entities: Vec<Entity>,
    /// Always empty; no source section produces composites
    pub composites: Vec<serde_json::Value>,
    /// Prebuilt entity names from the `builtin` section
    pub bing_entities: Vec<String>,
    pub actions: Vec<serde_json::Value>,
    pub model_features: Vec<ModelFeature>,
    pub regex_features: Vec<serde_json::Value>,
    pub utterances: Vec<Utterance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
}

/// Entity type, optionally with child subtypes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

/// A phrase list feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFeature {
    pub name: String,
    pub mode: bool,
    /// Comma-joined words, each one re-spaced token by token
    pub words: String,
    pub activated: bool,
}

/// One normalized example sentence with its intent and entity spans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub intent: String,
    pub entities: Vec<EntitySpan>,
}

/// Entity position over the utterance tokens, both ends inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Type name as annotated, composite types unsplit (`parent::child`)
    pub entity: String,
    #[serde(rename = "startPos")]
    pub start_token: usize,
    #[serde(rename = "endPos")]
    pub end_token: usize,
}

impl Model {
    /// Empty model carrying only the header fields
    pub fn new(
        schema_version: impl Into<String>,
        name: impl Into<String>,
        desc: impl Into<String>,
        culture: Culture,
    ) -> Self {
        Self {
            luis_schema_version: schema_version.into(),
            name: name.into(),
            desc: desc.into(),
            culture,
            intents: Vec::new(),
            entities: Vec::new(),
            composites: Vec::new(),
            bing_entities: Vec::new(),
            actions: Vec::new(),
            model_features: Vec::new(),
            regex_features: Vec::new(),
            utterances: Vec::new(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Utterances labelled with `intent`
    pub fn utterances_for<'a>(&'a self, intent: &'a str) -> impl Iterator<Item = &'a Utterance> {
        self.utterances.iter().filter(move |u| u.intent == intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let mut model = Model::new("1.3.0", "bot", "Bot Model", Culture::new("en-us"));
        model.entities.push(Entity {
            name: "country".to_string(),
            children: vec![],
        });
        model.utterances.push(Utterance {
            text: "go to spain".to_string(),
            intent: "travel".to_string(),
            entities: vec![EntitySpan {
                entity: "country".to_string(),
                start_token: 2,
                end_token: 2,
            }],
        });

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["culture"], json!("en-us"));
        assert_eq!(value["entities"][0], json!({"name": "country"}));
        assert_eq!(
            value["utterances"][0]["entities"][0],
            json!({"entity": "country", "startPos": 2, "endPos": 2})
        );
        assert_eq!(value["composites"], json!([]));
        assert_eq!(value["regex_features"], json!([]));
    }

    #[test]
    fn test_children_serialized_when_present() {
        let entity = Entity {
            name: "location".to_string(),
            children: vec!["origin".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&entity).unwrap(),
            json!({"name": "location", "children": ["origin"]})
        );
    }
}
