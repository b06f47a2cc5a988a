//! Converter configuration.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration:
//!
//! ```yaml
//! culture: es-es
//! model:
//!   name: my-bot
//!   description: My Bot
//! validation:
//!   max_intent_name_length: 50
//!   min_utterances_per_intent: 3
//! expansion:
//!   max_variants: 1000000
//! ```

use crate::error::ConvertError;
use crate::tokenizer::Culture;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level converter configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub culture: Culture,
    #[serde(default)]
    pub model: ModelInfo,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
}

/// Header fields written into the model
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelInfo {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_model_description")]
    pub description: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            description: default_model_description(),
            schema_version: default_schema_version(),
        }
    }
}

/// Limits enforced by the validator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_intent_name_length")]
    pub max_intent_name_length: usize,
    #[serde(default = "default_min_utterances_per_intent")]
    pub min_utterances_per_intent: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_intent_name_length: default_max_intent_name_length(),
            min_utterances_per_intent: default_min_utterances_per_intent(),
        }
    }
}

/// Bounds on list expansion
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExpansionConfig {
    /// Maximum distinct sentences produced from one authored sentence
    #[serde(default = "default_max_variants")]
    pub max_variants: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_variants: default_max_variants(),
        }
    }
}

fn default_model_name() -> String {
    "bot-model".to_string()
}

fn default_model_description() -> String {
    "Bot Model".to_string()
}

fn default_schema_version() -> String {
    "1.3.0".to_string()
}

fn default_max_intent_name_length() -> usize {
    50
}

fn default_min_utterances_per_intent() -> usize {
    3
}

fn default_max_variants() -> usize {
    1_000_000
}

impl ConverterConfig {
    /// Default configuration for a culture
    pub fn for_culture(culture: impl Into<Culture>) -> Self {
        Self {
            culture: culture.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_yaml_str(&contents).map_err(|source| ConvertError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Reject settings no conversion could succeed with
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.culture.code().trim().is_empty() {
            return Err(ConvertError::Config("culture cannot be empty".to_string()));
        }
        if self.expansion.max_variants == 0 {
            return Err(ConvertError::Config(
                "expansion.max_variants must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();

        assert_eq!(config.culture.code(), "en-us");
        assert_eq!(config.model.schema_version, "1.3.0");
        assert_eq!(config.validation.max_intent_name_length, 50);
        assert_eq!(config.validation.min_utterances_per_intent, 3);
        assert_eq!(config.expansion.max_variants, 1_000_000);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ConverterConfig::from_yaml_str("culture: es-es\nvalidation:\n  min_utterances_per_intent: 5\n")
            .unwrap();

        assert_eq!(config.culture.code(), "es-es");
        assert_eq!(config.validation.min_utterances_per_intent, 5);
        assert_eq!(config.validation.max_intent_name_length, 50);
        assert_eq!(config.model.name, "bot-model");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ConverterConfig::from_yaml_str("  \n").unwrap(), ConverterConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model:\n  name: travel-bot").unwrap();

        let config = ConverterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.model.name, "travel-bot");
        assert_eq!(config.model.description, "Bot Model");
    }

    #[test]
    fn test_validate_rejects_zero_variants() {
        let mut config = ConverterConfig::default();
        config.expansion.max_variants = 0;
        assert!(matches!(config.validate(), Err(ConvertError::Config(_))));
    }
}
