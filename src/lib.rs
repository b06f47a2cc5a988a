//! # Language Model Converter
//!
//! Converts compact YAML definitions of chatbot intents into the training
//! model format of an NLU service.
//!
//! ## Features
//!
//! - **Multi-file models**: sources are deep-merged, lists unioned
//! - **Entity annotations**: `[value:type]` inline, `parent::child` hierarchies
//! - **Substitution lists**: `${name}` placeholders expand to every combination
//! - **Service-compatible tokenization**: entity positions match the service's tokenizer
//! - **Diagnostics**: warnings and errors are returned with the model, never thrown
//!
//! ## Example
//!
//! ```yaml
//! list.${city}:
//!   - London
//!   - Paris
//!
//! travel.book:
//!   - book a flight to [Madrid:location::destination]
//!   - I want to fly from [${city}:location::origin]
//!   - fly to ${city} please
//!
//! phraselist:
//!   airlines:
//!     words: [Iberia, Air France]
//!
//! builtin:
//!   - datetime
//! ```

pub mod assembler;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod entities;
pub mod error;
pub mod loader;
pub mod model;
pub mod tokenizer;
pub mod utterance;
pub mod validation;
pub mod variables;

// Re-export key types
pub use assembler::{parse, ModelAssembler, ParseOutput};
pub use config::{ConverterConfig, ExpansionConfig, ModelInfo, ValidationConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use document::{merge, SourceDocument};
pub use entities::{extract, split_composite, EntityAnnotation, EntityRegistry};
pub use error::ConvertError;
pub use model::{Entity, EntitySpan, Intent, Model, ModelFeature, Utterance};
pub use tokenizer::{normalize, tokenize, word_count, Culture, Token};
pub use utterance::{UtteranceBuilder, UtteranceSet};
pub use validation::Validator;
pub use variables::{Expansion, VariableExpander, VariableTable};
