//! Warnings and errors collected while converting a model.
//!
//! Diagnostics never stop the pipeline. They are pushed into a
//! [`Diagnostics`] collection owned by a single `parse` call and handed back
//! together with the model, so the caller decides whether an error is fatal.

use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// The check that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A sequence repeats a value inside a single source document
    DuplicateValues,
    /// A declared list is never referenced by any example
    UnusedList,
    /// An example references a list that was never declared
    UndeclaredList,
    IntentNameTooLong,
    /// A word character sits right before an entity bracket
    MissingWhitespace,
    PhraseListComma,
    TooFewExamples,
    /// One normalized utterance is claimed by two intents
    ConflictingIntents,
    /// A section has a shape the converter cannot read
    MalformedSection,
    /// A top-level key starts with a section name but is not that section
    ReservedKey,
    /// An annotation whose value is blank, so it covers no token
    EmptyEntityValue,
    ExpansionLimit,
    /// A list reaches itself through its own values
    CyclicList,
}

/// A single warning or error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Ordered list of diagnostics recorded during one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. It is traced at debug level only; callers
    /// decide how to present the collected list.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(severity = %diagnostic.severity, kind = ?diagnostic.kind, "{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    pub fn warning(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic::warning(kind, message));
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic::error(kind, message));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// All diagnostics of the given kind, in recording order
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.items.iter().filter(|d| d.kind == kind).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
