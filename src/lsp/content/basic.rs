//! Basic structures shared across requests and notifications

use super::{Content, JsonKind, NumberOrString, Validator};
use crate::lsp::error::LspError;
use crate::lsp::identifier::field;
use crate::lsp::uri::DocumentUri;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Positions and Locations
// ============================================================================

/// Zero-based line and character offset in a text document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl Content for Position {
    const NAME: &'static str = "Position";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::LINE, JsonKind::Unsigned)?
            .required(field::CHARACTER, JsonKind::Unsigned)?;
        Ok(())
    }
}

/// Half-open range between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}

impl Content for Range {
    const NAME: &'static str = "Range";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<Position>(field::START)?
            .required_content::<Position>(field::END)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: DocumentUri,
    pub range: Range,
}

impl Location {
    pub fn new(uri: DocumentUri, range: Range) -> Self {
        Self { uri, range }
    }
}

impl Content for Location {
    const NAME: &'static str = "Location";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::URI, JsonKind::Uri)?
            .required_content::<Range>(field::RANGE)?;
        Ok(())
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

numeric_enum! {
    pub enum DiagnosticSeverity {
        Error = 1,
        Warning = 2,
        Information = 3,
        Hint = 4,
    }
}

/// A compiler error, warning or hint attached to a range of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosticSeverity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<NumberOrString>,

    /// Human-readable origin, e.g. `rustc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub message: String,
}

impl Diagnostic {
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: None,
            code: None,
            source: None,
            message: message.into(),
        }
    }

    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_code(mut self, code: impl Into<NumberOrString>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Content for Diagnostic {
    const NAME: &'static str = "Diagnostic";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<Range>(field::RANGE)?
            .required(field::MESSAGE, JsonKind::String)?
            .optional_content::<DiagnosticSeverity>(field::SEVERITY)?
            .optional(field::CODE, JsonKind::StringOrInteger)?
            .optional(field::SOURCE, JsonKind::String)?;
        Ok(())
    }
}

// ============================================================================
// Commands and Edits
// ============================================================================

/// Reference to a command the client can execute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub title: String,
    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Value>>,
}

impl Command {
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

impl Content for Command {
    const NAME: &'static str = "Command";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::TITLE, JsonKind::String)?
            .required(field::COMMAND, JsonKind::String)?
            .optional(field::ARGUMENTS, JsonKind::Array)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

impl Content for TextEdit {
    const NAME: &'static str = "TextEdit";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<Range>(field::RANGE)?
            .required(field::NEW_TEXT, JsonKind::String)?;
        Ok(())
    }
}

// ============================================================================
// Text Documents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextDocumentIdentifier {
    pub uri: DocumentUri,
}

impl TextDocumentIdentifier {
    pub fn new(uri: DocumentUri) -> Self {
        Self { uri }
    }
}

impl Content for TextDocumentIdentifier {
    const NAME: &'static str = "TextDocumentIdentifier";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required(field::URI, JsonKind::Uri)?;
        Ok(())
    }
}

/// Document identifier pinned to a specific version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedTextDocumentIdentifier {
    pub uri: DocumentUri,
    pub version: i32,
}

impl VersionedTextDocumentIdentifier {
    pub fn new(uri: DocumentUri, version: i32) -> Self {
        Self { uri, version }
    }
}

impl Content for VersionedTextDocumentIdentifier {
    const NAME: &'static str = "VersionedTextDocumentIdentifier";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::URI, JsonKind::Uri)?
            .required(field::VERSION, JsonKind::Integer)?;
        Ok(())
    }
}

/// Full content of a document as transferred on open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentItem {
    pub uri: DocumentUri,
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

impl TextDocumentItem {
    pub fn new(
        uri: DocumentUri,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }
}

impl Content for TextDocumentItem {
    const NAME: &'static str = "TextDocumentItem";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::URI, JsonKind::Uri)?
            .required(field::LANGUAGE_ID, JsonKind::String)?
            .required(field::VERSION, JsonKind::Integer)?
            .required(field::TEXT, JsonKind::String)?;
        Ok(())
    }
}

/// A document plus a position inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentPositionParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

impl TextDocumentPositionParams {
    pub fn new(text_document: TextDocumentIdentifier, position: Position) -> Self {
        Self {
            text_document,
            position,
        }
    }
}

impl Content for TextDocumentPositionParams {
    const NAME: &'static str = "TextDocumentPositionParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<TextDocumentIdentifier>(field::TEXT_DOCUMENT)?
            .required_content::<Position>(field::POSITION)?;
        Ok(())
    }
}

pub type HoverParams = TextDocumentPositionParams;
pub type DefinitionParams = TextDocumentPositionParams;

// ============================================================================
// Workspace Edits
// ============================================================================

/// Edits against one specific version of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentEdit {
    pub text_document: VersionedTextDocumentIdentifier,
    pub edits: Vec<TextEdit>,
}

impl TextDocumentEdit {
    pub fn new(text_document: VersionedTextDocumentIdentifier, edits: Vec<TextEdit>) -> Self {
        Self {
            text_document,
            edits,
        }
    }
}

impl Content for TextDocumentEdit {
    const NAME: &'static str = "TextDocumentEdit";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<VersionedTextDocumentIdentifier>(field::TEXT_DOCUMENT)?
            .required_array_of::<TextEdit>(field::EDITS)?;
        Ok(())
    }
}

/// Changes to many resources managed in the workspace
///
/// Either `changes` (keyed by document URI) or `documentChanges` may be
/// given; both are optional and an empty edit is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<String, Vec<TextEdit>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_changes: Option<Vec<TextDocumentEdit>>,
}

impl WorkspaceEdit {
    pub fn from_document_changes(document_changes: Vec<TextDocumentEdit>) -> Self {
        Self {
            changes: None,
            document_changes: Some(document_changes),
        }
    }

    /// Add edits for one document to the `changes` map
    pub fn add_changes(&mut self, uri: &DocumentUri, edits: Vec<TextEdit>) {
        self.changes
            .get_or_insert_with(BTreeMap::new)
            .entry(uri.to_string())
            .or_default()
            .extend(edits);
    }
}

impl Content for WorkspaceEdit {
    const NAME: &'static str = "WorkspaceEdit";

    fn validate(data: &Value) -> Result<(), LspError> {
        let validator = Validator::object(Self::NAME, data)?
            .optional(field::CHANGES, JsonKind::Object)?
            .optional_array_of::<TextDocumentEdit>(field::DOCUMENT_CHANGES)?;

        if let Some(changes) = validator.get(field::CHANGES).and_then(Value::as_object) {
            for (uri, edits) in changes {
                if !JsonKind::Uri.matches(&Value::String(uri.clone())) {
                    return Err(LspError::invalid(
                        Self::NAME,
                        format!("invalid document URI '{uri}' in 'changes'"),
                    ));
                }
                Validator::array_of::<TextEdit>(Self::NAME, edits)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Document Selectors
// ============================================================================

/// Denotes a set of documents by language, scheme and/or glob pattern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl DocumentFilter {
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

impl Content for DocumentFilter {
    const NAME: &'static str = "DocumentFilter";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::LANGUAGE, JsonKind::String)?
            .optional(field::SCHEME, JsonKind::String)?
            .optional(field::PATTERN, JsonKind::String)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSelector(pub Vec<DocumentFilter>);

impl Content for DocumentSelector {
    const NAME: &'static str = "DocumentSelector";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::array_of::<DocumentFilter>(Self::NAME, data)
    }
}

// ============================================================================
// Marked Strings
// ============================================================================

/// Markdown text, or a code block in a named language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkedString {
    String(String),
    LanguageString { language: String, value: String },
}

impl MarkedString {
    pub fn code(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self::LanguageString {
            language: language.into(),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::String(value) | Self::LanguageString { value, .. } => value,
        }
    }
}

impl From<&str> for MarkedString {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl Content for MarkedString {
    const NAME: &'static str = "MarkedString";

    fn validate(data: &Value) -> Result<(), LspError> {
        if data.is_string() {
            return Ok(());
        }
        Validator::object(Self::NAME, data)
            .map_err(|_| LspError::invalid(Self::NAME, "invalid data type, shall be 'string' or 'object'"))?
            .required(field::LANGUAGE, JsonKind::String)?
            .required(field::VALUE, JsonKind::String)?;
        Ok(())
    }
}
