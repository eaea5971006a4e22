//! Text document synchronization and language feature payloads

use super::{
    Command, Content, Diagnostic, JsonKind, Location, MarkedString, Range, TextDocumentIdentifier,
    TextDocumentItem, Validator, VersionedTextDocumentIdentifier, one_or_many,
};
use crate::lsp::error::LspError;
use crate::lsp::identifier::field;
use crate::lsp::uri::DocumentUri;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Synchronization
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidOpenTextDocumentParams {
    pub text_document: TextDocumentItem,
}

impl DidOpenTextDocumentParams {
    pub fn new(text_document: TextDocumentItem) -> Self {
        Self { text_document }
    }
}

impl Content for DidOpenTextDocumentParams {
    const NAME: &'static str = "DidOpenTextDocumentParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<TextDocumentItem>(field::TEXT_DOCUMENT)?;
        Ok(())
    }
}

/// One edit to a document; without a range the text replaces the whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentContentChangeEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_length: Option<u32>,

    pub text: String,
}

impl TextDocumentContentChangeEvent {
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            range: None,
            range_length: None,
            text: text.into(),
        }
    }

    pub fn incremental(range: Range, text: impl Into<String>) -> Self {
        Self {
            range: Some(range),
            range_length: None,
            text: text.into(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.range.is_none()
    }
}

impl Content for TextDocumentContentChangeEvent {
    const NAME: &'static str = "TextDocumentContentChangeEvent";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::TEXT, JsonKind::String)?
            .optional_content::<Range>(field::RANGE)?
            .optional(field::RANGE_LENGTH, JsonKind::Unsigned)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidChangeTextDocumentParams {
    pub text_document: VersionedTextDocumentIdentifier,
    pub content_changes: Vec<TextDocumentContentChangeEvent>,
}

impl DidChangeTextDocumentParams {
    pub fn new(
        text_document: VersionedTextDocumentIdentifier,
        content_changes: Vec<TextDocumentContentChangeEvent>,
    ) -> Self {
        Self {
            text_document,
            content_changes,
        }
    }
}

impl Content for DidChangeTextDocumentParams {
    const NAME: &'static str = "DidChangeTextDocumentParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<VersionedTextDocumentIdentifier>(field::TEXT_DOCUMENT)?
            .required_array_of::<TextDocumentContentChangeEvent>(field::CONTENT_CHANGES)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidCloseTextDocumentParams {
    pub text_document: TextDocumentIdentifier,
}

impl DidCloseTextDocumentParams {
    pub fn new(text_document: TextDocumentIdentifier) -> Self {
        Self { text_document }
    }
}

impl Content for DidCloseTextDocumentParams {
    const NAME: &'static str = "DidCloseTextDocumentParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<TextDocumentIdentifier>(field::TEXT_DOCUMENT)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidSaveTextDocumentParams {
    pub text_document: TextDocumentIdentifier,

    /// Present when the server asked for `includeText`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DidSaveTextDocumentParams {
    pub fn new(text_document: TextDocumentIdentifier) -> Self {
        Self {
            text_document,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl Content for DidSaveTextDocumentParams {
    const NAME: &'static str = "DidSaveTextDocumentParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<TextDocumentIdentifier>(field::TEXT_DOCUMENT)?
            .optional(field::TEXT, JsonKind::String)?;
        Ok(())
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Parameters of `textDocument/publishDiagnostics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishDiagnosticsParams {
    pub uri: DocumentUri,
    pub diagnostics: Vec<Diagnostic>,
}

impl PublishDiagnosticsParams {
    pub fn new(uri: DocumentUri, diagnostics: Vec<Diagnostic>) -> Self {
        Self { uri, diagnostics }
    }
}

impl Content for PublishDiagnosticsParams {
    const NAME: &'static str = "PublishDiagnosticsParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::URI, JsonKind::Uri)?
            .required_array_of::<Diagnostic>(field::DIAGNOSTICS)?;
        Ok(())
    }
}

// ============================================================================
// Hover and Definition
// ============================================================================

/// Result of `textDocument/hover`
///
/// `contents` is accepted as a single marked string or a list of them and
/// is always written back as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverResult {
    #[serde(deserialize_with = "one_or_many")]
    pub contents: Vec<MarkedString>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl HoverResult {
    pub fn new(contents: Vec<MarkedString>) -> Self {
        Self {
            contents,
            range: None,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn contents(&self) -> &[MarkedString] {
        &self.contents
    }
}

impl Content for HoverResult {
    const NAME: &'static str = "HoverResult";

    fn validate(data: &Value) -> Result<(), LspError> {
        let validator = Validator::object(Self::NAME, data)?.optional_content::<Range>(field::RANGE)?;
        match validator.get(field::CONTENTS) {
            Some(Value::Array(items)) => items.iter().try_for_each(MarkedString::validate),
            Some(single) => MarkedString::validate(single),
            None => Err(LspError::invalid(Self::NAME, "missing property 'contents'")),
        }
    }
}

/// Result of `textDocument/definition`
///
/// The wire form may be a single location, a list, or `null`; all three read
/// as a (possibly empty) list and are written back as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefinitionResult(pub Vec<Location>);

impl DefinitionResult {
    pub fn new(locations: Vec<Location>) -> Self {
        Self(locations)
    }

    pub fn locations(&self) -> &[Location] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for DefinitionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let locations = Option::<Value>::deserialize(deserializer)?
            .map(|value| {
                one_or_many::<_, Location>(value).map_err(serde::de::Error::custom)
            })
            .transpose()?
            .unwrap_or_default();
        Ok(Self(locations))
    }
}

impl Content for DefinitionResult {
    const NAME: &'static str = "DefinitionResult";

    fn validate(data: &Value) -> Result<(), LspError> {
        match data {
            Value::Null => Ok(()),
            Value::Array(items) => items.iter().try_for_each(Location::validate),
            Value::Object(_) => Location::validate(data),
            _ => Err(LspError::invalid(
                Self::NAME,
                "invalid data type, shall be 'object', 'array' or 'null'",
            )),
        }
    }
}

// ============================================================================
// Code Actions and Code Lenses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeActionContext {
    /// Diagnostics overlapping the requested range
    pub diagnostics: Vec<Diagnostic>,
}

impl CodeActionContext {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl Content for CodeActionContext {
    const NAME: &'static str = "CodeActionContext";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required_array_of::<Diagnostic>(field::DIAGNOSTICS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeActionParams {
    pub text_document: TextDocumentIdentifier,
    pub range: Range,
    pub context: CodeActionContext,
}

impl CodeActionParams {
    pub fn new(text_document: TextDocumentIdentifier, range: Range, context: CodeActionContext) -> Self {
        Self {
            text_document,
            range,
            context,
        }
    }
}

impl Content for CodeActionParams {
    const NAME: &'static str = "CodeActionParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<TextDocumentIdentifier>(field::TEXT_DOCUMENT)?
            .required_content::<Range>(field::RANGE)?
            .required_content::<CodeActionContext>(field::CONTEXT)?;
        Ok(())
    }
}

/// Commands offered for a range
pub type CodeActionResult = Vec<Command>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeLensParams {
    pub text_document: TextDocumentIdentifier,
}

impl CodeLensParams {
    pub fn new(text_document: TextDocumentIdentifier) -> Self {
        Self { text_document }
    }
}

impl Content for CodeLensParams {
    const NAME: &'static str = "CodeLensParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<TextDocumentIdentifier>(field::TEXT_DOCUMENT)?;
        Ok(())
    }
}

/// A command shown inline with source text
///
/// A lens without a command is unresolved; `data` is preserved between the
/// lens request and a later resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeLens {
    pub range: Range,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CodeLens {
    pub fn new(range: Range) -> Self {
        Self {
            range,
            command: None,
            data: None,
        }
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.command.is_some()
    }
}

impl Content for CodeLens {
    const NAME: &'static str = "CodeLens";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<Range>(field::RANGE)?
            .optional_content::<Command>(field::COMMAND)?;
        Ok(())
    }
}

pub type CodeLensResult = Vec<CodeLens>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsp::content::{DiagnosticSeverity, Position};
    use serde_json::json;

    fn uri(text: &str) -> DocumentUri {
        DocumentUri::parse(text).unwrap()
    }

    fn range(line: u32) -> Range {
        Range::new(Position::new(line, 0), Position::new(line, 4))
    }

    fn location_json(path: &str) -> Value {
        json!({
            "uri": format!("file://{path}"),
            "range": {"start": {"line": 1, "character": 0}, "end": {"line": 1, "character": 4}}
        })
    }

    #[test]
    fn test_did_open() {
        let params = DidOpenTextDocumentParams::from_value(json!({
            "textDocument": {
                "uri": "file:///main.rs",
                "languageId": "rust",
                "version": 1,
                "text": "fn main() {}"
            }
        }))
        .unwrap();
        assert_eq!(params.text_document.language_id, "rust");

        let err = DidOpenTextDocumentParams::from_value(json!({
            "textDocument": {"uri": "file:///main.rs", "languageId": "rust", "version": 1}
        }))
        .unwrap_err();
        assert_eq!(err.interface(), Some("TextDocumentItem"));
    }

    #[test]
    fn test_did_change_full_and_incremental() {
        let params = DidChangeTextDocumentParams::new(
            VersionedTextDocumentIdentifier::new(uri("file:///a.rs"), 2),
            vec![
                TextDocumentContentChangeEvent::full("all new"),
                TextDocumentContentChangeEvent::incremental(range(3), "x"),
            ],
        );
        let value = params.to_value().unwrap();
        assert!(value["contentChanges"][0].get("range").is_none());
        assert_eq!(value["contentChanges"][1]["range"]["start"]["line"], json!(3));

        let parsed = DidChangeTextDocumentParams::from_value(value).unwrap();
        assert!(parsed.content_changes[0].is_full());
        assert!(!parsed.content_changes[1].is_full());
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_did_change_requires_versioned_identifier() {
        let err = DidChangeTextDocumentParams::from_value(json!({
            "textDocument": {"uri": "file:///a.rs"},
            "contentChanges": []
        }))
        .unwrap_err();
        assert_eq!(err.interface(), Some("VersionedTextDocumentIdentifier"));
    }

    #[test]
    fn test_did_save_and_close() {
        let save = DidSaveTextDocumentParams::new(TextDocumentIdentifier::new(uri("file:///a.rs")))
            .with_text("body");
        assert_eq!(save.to_value().unwrap()["text"], json!("body"));

        let close = DidCloseTextDocumentParams::from_value(json!({"textDocument": {"uri": "file:///a.rs"}})).unwrap();
        assert_eq!(close.text_document.uri.path(), "/a.rs");
        assert!(!DidCloseTextDocumentParams::is_valid(&json!({"textDocument": "file:///a.rs"})));
    }

    #[test]
    fn test_publish_diagnostics() {
        let params = PublishDiagnosticsParams::new(
            uri("file:///a.rs"),
            vec![Diagnostic::new(range(0), "oops").with_severity(DiagnosticSeverity::Error)],
        );
        let value = params.to_value().unwrap();
        assert_eq!(value["diagnostics"][0]["severity"], json!(1));
        assert_eq!(PublishDiagnosticsParams::from_value(value).unwrap(), params);
    }

    #[test]
    fn test_hover_contents_normalised_to_list() {
        let single = HoverResult::from_value(json!({"contents": "docs"})).unwrap();
        assert_eq!(single.contents(), &[MarkedString::from("docs")]);
        assert_eq!(single.to_value().unwrap(), json!({"contents": ["docs"]}));

        let many = HoverResult::from_value(json!({
            "contents": ["a", {"language": "rust", "value": "fn a()"}],
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 1}}
        }))
        .unwrap();
        assert_eq!(many.contents().len(), 2);
        assert!(many.range.is_some());

        assert!(!HoverResult::is_valid(&json!({})));
        assert!(!HoverResult::is_valid(&json!({"contents": [1]})));
    }

    #[test]
    fn test_definition_result_shapes() {
        let none = DefinitionResult::from_value(json!(null)).unwrap();
        assert!(none.is_empty());

        let single = DefinitionResult::from_value(location_json("/a.rs")).unwrap();
        assert_eq!(single.locations().len(), 1);
        assert_eq!(single.locations()[0].uri.path(), "/a.rs");

        let many = DefinitionResult::from_value(json!([location_json("/a.rs"), location_json("/b.rs")])).unwrap();
        assert_eq!(many.locations().len(), 2);
        assert!(many.to_value().unwrap().is_array());

        assert!(!DefinitionResult::is_valid(&json!("file:///a.rs")));
        assert!(!DefinitionResult::is_valid(&json!([{"uri": "file:///a.rs"}])));
    }

    #[test]
    fn test_code_action_params_validate_context_diagnostics() {
        let params = CodeActionParams::new(
            TextDocumentIdentifier::new(uri("file:///a.rs")),
            range(2),
            CodeActionContext::new(vec![Diagnostic::new(range(2), "unused")]),
        );
        let value = params.to_value().unwrap();
        assert_eq!(CodeActionParams::from_value(value.clone()).unwrap(), params);

        let mut bad = value;
        bad["context"]["diagnostics"] = json!([{"message": "no range"}]);
        let err = CodeActionParams::from_value(bad).unwrap_err();
        assert_eq!(err.interface(), Some("Diagnostic"));
    }

    #[test]
    fn test_code_action_result_is_list_of_commands() {
        let result: CodeActionResult = vec![Command::new("Fix", "app.fix")];
        assert_eq!(result.to_value().unwrap(), json!([{"title": "Fix", "command": "app.fix"}]));
        assert!(!CodeActionResult::is_valid(&json!({"title": "Fix", "command": "app.fix"})));
    }

    #[test]
    fn test_code_lens() {
        let lens = CodeLens::new(range(5)).with_data(json!({"id": 1}));
        assert!(!lens.is_resolved());
        let resolved = lens.clone().with_command(Command::new("Run", "app.run"));
        assert!(resolved.is_resolved());

        let result: CodeLensResult = vec![lens, resolved];
        let value = result.to_value().unwrap();
        assert_eq!(CodeLensResult::from_value(value).unwrap(), result);

        assert!(!CodeLens::is_valid(&json!({"range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 0}}, "command": {"title": "x"}})));
        assert!(CodeLensParams::is_valid(&json!({"textDocument": {"uri": "file:///a"}})));
    }
}
