//! Client and server capability structures exchanged during `initialize`

use super::{Content, JsonKind, Validator};
use crate::lsp::error::LspError;
use crate::lsp::identifier::field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Client Capabilities
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRegistration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_registration: Option<bool>,
}

impl DynamicRegistration {
    pub fn new(dynamic_registration: bool) -> Self {
        Self {
            dynamic_registration: Some(dynamic_registration),
        }
    }
}

impl Content for DynamicRegistration {
    const NAME: &'static str = "DynamicRegistration";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::DYNAMIC_REGISTRATION, JsonKind::Boolean)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceClientCapabilities {
    /// Client supports `workspace/applyEdit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_edit: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_edit: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_change_configuration: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_change_watched_files: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_command: Option<DynamicRegistration>,
}

impl Content for WorkspaceClientCapabilities {
    const NAME: &'static str = "WorkspaceClientCapabilities";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::APPLY_EDIT, JsonKind::Boolean)?
            .optional_content::<DynamicRegistration>(field::WORKSPACE_EDIT)?
            .optional_content::<DynamicRegistration>(field::DID_CHANGE_CONFIGURATION)?
            .optional_content::<DynamicRegistration>(field::DID_CHANGE_WATCHED_FILES)?
            .optional_content::<DynamicRegistration>(field::SYMBOL)?
            .optional_content::<DynamicRegistration>(field::EXECUTE_COMMAND)?;
        Ok(())
    }
}

/// Text synchronization features of the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynchronizationCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_registration: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_save: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_save_wait_until: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_save: Option<bool>,
}

impl Content for SynchronizationCapabilities {
    const NAME: &'static str = "Synchronization";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::DYNAMIC_REGISTRATION, JsonKind::Boolean)?
            .optional(field::WILL_SAVE, JsonKind::Boolean)?
            .optional(field::WILL_SAVE_WAIT_UNTIL, JsonKind::Boolean)?
            .optional(field::DID_SAVE, JsonKind::Boolean)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItemCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_support: Option<bool>,
}

impl Content for CompletionItemCapabilities {
    const NAME: &'static str = "CompletionItem";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.optional(field::SNIPPET_SUPPORT, JsonKind::Boolean)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_registration: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_item: Option<CompletionItemCapabilities>,
}

impl Content for CompletionCapabilities {
    const NAME: &'static str = "Completion";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::DYNAMIC_REGISTRATION, JsonKind::Boolean)?
            .optional_content::<CompletionItemCapabilities>(field::COMPLETION_ITEM)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synchronization: Option<SynchronizationCapabilities>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionCapabilities>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_help: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_highlight: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_symbol: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_formatting: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_type_formatting: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_action: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_lens: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_link: Option<DynamicRegistration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<DynamicRegistration>,
}

impl Content for TextDocumentClientCapabilities {
    const NAME: &'static str = "TextDocumentClientCapabilities";

    fn validate(data: &Value) -> Result<(), LspError> {
        let validator = Validator::object(Self::NAME, data)?
            .optional_content::<SynchronizationCapabilities>(field::SYNCHRONIZATION)?
            .optional_content::<CompletionCapabilities>(field::COMPLETION)?;

        for feature in [
            field::HOVER,
            field::SIGNATURE_HELP,
            field::REFERENCES,
            field::DOCUMENT_HIGHLIGHT,
            field::DOCUMENT_SYMBOL,
            field::FORMATTING,
            field::RANGE_FORMATTING,
            field::ON_TYPE_FORMATTING,
            field::DEFINITION,
            field::CODE_ACTION,
            field::CODE_LENS,
            field::DOCUMENT_LINK,
            field::RENAME,
        ] {
            validator.optional_content::<DynamicRegistration>(feature)?;
        }
        Ok(())
    }
}

/// Capabilities announced by the client in `initialize`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceClientCapabilities>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_document: Option<TextDocumentClientCapabilities>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<Value>,
}

impl ClientCapabilities {
    pub fn supports_apply_edit(&self) -> bool {
        self.workspace
            .as_ref()
            .and_then(|w| w.apply_edit)
            .unwrap_or(false)
    }
}

impl Content for ClientCapabilities {
    const NAME: &'static str = "ClientCapabilities";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional_content::<WorkspaceClientCapabilities>(field::WORKSPACE)?
            .optional_content::<TextDocumentClientCapabilities>(field::TEXT_DOCUMENT)?
            .optional(field::EXPERIMENTAL, JsonKind::Object)?;
        Ok(())
    }
}

// ============================================================================
// Server Capabilities
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOptions {
    /// Client should include the document content on save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_text: Option<bool>,
}

impl Content for SaveOptions {
    const NAME: &'static str = "SaveOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.optional(field::INCLUDE_TEXT, JsonKind::Boolean)?;
        Ok(())
    }
}

numeric_enum! {
    /// How the client syncs document changes to the server
    pub enum TextDocumentSyncKind {
        None = 0,
        Full = 1,
        Incremental = 2,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentSyncOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_close: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<TextDocumentSyncKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_save: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_save_wait_until: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveOptions>,
}

impl Content for TextDocumentSyncOptions {
    const NAME: &'static str = "TextDocumentSyncOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::OPEN_CLOSE, JsonKind::Boolean)?
            .optional_content::<TextDocumentSyncKind>(field::CHANGE)?
            .optional(field::WILL_SAVE, JsonKind::Boolean)?
            .optional(field::WILL_SAVE_WAIT_UNTIL, JsonKind::Boolean)?
            .optional_content::<SaveOptions>(field::SAVE)?;
        Ok(())
    }
}

/// `textDocumentSync` is either a bare kind or a full options object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextDocumentSync {
    Kind(TextDocumentSyncKind),
    Options(TextDocumentSyncOptions),
}

impl TextDocumentSync {
    /// Effective change kind regardless of which form was sent
    pub fn change_kind(&self) -> TextDocumentSyncKind {
        match self {
            Self::Kind(kind) => *kind,
            Self::Options(options) => options.change.unwrap_or(TextDocumentSyncKind::None),
        }
    }
}

impl Content for TextDocumentSync {
    const NAME: &'static str = "TextDocumentSync";

    fn validate(data: &Value) -> Result<(), LspError> {
        match data {
            Value::Number(_) => TextDocumentSyncKind::validate(data),
            Value::Object(_) => TextDocumentSyncOptions::validate(data),
            _ => Err(LspError::invalid(
                Self::NAME,
                "invalid data type, shall be 'number' or 'object'",
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_characters: Option<Vec<String>>,
}

impl Content for CompletionOptions {
    const NAME: &'static str = "CompletionOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::RESOLVE_PROVIDER, JsonKind::Boolean)?
            .optional(field::TRIGGER_CHARACTERS, JsonKind::ArrayOfString)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureHelpOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_characters: Option<Vec<String>>,
}

impl Content for SignatureHelpOptions {
    const NAME: &'static str = "SignatureHelpOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::TRIGGER_CHARACTERS, JsonKind::ArrayOfString)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeLensOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_provider: Option<bool>,
}

impl Content for CodeLensOptions {
    const NAME: &'static str = "CodeLensOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.optional(field::RESOLVE_PROVIDER, JsonKind::Boolean)?;
        Ok(())
    }
}

pub type DocumentLinkOptions = CodeLensOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOnTypeFormattingOptions {
    pub first_trigger_character: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_trigger_character: Option<Vec<String>>,
}

impl DocumentOnTypeFormattingOptions {
    pub fn new(first_trigger_character: impl Into<String>) -> Self {
        Self {
            first_trigger_character: first_trigger_character.into(),
            more_trigger_character: None,
        }
    }

    pub fn add_more_trigger_character(&mut self, character: impl Into<String>) {
        self.more_trigger_character
            .get_or_insert_with(Vec::new)
            .push(character.into());
    }
}

impl Content for DocumentOnTypeFormattingOptions {
    const NAME: &'static str = "DocumentOnTypeFormattingOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::FIRST_TRIGGER_CHARACTER, JsonKind::String)?
            .optional(field::MORE_TRIGGER_CHARACTER, JsonKind::ArrayOfString)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteCommandOptions {
    pub commands: Vec<String>,
}

impl ExecuteCommandOptions {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }
}

impl Content for ExecuteCommandOptions {
    const NAME: &'static str = "ExecuteCommandOptions";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required(field::COMMANDS, JsonKind::ArrayOfString)?;
        Ok(())
    }
}

/// Features the server announces in its `initialize` result
///
/// The default value announces nothing and serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_document_sync: Option<TextDocumentSync>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_provider: Option<CompletionOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_help_provider: Option<SignatureHelpOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_highlight_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_symbol_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_symbol_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_action_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_lens_provider: Option<CodeLensOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_formatting_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_range_formatting_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_on_type_formatting_provider: Option<DocumentOnTypeFormattingOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename_provider: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_link_provider: Option<DocumentLinkOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_command_provider: Option<ExecuteCommandOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<Value>,
}

impl Content for ServerCapabilities {
    const NAME: &'static str = "ServerCapabilities";

    fn validate(data: &Value) -> Result<(), LspError> {
        let validator = Validator::object(Self::NAME, data)?
            .optional_content::<TextDocumentSync>(field::TEXT_DOCUMENT_SYNC)?
            .optional_content::<CompletionOptions>(field::COMPLETION_PROVIDER)?
            .optional_content::<SignatureHelpOptions>(field::SIGNATURE_HELP_PROVIDER)?
            .optional_content::<CodeLensOptions>(field::CODE_LENS_PROVIDER)?
            .optional_content::<DocumentOnTypeFormattingOptions>(
                field::DOCUMENT_ON_TYPE_FORMATTING_PROVIDER,
            )?
            .optional_content::<DocumentLinkOptions>(field::DOCUMENT_LINK_PROVIDER)?
            .optional_content::<ExecuteCommandOptions>(field::EXECUTE_COMMAND_PROVIDER)?
            .optional(field::EXPERIMENTAL, JsonKind::Object)?;

        for provider in [
            field::HOVER_PROVIDER,
            field::DEFINITION_PROVIDER,
            field::REFERENCES_PROVIDER,
            field::DOCUMENT_HIGHLIGHT_PROVIDER,
            field::DOCUMENT_SYMBOL_PROVIDER,
            field::WORKSPACE_SYMBOL_PROVIDER,
            field::CODE_ACTION_PROVIDER,
            field::DOCUMENT_FORMATTING_PROVIDER,
            field::DOCUMENT_RANGE_FORMATTING_PROVIDER,
            field::RENAME_PROVIDER,
        ] {
            validator.optional(provider, JsonKind::Boolean)?;
        }
        Ok(())
    }
}
