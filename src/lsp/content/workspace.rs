//! Workspace-level requests and notifications

use super::{Command, Content, JsonKind, Validator, WorkspaceEdit};
use crate::lsp::error::LspError;
use crate::lsp::identifier::field;
use crate::lsp::uri::DocumentUri;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceFolder {
    pub uri: DocumentUri,

    /// Name shown in the user interface
    pub name: String,
}

impl WorkspaceFolder {
    pub fn new(uri: DocumentUri, name: impl Into<String>) -> Self {
        Self {
            uri,
            name: name.into(),
        }
    }
}

impl Content for WorkspaceFolder {
    const NAME: &'static str = "WorkspaceFolder";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::URI, JsonKind::Uri)?
            .required(field::NAME, JsonKind::String)?;
        Ok(())
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_uri: Option<DocumentUri>,

    /// Configuration section, e.g. `editor.tabSize`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl ConfigurationItem {
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            scope_uri: None,
            section: Some(section.into()),
        }
    }

    pub fn with_scope_uri(mut self, scope_uri: DocumentUri) -> Self {
        self.scope_uri = Some(scope_uri);
        self
    }
}

impl Content for ConfigurationItem {
    const NAME: &'static str = "ConfigurationItem";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::SCOPE_URI, JsonKind::Uri)?
            .optional(field::SECTION, JsonKind::String)?;
        Ok(())
    }
}

/// Parameters of `workspace/configuration`; the client answers with one
/// value per requested item, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationParams {
    pub items: Vec<ConfigurationItem>,
}

impl ConfigurationParams {
    pub fn new(items: Vec<ConfigurationItem>) -> Self {
        Self { items }
    }
}

impl Content for ConfigurationParams {
    const NAME: &'static str = "ConfigurationParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required_array_of::<ConfigurationItem>(field::ITEMS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidChangeConfigurationParams {
    /// Changed settings, shape defined by the client
    pub settings: Value,
}

impl DidChangeConfigurationParams {
    pub fn new(settings: Value) -> Self {
        Self { settings }
    }
}

impl Content for DidChangeConfigurationParams {
    const NAME: &'static str = "DidChangeConfigurationParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        let validator = Validator::object(Self::NAME, data)?;
        if validator.has(field::SETTINGS) {
            Ok(())
        } else {
            Err(LspError::invalid(Self::NAME, "missing property 'settings'"))
        }
    }
}

// ============================================================================
// Commands and Edits
// ============================================================================

/// Parameters of `workspace/executeCommand`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteCommandParams {
    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Value>>,
}

impl ExecuteCommandParams {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

impl From<Command> for ExecuteCommandParams {
    fn from(command: Command) -> Self {
        Self {
            command: command.command,
            arguments: command.arguments,
        }
    }
}

impl Content for ExecuteCommandParams {
    const NAME: &'static str = "ExecuteCommandParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::COMMAND, JsonKind::String)?
            .optional(field::ARGUMENTS, JsonKind::Array)?;
        Ok(())
    }
}

/// Parameters of `workspace/applyEdit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyWorkspaceEditParams {
    /// Label shown in the undo stack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub edit: WorkspaceEdit,
}

impl ApplyWorkspaceEditParams {
    pub fn new(edit: WorkspaceEdit) -> Self {
        Self { label: None, edit }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Content for ApplyWorkspaceEditParams {
    const NAME: &'static str = "ApplyWorkspaceEditParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .optional(field::LABEL, JsonKind::String)?
            .required_content::<WorkspaceEdit>(field::EDIT)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyWorkspaceEditResult {
    pub applied: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Content for ApplyWorkspaceEditResult {
    const NAME: &'static str = "ApplyWorkspaceEditResult";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::APPLIED, JsonKind::Boolean)?
            .optional(field::FAILURE_REASON, JsonKind::String)?;
        Ok(())
    }
}
