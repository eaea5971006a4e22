//! Window messages and request cancellation

use super::{Content, JsonKind, Validator};
use crate::lsp::error::LspError;
use crate::lsp::identifier::field;
use crate::lsp::message::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

numeric_enum! {
    pub enum MessageType {
        Error = 1,
        Warning = 2,
        Info = 3,
        Log = 4,
    }
}

/// Parameters of `window/showMessage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMessageParams {
    #[serde(rename = "type")]
    pub typ: MessageType,
    pub message: String,
}

impl ShowMessageParams {
    pub fn new(typ: MessageType, message: impl Into<String>) -> Self {
        Self {
            typ,
            message: message.into(),
        }
    }
}

impl Content for ShowMessageParams {
    const NAME: &'static str = "ShowMessageParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<MessageType>(field::TYPE)?
            .required(field::MESSAGE, JsonKind::String)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageActionItem {
    pub title: String,
}

impl MessageActionItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Content for MessageActionItem {
    const NAME: &'static str = "MessageActionItem";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required(field::TITLE, JsonKind::String)?;
        Ok(())
    }
}

/// Parameters of `window/showMessageRequest`; the client answers with the
/// chosen [`MessageActionItem`] or `null`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMessageRequestParams {
    #[serde(rename = "type")]
    pub typ: MessageType,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<MessageActionItem>>,
}

impl ShowMessageRequestParams {
    pub fn new(typ: MessageType, message: impl Into<String>) -> Self {
        Self {
            typ,
            message: message.into(),
            actions: None,
        }
    }

    pub fn add_action(&mut self, action: MessageActionItem) {
        self.actions.get_or_insert_with(Vec::new).push(action);
    }
}

impl Content for ShowMessageRequestParams {
    const NAME: &'static str = "ShowMessageRequestParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<MessageType>(field::TYPE)?
            .required(field::MESSAGE, JsonKind::String)?
            .optional_array_of::<MessageActionItem>(field::ACTIONS)?;
        Ok(())
    }
}

/// Parameters of `window/logMessage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessageParams {
    #[serde(rename = "type")]
    pub typ: MessageType,
    pub message: String,
}

impl LogMessageParams {
    pub fn new(typ: MessageType, message: impl Into<String>) -> Self {
        Self {
            typ,
            message: message.into(),
        }
    }
}

impl Content for LogMessageParams {
    const NAME: &'static str = "LogMessageParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<MessageType>(field::TYPE)?
            .required(field::MESSAGE, JsonKind::String)?;
        Ok(())
    }
}

/// Parameters of `$/cancelRequest`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelParams {
    pub id: RequestId,
}

impl CancelParams {
    pub fn new(id: impl Into<RequestId>) -> Self {
        Self { id: id.into() }
    }
}

impl Content for CancelParams {
    const NAME: &'static str = "CancelParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required_content::<RequestId>(field::ID)?;
        Ok(())
    }
}
