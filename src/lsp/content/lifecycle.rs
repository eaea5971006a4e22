//! `initialize` handshake payloads

use super::{ClientCapabilities, Content, JsonKind, ServerCapabilities, Validator};
use crate::lsp::error::{ErrorCode, Exception, LspError};
use crate::lsp::identifier::field;
use crate::lsp::uri::DocumentUri;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters of the `initialize` request
///
/// `rootUri` must be present on the wire but may be `null`; `processId` may be
/// omitted or `null`. Both serialize as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub process_id: Option<u32>,

    pub root_uri: Option<DocumentUri>,

    pub capabilities: ClientCapabilities,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialization_options: Option<Value>,

    /// `off`, `messages` or `verbose`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl InitializeParams {
    pub fn new(root_uri: Option<DocumentUri>, capabilities: ClientCapabilities) -> Self {
        Self {
            process_id: None,
            root_uri,
            capabilities,
            initialization_options: None,
            trace: None,
        }
    }

    pub fn with_process_id(mut self, process_id: u32) -> Self {
        self.process_id = Some(process_id);
        self
    }

    pub fn with_initialization_options(mut self, options: Value) -> Self {
        self.initialization_options = Some(options);
        self
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    pub fn process_id(&self) -> Option<u32> {
        self.process_id
    }

    /// Workspace root, `None` when the client opened no folder
    pub fn root_uri(&self) -> Option<&DocumentUri> {
        self.root_uri.as_ref()
    }

    pub fn capabilities(&self) -> &ClientCapabilities {
        &self.capabilities
    }
}

impl Content for InitializeParams {
    const NAME: &'static str = "InitializeParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::ROOT_URI, JsonKind::UriOrNull)?
            .required_content::<ClientCapabilities>(field::CAPABILITIES)?
            .optional(field::PROCESS_ID, JsonKind::UnsignedOrNull)?
            .optional(field::INITIALIZATION_OPTIONS, JsonKind::Object)?
            .optional(field::TRACE, JsonKind::String)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitializeResult {
    pub capabilities: ServerCapabilities,
}

impl InitializeResult {
    pub fn new(capabilities: ServerCapabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }
}

impl Content for InitializeResult {
    const NAME: &'static str = "InitializeResult";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_content::<ServerCapabilities>(field::CAPABILITIES)?;
        Ok(())
    }
}

/// Error data attached to a failed `initialize`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeError {
    /// Client should retry `initialize` after showing the error message
    pub retry: bool,
}

impl InitializeError {
    pub fn new(retry: bool) -> Self {
        Self { retry }
    }

    /// Handler failure for `initialize` carrying this value as error data
    pub fn into_exception(self, code: ErrorCode, message: impl Into<String>) -> Exception {
        let mut data = serde_json::Map::new();
        data.insert(field::RETRY.to_string(), Value::Bool(self.retry));
        Exception::new(code, message).with_data(Value::Object(data))
    }
}

impl Content for InitializeError {
    const NAME: &'static str = "InitializeError";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required(field::RETRY, JsonKind::Boolean)?;
        Ok(())
    }
}
