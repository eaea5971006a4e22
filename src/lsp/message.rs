//! JSON-RPC 2.0 messages
//!
//! The wire format carries no explicit type tag, so a message's shape is
//! derived from which fields are present:
//!
//! | `id` | `method` | kind         |
//! |------|----------|--------------|
//! | yes  | yes      | Request      |
//! | yes  | no       | Response     |
//! | no   | yes      | Notification |
//! | no   | no       | Unknown      |
//!
//! Parsing checks the envelope (`"jsonrpc": "2.0"`), classifies, then
//! validates against the stricter rules of the classified variant before
//! constructing it.

use crate::lsp::content::{Content, JsonKind, Validator};
use crate::lsp::error::{ErrorCode, Exception, LspError};
use crate::lsp::identifier::{JSONRPC, JSONRPC_VERSION, field};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Request Ids
// ============================================================================

/// Request identifier as sent on the wire
///
/// Echoed back verbatim in responses. For correlation the id is compared by
/// its [`Display`](fmt::Display) form, so `7` and `"7"` are the same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    /// Number outside the `i64` range or written with a fraction or exponent.
    /// Never valid on an incoming message; kept so a rejection can still echo it.
    Numeric(serde_json::Number),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Numeric(n) => write!(f, "{n}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl Content for RequestId {
    const NAME: &'static str = "RequestId";

    fn validate(data: &Value) -> Result<(), LspError> {
        if data.is_string() || data.is_i64() {
            Ok(())
        } else {
            Err(LspError::invalid(
                Self::NAME,
                "invalid data type, shall be 'string' or 'integer'",
            ))
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Unknown,
    Request,
    Notification,
    Response,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Request => "request",
            Self::Notification => "notification",
            Self::Response => "response",
        };
        f.write_str(name)
    }
}

/// Structural classification from field presence alone
pub fn classify(data: &Value) -> MessageKind {
    let has = |key| data.get(key).is_some();
    match (has(field::ID), has(field::METHOD)) {
        (true, true) => MessageKind::Request,
        (true, false) => MessageKind::Response,
        (false, true) => MessageKind::Notification,
        (false, false) => MessageKind::Unknown,
    }
}

/// Check the JSON-RPC envelope shared by every message
fn validate_envelope(interface: &'static str, data: &Value) -> Result<(), LspError> {
    let object = data
        .as_object()
        .ok_or_else(|| LspError::invalid(interface, "invalid data type, shall be 'object'"))?;

    match object.get(JSONRPC) {
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(()),
        Some(Value::String(version)) => Err(LspError::UnsupportedVersion {
            found: version.clone(),
        }),
        Some(other) => Err(LspError::UnsupportedVersion {
            found: other.to_string(),
        }),
        None => Err(LspError::UnsupportedVersion {
            found: "<missing>".to_string(),
        }),
    }
}

fn jsonrpc_version() -> String {
    JSONRPC_VERSION.to_string()
}

// ============================================================================
// Request
// ============================================================================

/// Request expecting a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    jsonrpc: String,
    id: RequestId,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl RequestMessage {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id: id.into(),
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Normalised id used for correlation
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    pub fn request_id(&self) -> &RequestId {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn has_params(&self) -> bool {
        self.params.is_some()
    }

    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    /// Validate and convert params into the method's typed interface
    pub fn params_as<T: Content>(&self) -> Result<T, LspError> {
        T::from_value(self.params.clone().unwrap_or(Value::Null))
    }
}

impl Content for RequestMessage {
    const NAME: &'static str = "RequestMessage";

    fn validate(data: &Value) -> Result<(), LspError> {
        validate_envelope(Self::NAME, data)?;
        Validator::object(Self::NAME, data)?
            .required_content::<RequestId>(field::ID)?
            .required(field::METHOD, JsonKind::String)?
            .optional(field::PARAMS, JsonKind::Object)?;
        Ok(())
    }
}

// ============================================================================
// Notification
// ============================================================================

/// Message without an id; never answered on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    jsonrpc: String,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl NotificationMessage {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn has_params(&self) -> bool {
        self.params.is_some()
    }

    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    pub fn params_as<T: Content>(&self) -> Result<T, LspError> {
        T::from_value(self.params.clone().unwrap_or(Value::Null))
    }
}

impl Content for NotificationMessage {
    const NAME: &'static str = "NotificationMessage";

    fn validate(data: &Value) -> Result<(), LspError> {
        validate_envelope(Self::NAME, data)?;
        let validator = Validator::object(Self::NAME, data)?
            .required(field::METHOD, JsonKind::String)?
            .optional(field::PARAMS, JsonKind::Object)?;
        if validator.has(field::ID) {
            return Err(LspError::invalid(Self::NAME, "unexpected property 'id'"));
        }
        Ok(())
    }
}

// ============================================================================
// Response Error
// ============================================================================

/// Error object carried by a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl ResponseError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Known error code; codes outside the table read as `UnknownErrorCode`
    pub fn code(&self) -> ErrorCode {
        ErrorCode::from_code(self.code)
    }

    /// Code exactly as it appeared on the wire
    pub fn raw_code(&self) -> i32 {
        self.code
    }

    /// Code lies in the range JSON-RPC reserves for implementation-defined
    /// server errors, whether or not it is one of the known codes
    pub fn is_server_error(&self) -> bool {
        ErrorCode::is_server_error(self.code)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl From<Exception> for ResponseError {
    fn from(exception: Exception) -> Self {
        let mut error = Self::new(exception.code(), exception.message());
        error.data = exception.data().cloned();
        error
    }
}

impl Content for ResponseError {
    const NAME: &'static str = "ResponseError";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::CODE, JsonKind::Integer)?
            .required(field::MESSAGE, JsonKind::String)?;
        Ok(())
    }
}

// ============================================================================
// Response
// ============================================================================

/// Keep `"result": null` distinguishable from an absent result
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Answer to a request
///
/// The id is `None` (serialized as `null`) when answering a message whose id
/// could not be determined. At most one of result and error is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    jsonrpc: String,
    id: Option<RequestId>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResponseError>,
}

impl ResponseMessage {
    /// Response with neither result nor error yet
    pub fn new(id: Option<RequestId>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id,
            result: None,
            error: None,
        }
    }

    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        let mut response = Self::new(id);
        response.set_result(result);
        response
    }

    pub fn failure(id: Option<RequestId>, error: ResponseError) -> Self {
        let mut response = Self::new(id);
        response.set_error(error);
        response
    }

    /// Normalised id, `None` for a null id
    pub fn id(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Validate and convert the result into a typed interface
    pub fn result_as<T: Content>(&self) -> Result<T, LspError> {
        T::from_value(self.result.clone().unwrap_or(Value::Null))
    }

    /// Set the result, dropping any error
    pub fn set_result(&mut self, result: Value) {
        self.result = Some(result);
        self.error = None;
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&ResponseError> {
        self.error.as_ref()
    }

    /// Set the error, dropping any result
    pub fn set_error(&mut self, error: ResponseError) {
        self.error = Some(error);
        self.result = None;
    }
}

impl Content for ResponseMessage {
    const NAME: &'static str = "ResponseMessage";

    fn validate(data: &Value) -> Result<(), LspError> {
        validate_envelope(Self::NAME, data)?;
        let validator = Validator::object(Self::NAME, data)?
            .required_content::<Option<RequestId>>(field::ID)?
            .optional_content::<ResponseError>(field::ERROR)?;

        match validator.get(field::RESULT) {
            None | Some(Value::Object(_) | Value::Array(_) | Value::Null) => {}
            Some(_) => {
                return Err(LspError::invalid(
                    Self::NAME,
                    "invalid property 'result', shall be 'object', 'array' or 'null'",
                ));
            }
        }

        if validator.has(field::RESULT) && validator.has(field::ERROR) {
            return Err(LspError::invalid(
                Self::NAME,
                "properties 'result' and 'error' are mutually exclusive",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Message
// ============================================================================

/// Any valid JSON-RPC message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Request(RequestMessage),
    Notification(NotificationMessage),
    Response(ResponseMessage),
}

impl Message {
    /// Parse and classify raw JSON text
    pub fn parse(text: &str) -> Result<Self, LspError> {
        let data: Value = serde_json::from_str(text)?;
        Self::from_value(data)
    }

    /// Classify and validate an already parsed JSON value
    pub fn from_value(data: Value) -> Result<Self, LspError> {
        validate_envelope("Message", &data)?;
        match classify(&data) {
            MessageKind::Request => RequestMessage::from_value(data).map(Self::Request),
            MessageKind::Notification => {
                NotificationMessage::from_value(data).map(Self::Notification)
            }
            MessageKind::Response => ResponseMessage::from_value(data).map(Self::Response),
            MessageKind::Unknown => Err(LspError::UnknownPayload),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Request(_) => MessageKind::Request,
            Self::Notification(_) => MessageKind::Notification,
            Self::Response(_) => MessageKind::Response,
        }
    }

    /// Method name for requests and notifications
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Request(request) => Some(request.method()),
            Self::Notification(notification) => Some(notification.method()),
            Self::Response(_) => None,
        }
    }

    pub fn to_value(&self) -> Result<Value, LspError> {
        serde_json::to_value(self).map_err(|e| LspError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, LspError> {
        serde_json::to_string(self).map_err(|e| LspError::Serialization(e.to_string()))
    }
}

impl From<RequestMessage> for Message {
    fn from(request: RequestMessage) -> Self {
        Self::Request(request)
    }
}

impl From<NotificationMessage> for Message {
    fn from(notification: NotificationMessage) -> Self {
        Self::Notification(notification)
    }
}

impl From<ResponseMessage> for Message {
    fn from(response: ResponseMessage) -> Self {
        Self::Response(response)
    }
}

/// Parse raw JSON text into a classified message
pub fn parse_message(text: &str) -> Result<Message, LspError> {
    Message::parse(text)
}
