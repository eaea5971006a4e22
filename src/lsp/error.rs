//! Error types for the message layer
//!
//! Two families live here. `LspError` covers everything that can go wrong
//! while turning text into typed values: malformed JSON, envelope problems and
//! schema validation. `Exception` is what a server handler returns to put a
//! specific error code on the wire.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Codes
// ============================================================================

/// JSON-RPC reserved codes plus the LSP-specific ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    ServerNotInitialized = -32002,
    UnknownErrorCode = -32001,
    RequestCancelled = -32800,
}

/// Bounds of the range JSON-RPC reserves for implementation-defined server errors
pub const SERVER_ERROR_START: i32 = -32099;
pub const SERVER_ERROR_END: i32 = -32000;

impl ErrorCode {
    /// Map a wire code to a known variant; anything unrecognised is `UnknownErrorCode`
    pub fn from_code(code: i32) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            -32002 => Self::ServerNotInitialized,
            -32800 => Self::RequestCancelled,
            _ => Self::UnknownErrorCode,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Check if the given code is in the server error range (-32099 to -32000)
    pub fn is_server_error(code: i32) -> bool {
        (SERVER_ERROR_START..=SERVER_ERROR_END).contains(&code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

// ============================================================================
// Parse / Validation Errors
// ============================================================================

/// Failure to turn JSON text or values into protocol types
#[derive(Debug, Error)]
pub enum LspError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported JSON-RPC version '{found}'")]
    UnsupportedVersion { found: String },

    #[error("unknown JSON-RPC message payload")]
    UnknownPayload,

    #[error("invalid data for interface '{interface}': {reason}")]
    InvalidData {
        interface: &'static str,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LspError {
    pub fn invalid(interface: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            interface,
            reason: reason.into(),
        }
    }

    /// Interface named by a validation failure, if this is one
    pub fn interface(&self) -> Option<&'static str> {
        match self {
            Self::InvalidData { interface, .. } => Some(interface),
            _ => None,
        }
    }
}

// ============================================================================
// Handler Exceptions
// ============================================================================

/// Structured failure returned by a server handler
///
/// The dispatcher copies code, message and data unchanged into the error
/// object of the outgoing response.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} ({code})")]
pub struct Exception {
    code: ErrorCode,
    message: String,
    data: Option<Value>,
}

impl Exception {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RequestCancelled, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

impl From<LspError> for Exception {
    fn from(error: LspError) -> Self {
        Self::new(ErrorCode::ParseError, format!("parse error: '{error}'"))
    }
}
