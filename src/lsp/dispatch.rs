//! Method dispatch
//!
//! Routes classified messages to [`ServerInterface`] handlers. Every failure
//! is turned into a wire-level error here; nothing escapes to the caller
//! except as a queued response or a log line.

use crate::log_lsp_message;
use crate::lsp::content::Content;
use crate::lsp::error::{ErrorCode, Exception};
use crate::lsp::identifier::{NotificationMethod, RequestMethod, field};
use crate::lsp::interface::{ServerInterface, ServerInterfaceExt};
use crate::lsp::message::{
    Message, MessageKind, NotificationMessage, RequestId, RequestMessage, ResponseMessage,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{Level, debug, error, warn};

fn encode<T: Serialize>(result: T) -> Result<Value, Exception> {
    serde_json::to_value(result)
        .map_err(|e| Exception::internal(format!("failed to serialize result: {e}")))
}

fn invoke_request<S: ServerInterface + ?Sized>(
    method: RequestMethod,
    request: &RequestMessage,
    server: &S,
) -> Result<Value, Exception> {
    match method {
        RequestMethod::Initialize => encode(server.initialize(request.params_as()?)?),
        RequestMethod::Shutdown => server.shutdown().map(|()| Value::Null),
        RequestMethod::WorkspaceExecuteCommand => {
            server.workspace_execute_command(request.params_as()?)
        }
        RequestMethod::TextDocumentHover => encode(server.text_document_hover(request.params_as()?)?),
        RequestMethod::TextDocumentDefinition => {
            encode(server.text_document_definition(request.params_as()?)?)
        }
        RequestMethod::TextDocumentCodeAction => {
            encode(server.text_document_code_action(request.params_as()?)?)
        }
        RequestMethod::TextDocumentCodeLens => {
            encode(server.text_document_code_lens(request.params_as()?)?)
        }
    }
}

fn invoke_notification<S: ServerInterface + ?Sized>(
    method: NotificationMethod,
    notification: &NotificationMessage,
    server: &S,
) -> Result<(), Exception> {
    match method {
        NotificationMethod::Initialized => server.initialized(),
        NotificationMethod::Exit => server.exit(),
        NotificationMethod::CancelRequest => server.request_cancelled(notification.params_as()?),
        NotificationMethod::WorkspaceDidChangeConfiguration => {
            server.workspace_did_change_configuration(notification.params_as()?)
        }
        NotificationMethod::TextDocumentDidOpen => {
            server.text_document_did_open(notification.params_as()?)
        }
        NotificationMethod::TextDocumentDidChange => {
            server.text_document_did_change(notification.params_as()?)
        }
        NotificationMethod::TextDocumentDidSave => {
            server.text_document_did_save(notification.params_as()?)
        }
        NotificationMethod::TextDocumentDidClose => {
            server.text_document_did_close(notification.params_as()?)
        }
    }
}

impl RequestMessage {
    /// Invoke the handler for this request and queue the response
    pub fn process<S: ServerInterface + ?Sized>(&self, server: &S) {
        log_lsp_message!(Level::DEBUG, "incoming", self.method(), self);

        let outcome = match RequestMethod::from_name(self.method()) {
            Some(method) => invoke_request(method, self, server),
            None => Err(Exception::new(
                ErrorCode::MethodNotFound,
                format!(
                    "request method '{}' not specified in interface implementation",
                    self.method()
                ),
            )),
        };

        let id = Some(self.request_id().clone());
        let response = match outcome {
            Ok(result) => ResponseMessage::success(id, result),
            Err(exception) => {
                warn!("Request {} '{}' failed: {}", self.id(), self.method(), exception);
                ResponseMessage::failure(id, exception.into())
            }
        };
        server.respond(response);
    }
}

impl NotificationMessage {
    /// Invoke the handler for this notification
    ///
    /// Nothing is queued on success. A failure is reported with an error
    /// response carrying a null id.
    pub fn process<S: ServerInterface + ?Sized>(&self, server: &S) {
        log_lsp_message!(Level::DEBUG, "incoming", self.method(), self);

        let outcome = match NotificationMethod::from_name(self.method()) {
            Some(method) => invoke_notification(method, self, server),
            None => Err(Exception::new(
                ErrorCode::MethodNotFound,
                format!(
                    "notification method '{}' not specified in interface implementation",
                    self.method()
                ),
            )),
        };

        if let Err(exception) = outcome {
            warn!("Notification '{}' failed: {}", self.method(), exception);
            server.respond(ResponseMessage::failure(None, exception.into()));
        }
    }
}

impl ResponseMessage {
    /// Hand the response to whoever sent the matching request
    pub fn process<S: ServerInterface + ?Sized>(&self, server: &S) {
        let id = self.id().unwrap_or_default();
        log_lsp_message!(Level::DEBUG, "incoming", id.as_str(), self);
        server.outbox().handle(self);
    }
}

impl Message {
    pub fn process<S: ServerInterface + ?Sized>(&self, server: &S) {
        match self {
            Self::Request(request) => request.process(server),
            Self::Notification(notification) => notification.process(server),
            Self::Response(response) => response.process(server),
        }
    }
}

/// Id of a request-shaped payload, if it can be read from the raw text
fn recover_request_id(raw: &str) -> Option<RequestId> {
    let data: Value = serde_json::from_str(raw).ok()?;
    let object = data.as_object()?;
    if !object.contains_key(field::METHOD) {
        return None;
    }
    match object.get(field::ID)? {
        Value::Number(number) if !number.is_i64() => Some(RequestId::Numeric(number.clone())),
        id => RequestId::from_value(id.clone()).ok(),
    }
}

/// Parse raw JSON text and process the resulting message
///
/// A payload that fails to parse is answered with a `ParseError` response
/// when it looks like a request whose id can still be read; otherwise it is
/// logged and dropped. The returned error has already been handled that way
/// and is only reported for bookkeeping.
pub fn dispatch_payload<S: ServerInterface + ?Sized>(
    raw: &str,
    server: &S,
) -> Result<MessageKind, Exception> {
    match Message::parse(raw) {
        Ok(message) => {
            message.process(server);
            Ok(message.kind())
        }
        Err(parse_error) => {
            let exception = Exception::from(parse_error);
            match recover_request_id(raw) {
                Some(id) => {
                    warn!("Rejecting request {}: {}", id, exception.message());
                    server.respond(ResponseMessage::failure(Some(id), exception.clone().into()));
                }
                None => {
                    error!("Dropping unparseable payload: {}", exception.message());
                    debug!("Dropped payload: {}", raw);
                }
            }
            Err(exception)
        }
    }
}
