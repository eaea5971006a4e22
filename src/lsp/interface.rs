//! Server interface contract and outbound message queues
//!
//! A [`ServerInterface`] implementation supplies one handler per inbound
//! method. Everything a server sends back (responses, notifications, and
//! server-to-client requests) goes through its [`Outbox`], which any number of
//! threads may fill while a single consumer drains it with
//! [`ServerInterfaceExt::flush`].

use crate::lsp::content::{
    ApplyWorkspaceEditParams, ApplyWorkspaceEditResult, CancelParams, CodeActionParams,
    CodeActionResult, CodeLensParams, CodeLensResult, ConfigurationParams, Content,
    DefinitionParams, DefinitionResult, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, ExecuteCommandParams, HoverParams, HoverResult,
    InitializeParams, InitializeResult, LogMessageParams, MessageActionItem,
    PublishDiagnosticsParams, RegistrationParams, ShowMessageParams, ShowMessageRequestParams,
    UnregistrationParams, WorkspaceFolder,
};
use crate::lsp::error::{Exception, LspError};
use crate::lsp::identifier::method;
use crate::lsp::message::{
    Message, NotificationMessage, RequestId, RequestMessage, ResponseError, ResponseMessage,
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// Invoked once with the client's answer to a server-to-client request
pub type ResponseCallback = Box<dyn FnOnce(&ResponseMessage) + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Outbox
// ============================================================================

/// Outbound message queues plus response correlation
///
/// Producers only hold a queue's lock long enough to push. [`Outbox::flush`]
/// takes each queue out under its lock and delivers the taken messages after
/// releasing it, so producers never wait on delivery. Concurrent flushes are
/// serialised so that each flush delivers a consistent batch.
#[derive(Default)]
pub struct Outbox {
    responses: Mutex<Vec<ResponseMessage>>,
    notifications: Mutex<Vec<NotificationMessage>>,
    requests: Mutex<Vec<RequestMessage>>,
    flushing: Mutex<()>,
    next_request_id: AtomicU64,
    pending: Mutex<HashMap<String, ResponseCallback>>,
}

impl fmt::Debug for Outbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbox")
            .field("responses", &lock(&self.responses).len())
            .field("notifications", &lock(&self.notifications).len())
            .field("requests", &lock(&self.requests).len())
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ResponseMessage) {
        lock(&self.responses).push(response);
    }

    pub fn push_notification(&self, notification: NotificationMessage) {
        lock(&self.notifications).push(notification);
    }

    /// Queue a server-to-client request and remember its callback
    ///
    /// Ids are allocated from a per-outbox counter starting at zero.
    pub fn push_request(
        &self,
        method: &str,
        params: Option<Value>,
        callback: ResponseCallback,
    ) -> RequestId {
        let number = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let id = RequestId::Number(number as i64);

        let mut request = RequestMessage::new(id.clone(), method);
        if let Some(params) = params {
            request = request.with_params(params);
        }

        lock(&self.pending).insert(id.to_string(), callback);
        lock(&self.requests).push(request);
        id
    }

    /// Deliver every queued message to `sink`
    ///
    /// Order is responses, then notifications, then requests; FIFO within
    /// each queue. Returns the number of messages delivered.
    pub fn flush(&self, mut sink: impl FnMut(Message)) -> usize {
        let _flushing = lock(&self.flushing);

        let responses = std::mem::take(&mut *lock(&self.responses));
        let notifications = std::mem::take(&mut *lock(&self.notifications));
        let requests = std::mem::take(&mut *lock(&self.requests));

        let count = responses.len() + notifications.len() + requests.len();
        if count > 0 {
            trace!(
                responses = responses.len(),
                notifications = notifications.len(),
                requests = requests.len(),
                "Flushing outbox"
            );
        }

        responses.into_iter().map(Message::Response).for_each(&mut sink);
        notifications
            .into_iter()
            .map(Message::Notification)
            .for_each(&mut sink);
        requests.into_iter().map(Message::Request).for_each(&mut sink);
        count
    }

    /// Flush into a vector
    pub fn drain(&self) -> Vec<Message> {
        let mut messages = Vec::new();
        self.flush(|message| messages.push(message));
        messages
    }

    /// Route a client response to the callback registered for its id
    ///
    /// Returns false when no callback was waiting for the id.
    pub fn handle(&self, response: &ResponseMessage) -> bool {
        let Some(id) = response.id() else {
            warn!("Received response without id: {:?}", response.error());
            return false;
        };

        let callback = lock(&self.pending).remove(&id);
        match callback {
            Some(callback) => {
                match response.error() {
                    Some(error) if error.is_server_error() => {
                        warn!("Request {} failed with server error: {}", id, error)
                    }
                    Some(error) => debug!("Request {} failed: {}", id, error),
                    None => debug!("Completing request {}", id),
                }
                callback(response);
                true
            }
            None => {
                warn!("Received response for unknown request ID: {}", id);
                false
            }
        }
    }

    /// Number of server-to-client requests still awaiting an answer
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.responses).is_empty()
            && lock(&self.notifications).is_empty()
            && lock(&self.requests).is_empty()
    }
}

// ============================================================================
// Server Interface
// ============================================================================

/// Handlers for every inbound method the dispatcher knows
///
/// Handlers take `&self` so a single instance can serve concurrent callers;
/// implementations keep their own state behind interior mutability. A handler
/// signals a protocol-level failure by returning an [`Exception`], which is
/// forwarded into the response unchanged.
pub trait ServerInterface: Send + Sync {
    fn outbox(&self) -> &Outbox;

    // ========================================================================
    // Requests
    // ========================================================================

    fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, Exception>;

    fn shutdown(&self) -> Result<(), Exception>;

    /// Result is passed to the client as is
    fn workspace_execute_command(&self, params: ExecuteCommandParams) -> Result<Value, Exception>;

    /// `None` answers with a null result
    fn text_document_hover(&self, params: HoverParams) -> Result<Option<HoverResult>, Exception>;

    fn text_document_definition(
        &self,
        params: DefinitionParams,
    ) -> Result<DefinitionResult, Exception>;

    fn text_document_code_action(
        &self,
        params: CodeActionParams,
    ) -> Result<CodeActionResult, Exception>;

    fn text_document_code_lens(&self, params: CodeLensParams) -> Result<CodeLensResult, Exception>;

    // ========================================================================
    // Notifications
    // ========================================================================

    fn initialized(&self) -> Result<(), Exception>;

    fn exit(&self) -> Result<(), Exception>;

    /// Client asked to abandon the request with the given id
    fn request_cancelled(&self, params: CancelParams) -> Result<(), Exception>;

    fn workspace_did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) -> Result<(), Exception>;

    fn text_document_did_open(&self, params: DidOpenTextDocumentParams) -> Result<(), Exception>;

    fn text_document_did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) -> Result<(), Exception>;

    fn text_document_did_save(&self, params: DidSaveTextDocumentParams) -> Result<(), Exception>;

    fn text_document_did_close(&self, params: DidCloseTextDocumentParams)
    -> Result<(), Exception>;
}

/// Convert a client answer into the typed result a callback expects
fn typed_outcome<T: Content>(response: &ResponseMessage) -> Result<T, ResponseError> {
    if let Some(error) = response.error() {
        return Err(error.clone());
    }
    response
        .result_as::<T>()
        .map_err(|e| ResponseError::from(Exception::from(e)))
}

fn typed_callback<R, F>(callback: F) -> ResponseCallback
where
    R: Content + 'static,
    F: FnOnce(Result<R, ResponseError>) + Send + 'static,
{
    Box::new(move |response: &ResponseMessage| callback(typed_outcome::<R>(response)))
}

/// Outbound operations available on every [`ServerInterface`]
///
/// Blanket-implemented, so implementations cannot replace them.
pub trait ServerInterfaceExt: ServerInterface {
    fn respond(&self, response: ResponseMessage) {
        self.outbox().push_response(response);
    }

    fn notify(&self, notification: NotificationMessage) {
        self.outbox().push_notification(notification);
    }

    /// Drain all queued outbound messages into `sink`
    fn flush(&self, sink: impl FnMut(Message)) -> usize {
        self.outbox().flush(sink)
    }

    /// Queue a notification with serialised params
    fn send_notification<P: Content>(&self, method: &str, params: &P) -> Result<(), LspError> {
        let notification = NotificationMessage::new(method).with_params(params.to_value()?);
        self.notify(notification);
        Ok(())
    }

    /// Queue a server-to-client request whose answer is decoded as `R`
    fn send_request<P, R, F>(&self, method: &str, params: &P, callback: F) -> Result<RequestId, LspError>
    where
        P: Content,
        R: Content + 'static,
        F: FnOnce(Result<R, ResponseError>) + Send + 'static,
    {
        let params = params.to_value()?;
        Ok(self
            .outbox()
            .push_request(method, Some(params), typed_callback(callback)))
    }

    // ========================================================================
    // Outbound Notifications
    // ========================================================================

    fn window_show_message(&self, params: ShowMessageParams) -> Result<(), LspError> {
        self.send_notification(method::WINDOW_SHOW_MESSAGE, &params)
    }

    fn window_log_message(&self, params: LogMessageParams) -> Result<(), LspError> {
        self.send_notification(method::WINDOW_LOG_MESSAGE, &params)
    }

    fn telemetry_event(&self, params: Value) -> Result<(), LspError> {
        self.send_notification(method::TELEMETRY_EVENT, &params)
    }

    fn text_document_publish_diagnostics(
        &self,
        params: PublishDiagnosticsParams,
    ) -> Result<(), LspError> {
        self.send_notification(method::TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS, &params)
    }

    /// Ask the client to abandon a request this server sent earlier
    fn cancel_request(&self, id: RequestId) -> Result<(), LspError> {
        self.send_notification(method::CANCEL_REQUEST, &CancelParams::new(id))
    }

    // ========================================================================
    // Outbound Requests
    // ========================================================================

    fn window_show_message_request<F>(
        &self,
        params: ShowMessageRequestParams,
        callback: F,
    ) -> Result<RequestId, LspError>
    where
        F: FnOnce(Result<Option<MessageActionItem>, ResponseError>) + Send + 'static,
    {
        self.send_request(method::WINDOW_SHOW_MESSAGE_REQUEST, &params, callback)
    }

    fn client_register_capability<F>(
        &self,
        params: RegistrationParams,
        callback: F,
    ) -> Result<RequestId, LspError>
    where
        F: FnOnce(Result<Value, ResponseError>) + Send + 'static,
    {
        self.send_request(method::CLIENT_REGISTER_CAPABILITY, &params, callback)
    }

    fn client_unregister_capability<F>(
        &self,
        params: UnregistrationParams,
        callback: F,
    ) -> Result<RequestId, LspError>
    where
        F: FnOnce(Result<Value, ResponseError>) + Send + 'static,
    {
        self.send_request(method::CLIENT_UNREGISTER_CAPABILITY, &params, callback)
    }

    /// Answer holds one value per requested item
    fn workspace_configuration<F>(
        &self,
        params: ConfigurationParams,
        callback: F,
    ) -> Result<RequestId, LspError>
    where
        F: FnOnce(Result<Vec<Value>, ResponseError>) + Send + 'static,
    {
        self.send_request(method::WORKSPACE_CONFIGURATION, &params, callback)
    }

    fn workspace_apply_edit<F>(
        &self,
        params: ApplyWorkspaceEditParams,
        callback: F,
    ) -> Result<RequestId, LspError>
    where
        F: FnOnce(Result<ApplyWorkspaceEditResult, ResponseError>) + Send + 'static,
    {
        self.send_request(method::WORKSPACE_APPLY_EDIT, &params, callback)
    }

    /// `None` when no folder is open
    fn workspace_workspace_folders<F>(&self, callback: F) -> RequestId
    where
        F: FnOnce(Result<Option<Vec<WorkspaceFolder>>, ResponseError>) + Send + 'static,
    {
        self.outbox().push_request(
            method::WORKSPACE_WORKSPACE_FOLDERS,
            None,
            typed_callback(callback),
        )
    }
}

impl<T: ServerInterface + ?Sized> ServerInterfaceExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsp::content::{ConfigurationItem, MessageType};
    use crate::lsp::error::ErrorCode;
    use crate::lsp::message::MessageKind;
    use crate::lsp::server::Server;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn response(id: i64, result: Value) -> ResponseMessage {
        ResponseMessage::success(Some(RequestId::from(id)), result)
    }

    #[test]
    fn test_flush_empty_outbox() {
        let outbox = Outbox::new();
        assert!(outbox.is_empty());
        assert_eq!(outbox.flush(|_| panic!("nothing queued")), 0);
    }

    #[test]
    fn test_flush_order_responses_notifications_requests() {
        let outbox = Outbox::new();
        outbox.push_request("workspace/workspaceFolders", None, Box::new(|_| {}));
        outbox.push_notification(NotificationMessage::new("window/logMessage"));
        outbox.push_response(response(1, json!({})));
        outbox.push_response(response(2, json!({})));

        let kinds: Vec<_> = outbox.drain().iter().map(Message::kind).collect();
        use crate::lsp::message::MessageKind::*;
        assert_eq!(kinds, vec![Response, Response, Notification, Request]);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_flush_preserves_fifo_within_queue() {
        let outbox = Outbox::new();
        for id in 0..5 {
            outbox.push_response(response(id, json!(null)));
        }
        let ids: Vec<_> = outbox
            .drain()
            .into_iter()
            .map(|message| match message {
                Message::Response(response) => response.id(),
                other => panic!("Expected response, got: {other:?}"),
            })
            .collect();
        assert_eq!(
            ids,
            (0..5).map(|id| Some(id.to_string())).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let outbox = Arc::new(Outbox::new());
        let producers: Vec<_> = (0..8)
            .map(|thread_index| {
                let outbox = Arc::clone(&outbox);
                thread::spawn(move || {
                    for n in 0..100 {
                        outbox.push_response(response(thread_index * 1000 + n, json!(null)));
                    }
                })
            })
            .collect();

        let mut delivered = 0;
        for _ in 0..10 {
            delivered += outbox.flush(|_| {});
        }
        for producer in producers {
            producer.join().unwrap();
        }
        delivered += outbox.flush(|_| {});

        assert_eq!(delivered, 800);
    }

    #[test]
    fn test_concurrent_producers_keep_per_thread_order() {
        let outbox = Arc::new(Outbox::new());
        let producers: Vec<_> = (0..4)
            .map(|thread_index| {
                let outbox = Arc::clone(&outbox);
                thread::spawn(move || {
                    for n in 0..50 {
                        let method = format!("t{thread_index}");
                        outbox.push_notification(
                            NotificationMessage::new(method).with_params(json!({"n": n})),
                        );
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let mut last_seen: HashMap<String, i64> = HashMap::new();
        for message in outbox.drain() {
            let Message::Notification(notification) = message else {
                panic!("Expected notification");
            };
            let n = notification.params().unwrap()["n"].as_i64().unwrap();
            let previous = last_seen.insert(notification.method().to_string(), n);
            assert_eq!(previous.map_or(0, |p| p + 1), n);
        }
        assert_eq!(last_seen.len(), 4);
    }

    #[test]
    fn test_concurrent_respond_and_notify_flush_in_queue_order() {
        let server = Arc::new(Server::new());
        let producers: Vec<_> = (0..4i64)
            .map(|thread_index| {
                let server = Arc::clone(&server);
                thread::spawn(move || {
                    for n in 0..50i64 {
                        server.respond(response(thread_index * 1000 + n, json!(null)));
                        server.notify(
                            NotificationMessage::new(format!("t{thread_index}"))
                                .with_params(json!({"n": n})),
                        );
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let mut messages = Vec::new();
        assert_eq!(server.flush(|message| messages.push(message)), 400);

        let first_notification = messages
            .iter()
            .position(|message| message.kind() == MessageKind::Notification)
            .unwrap();
        assert_eq!(first_notification, 200);

        let mut last_response: HashMap<i64, i64> = HashMap::new();
        let mut last_notification: HashMap<String, i64> = HashMap::new();
        for (index, message) in messages.iter().enumerate() {
            match message {
                Message::Response(response) => {
                    assert!(index < first_notification);
                    let RequestId::Number(id) = response.request_id().unwrap() else {
                        panic!("Expected numeric id");
                    };
                    let (thread_index, n) = (id / 1000, id % 1000);
                    let previous = last_response.insert(thread_index, n);
                    assert_eq!(previous.map_or(0, |p| p + 1), n);
                }
                Message::Notification(notification) => {
                    let n = notification.params().unwrap()["n"].as_i64().unwrap();
                    let previous = last_notification.insert(notification.method().to_string(), n);
                    assert_eq!(previous.map_or(0, |p| p + 1), n);
                }
                Message::Request(_) => panic!("No requests were queued"),
            }
        }
        assert_eq!(last_response.len(), 4);
        assert_eq!(last_notification.len(), 4);
    }

    #[test]
    fn test_request_ids_are_sequential() {
        let outbox = Outbox::new();
        let first = outbox.push_request("a", None, Box::new(|_| {}));
        let second = outbox.push_request("b", None, Box::new(|_| {}));
        assert_eq!(first, RequestId::Number(0));
        assert_eq!(second, RequestId::Number(1));
        assert_eq!(outbox.pending_count(), 2);
    }

    #[test]
    fn test_handle_invokes_callback_once() {
        let outbox = Outbox::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let id = outbox.push_request(
            "workspace/configuration",
            None,
            Box::new(move |response| sink.lock().unwrap().push(response.clone())),
        );

        let answer = ResponseMessage::success(Some(id.clone()), json!([1]));
        assert!(outbox.handle(&answer));
        assert!(!outbox.handle(&answer));
        assert_eq!(received.lock().unwrap().len(), 1);
        assert_eq!(outbox.pending_count(), 0);
    }

    #[test]
    fn test_handle_matches_normalised_id() {
        let outbox = Outbox::new();
        let called = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&called);
        outbox.push_request("a", None, Box::new(move |_| *flag.lock().unwrap() = true));

        let answer = ResponseMessage::success(Some(RequestId::from("0")), json!(null));
        assert!(outbox.handle(&answer));
        assert!(*called.lock().unwrap());
    }

    #[test]
    fn test_handle_unknown_or_null_id() {
        let outbox = Outbox::new();
        assert!(!outbox.handle(&response(42, json!(null))));
        assert!(!outbox.handle(&ResponseMessage::failure(
            None,
            ResponseError::new(ErrorCode::ParseError, "bad")
        )));
    }

    #[test]
    fn test_outbound_notifications() {
        let server = Server::new();
        server
            .window_show_message(ShowMessageParams::new(MessageType::Info, "hello"))
            .unwrap();
        server.telemetry_event(json!({"event": "start"})).unwrap();
        server.cancel_request(RequestId::from(3i64)).unwrap();

        let messages = server.outbox().drain();
        let methods: Vec<_> = messages.iter().filter_map(Message::method).collect();
        assert_eq!(
            methods,
            vec!["window/showMessage", "telemetry/event", "$/cancelRequest"]
        );
        let Message::Notification(show) = &messages[0] else {
            panic!("Expected notification");
        };
        assert_eq!(show.params(), Some(&json!({"type": 3, "message": "hello"})));
    }

    #[test]
    fn test_typed_callback_receives_result() {
        let server = Server::new();
        let answer = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&answer);
        let id = server
            .workspace_configuration(
                ConfigurationParams::new(vec![ConfigurationItem::section("editor")]),
                move |result| *slot.lock().unwrap() = Some(result),
            )
            .unwrap();

        let messages = server.outbox().drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].method(), Some("workspace/configuration"));

        server
            .outbox()
            .handle(&ResponseMessage::success(Some(id), json!([{"tabSize": 4}])));
        let result = answer.lock().unwrap().take().unwrap().unwrap();
        assert_eq!(result, vec![json!({"tabSize": 4})]);
    }

    #[test]
    fn test_typed_callback_receives_error() {
        let server = Server::new();
        let answer = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&answer);
        let id = server.workspace_workspace_folders(move |result| *slot.lock().unwrap() = Some(result));

        let error = ResponseError::new(ErrorCode::RequestCancelled, "cancelled");
        server
            .outbox()
            .handle(&ResponseMessage::failure(Some(id), error.clone()));
        let result = answer.lock().unwrap().take().unwrap();
        assert_eq!(result, Err(error));
    }

    #[test]
    fn test_typed_callback_rejects_malformed_result() {
        let server = Server::new();
        let answer = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&answer);
        let id = server.workspace_workspace_folders(move |result| *slot.lock().unwrap() = Some(result));

        server
            .outbox()
            .handle(&ResponseMessage::success(Some(id), json!([{"name": "no uri"}])));
        let error = answer.lock().unwrap().take().unwrap().unwrap_err();
        assert_eq!(error.code(), ErrorCode::ParseError);
        assert!(error.message().contains("WorkspaceFolder"));
    }
}
