//! Recording server for dispatch tests
//!
//! Keeps a log of every handler invoked, tracks open documents, and can be
//! told to fail a given method with a specific [`Exception`].

use std::collections::HashMap;
use std::sync::Mutex;

use crate::lsp::content::{
    CancelParams, CodeActionParams, CodeActionResult, CodeLens, CodeLensParams, CodeLensResult,
    Command, DefinitionParams, DefinitionResult, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, ExecuteCommandParams, HoverParams, HoverResult,
    InitializeParams, InitializeResult, Location, MarkedString, Position, Range, ServerCapabilities,
};
use crate::lsp::error::Exception;
use crate::lsp::identifier::method;
use crate::lsp::interface::{Outbox, ServerInterface};
use serde_json::{Value, json};

#[derive(Debug, Default)]
pub struct RecordingServer {
    outbox: Outbox,
    calls: Mutex<Vec<&'static str>>,
    failures: HashMap<&'static str, Exception>,
    documents: Mutex<HashMap<String, String>>,
    cancelled: Mutex<Vec<String>>,
}

impl RecordingServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the handler for `method` fail with `exception`
    pub fn failing(mut self, method: &'static str, exception: Exception) -> Self {
        self.failures.insert(method, exception);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn document(&self, uri: &str) -> Option<String> {
        self.documents.lock().unwrap().get(uri).cloned()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str) -> Result<(), Exception> {
        self.calls.lock().unwrap().push(method);
        match self.failures.get(method) {
            Some(exception) => Err(exception.clone()),
            None => Ok(()),
        }
    }
}

impl ServerInterface for RecordingServer {
    fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult, Exception> {
        self.record(method::INITIALIZE)?;
        Ok(InitializeResult::new(ServerCapabilities::default()))
    }

    fn shutdown(&self) -> Result<(), Exception> {
        self.record(method::SHUTDOWN)
    }

    fn workspace_execute_command(&self, params: ExecuteCommandParams) -> Result<Value, Exception> {
        self.record(method::WORKSPACE_EXECUTE_COMMAND)?;
        let arguments = params.arguments.unwrap_or_default().len();
        Ok(json!({"command": params.command, "arguments": arguments}))
    }

    fn text_document_hover(&self, params: HoverParams) -> Result<Option<HoverResult>, Exception> {
        self.record(method::TEXT_DOCUMENT_HOVER)?;
        let position = params.position;
        if position.line == 0 {
            return Ok(None);
        }
        Ok(Some(
            HoverResult::new(vec![MarkedString::from("symbol")])
                .with_range(Range::new(position, position)),
        ))
    }

    fn text_document_definition(
        &self,
        params: DefinitionParams,
    ) -> Result<DefinitionResult, Exception> {
        self.record(method::TEXT_DOCUMENT_DEFINITION)?;
        let range = Range::new(params.position, params.position);
        Ok(DefinitionResult::new(vec![Location::new(
            params.text_document.uri,
            range,
        )]))
    }

    fn text_document_code_action(
        &self,
        params: CodeActionParams,
    ) -> Result<CodeActionResult, Exception> {
        self.record(method::TEXT_DOCUMENT_CODE_ACTION)?;
        Ok(params
            .context
            .diagnostics
            .iter()
            .map(|diagnostic| Command::new(format!("Fix: {}", diagnostic.message), "test.fix"))
            .collect())
    }

    fn text_document_code_lens(&self, params: CodeLensParams) -> Result<CodeLensResult, Exception> {
        self.record(method::TEXT_DOCUMENT_CODE_LENS)?;
        let uri = params.text_document.uri.to_string();
        let origin = Position::new(0, 0);
        Ok(vec![
            CodeLens::new(Range::new(origin, origin)).with_data(json!({"uri": uri})),
        ])
    }

    fn initialized(&self) -> Result<(), Exception> {
        self.record(method::INITIALIZED)
    }

    fn exit(&self) -> Result<(), Exception> {
        self.record(method::EXIT)
    }

    fn request_cancelled(&self, params: CancelParams) -> Result<(), Exception> {
        self.record(method::CANCEL_REQUEST)?;
        self.cancelled.lock().unwrap().push(params.id.to_string());
        Ok(())
    }

    fn workspace_did_change_configuration(
        &self,
        _params: DidChangeConfigurationParams,
    ) -> Result<(), Exception> {
        self.record(method::WORKSPACE_DID_CHANGE_CONFIGURATION)
    }

    fn text_document_did_open(&self, params: DidOpenTextDocumentParams) -> Result<(), Exception> {
        self.record(method::TEXT_DOCUMENT_DID_OPEN)?;
        let document = params.text_document;
        self.documents
            .lock()
            .unwrap()
            .insert(document.uri.to_string(), document.text);
        Ok(())
    }

    fn text_document_did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) -> Result<(), Exception> {
        self.record(method::TEXT_DOCUMENT_DID_CHANGE)?;
        let uri = params.text_document.uri.to_string();
        let mut documents = self.documents.lock().unwrap();
        for change in params.content_changes {
            if change.is_full() {
                documents.insert(uri.clone(), change.text);
            } else {
                return Err(Exception::invalid_params("incremental sync not supported"));
            }
        }
        Ok(())
    }

    fn text_document_did_save(&self, _params: DidSaveTextDocumentParams) -> Result<(), Exception> {
        self.record(method::TEXT_DOCUMENT_DID_SAVE)
    }

    fn text_document_did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) -> Result<(), Exception> {
        self.record(method::TEXT_DOCUMENT_DID_CLOSE)?;
        self.documents
            .lock()
            .unwrap()
            .remove(&params.text_document.uri.to_string());
        Ok(())
    }
}
