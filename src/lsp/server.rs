//! Server with no-op handlers
//!
//! Answers every request with an empty result and ignores every notification.
//! Useful as a starting point and for exercising the message layer on its own.

use crate::lsp::content::{
    CancelParams, CodeActionParams, CodeActionResult, CodeLensParams, CodeLensResult,
    DefinitionParams, DefinitionResult, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, ExecuteCommandParams, HoverParams, HoverResult,
    InitializeParams, InitializeResult, ServerCapabilities,
};
use crate::lsp::error::Exception;
use crate::lsp::interface::{Outbox, ServerInterface};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Server {
    outbox: Outbox,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServerInterface for Server {
    fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, Exception> {
        debug!(
            "Initialize from process {:?} for {:?}",
            params.process_id(),
            params.root_uri().map(ToString::to_string)
        );
        Ok(InitializeResult::new(ServerCapabilities::default()))
    }

    fn shutdown(&self) -> Result<(), Exception> {
        Ok(())
    }

    fn workspace_execute_command(&self, _params: ExecuteCommandParams) -> Result<Value, Exception> {
        Ok(Value::Null)
    }

    fn text_document_hover(&self, _params: HoverParams) -> Result<Option<HoverResult>, Exception> {
        Ok(None)
    }

    fn text_document_definition(
        &self,
        _params: DefinitionParams,
    ) -> Result<DefinitionResult, Exception> {
        Ok(DefinitionResult::new(Vec::new()))
    }

    fn text_document_code_action(
        &self,
        _params: CodeActionParams,
    ) -> Result<CodeActionResult, Exception> {
        Ok(Vec::new())
    }

    fn text_document_code_lens(
        &self,
        _params: CodeLensParams,
    ) -> Result<CodeLensResult, Exception> {
        Ok(Vec::new())
    }

    fn initialized(&self) -> Result<(), Exception> {
        Ok(())
    }

    fn exit(&self) -> Result<(), Exception> {
        Ok(())
    }

    fn request_cancelled(&self, _params: CancelParams) -> Result<(), Exception> {
        Ok(())
    }

    fn workspace_did_change_configuration(
        &self,
        _params: DidChangeConfigurationParams,
    ) -> Result<(), Exception> {
        Ok(())
    }

    fn text_document_did_open(&self, _params: DidOpenTextDocumentParams) -> Result<(), Exception> {
        Ok(())
    }

    fn text_document_did_change(
        &self,
        _params: DidChangeTextDocumentParams,
    ) -> Result<(), Exception> {
        Ok(())
    }

    fn text_document_did_save(&self, _params: DidSaveTextDocumentParams) -> Result<(), Exception> {
        Ok(())
    }

    fn text_document_did_close(
        &self,
        _params: DidCloseTextDocumentParams,
    ) -> Result<(), Exception> {
        Ok(())
    }
}
