//! Wire identifiers for the Language Server Protocol
//!
//! Every JSON key and method name the message layer reads or writes lives
//! here. Validation code refers to these constants; the serde derives on the
//! content types use the same camelCase spelling, and the content round-trip
//! tests keep the two in agreement.
//!
//! https://microsoft.github.io/language-server-protocol/specification

use std::fmt;

// ============================================================================
// JSON-RPC Envelope
// ============================================================================

/// JSON-RPC version field and the only supported value
pub const JSONRPC: &str = "jsonrpc";
pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// Field Names
// ============================================================================

/// Object keys used by the envelope and the content schema
pub mod field {
    pub const ID: &str = "id";
    pub const METHOD: &str = "method";
    pub const PARAMS: &str = "params";
    pub const RESULT: &str = "result";
    pub const ERROR: &str = "error";
    pub const DATA: &str = "data";
    pub const CODE: &str = "code";
    pub const MESSAGE: &str = "message";

    pub const URI: &str = "uri";
    pub const RANGE: &str = "range";
    pub const LINE: &str = "line";
    pub const CHARACTER: &str = "character";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const SEVERITY: &str = "severity";
    pub const SOURCE: &str = "source";
    pub const TITLE: &str = "title";
    pub const COMMAND: &str = "command";
    pub const COMMANDS: &str = "commands";
    pub const ARGUMENTS: &str = "arguments";
    pub const NEW_TEXT: &str = "newText";
    pub const VERSION: &str = "version";
    pub const TEXT_DOCUMENT: &str = "textDocument";
    pub const EDITS: &str = "edits";
    pub const CHANGES: &str = "changes";
    pub const DOCUMENT_CHANGES: &str = "documentChanges";
    pub const LANGUAGE: &str = "language";
    pub const LANGUAGE_ID: &str = "languageId";
    pub const TEXT: &str = "text";
    pub const POSITION: &str = "position";
    pub const SCHEME: &str = "scheme";
    pub const PATTERN: &str = "pattern";
    pub const VALUE: &str = "value";
    pub const CONTENTS: &str = "contents";
    pub const DIAGNOSTICS: &str = "diagnostics";
    pub const CONTEXT: &str = "context";
    pub const RANGE_LENGTH: &str = "rangeLength";
    pub const CONTENT_CHANGES: &str = "contentChanges";

    pub const DYNAMIC_REGISTRATION: &str = "dynamicRegistration";
    pub const APPLY_EDIT: &str = "applyEdit";
    pub const WORKSPACE_EDIT: &str = "workspaceEdit";
    pub const DID_CHANGE_CONFIGURATION: &str = "didChangeConfiguration";
    pub const DID_CHANGE_WATCHED_FILES: &str = "didChangeWatchedFiles";
    pub const SYMBOL: &str = "symbol";
    pub const EXECUTE_COMMAND: &str = "executeCommand";
    pub const WILL_SAVE: &str = "willSave";
    pub const WILL_SAVE_WAIT_UNTIL: &str = "willSaveWaitUntil";
    pub const DID_SAVE: &str = "didSave";
    pub const SAVE: &str = "save";
    pub const SNIPPET_SUPPORT: &str = "snippetSupport";
    pub const COMPLETION_ITEM: &str = "completionItem";
    pub const SYNCHRONIZATION: &str = "synchronization";
    pub const COMPLETION: &str = "completion";
    pub const HOVER: &str = "hover";
    pub const SIGNATURE_HELP: &str = "signatureHelp";
    pub const REFERENCES: &str = "references";
    pub const DOCUMENT_HIGHLIGHT: &str = "documentHighlight";
    pub const DOCUMENT_SYMBOL: &str = "documentSymbol";
    pub const FORMATTING: &str = "formatting";
    pub const RANGE_FORMATTING: &str = "rangeFormatting";
    pub const ON_TYPE_FORMATTING: &str = "onTypeFormatting";
    pub const DEFINITION: &str = "definition";
    pub const CODE_ACTION: &str = "codeAction";
    pub const CODE_LENS: &str = "codeLens";
    pub const DOCUMENT_LINK: &str = "documentLink";
    pub const RENAME: &str = "rename";
    pub const RETRY: &str = "retry";
    pub const WORKSPACE: &str = "workspace";
    pub const EXPERIMENTAL: &str = "experimental";
    pub const INCLUDE_TEXT: &str = "includeText";
    pub const OPEN_CLOSE: &str = "openClose";
    pub const CHANGE: &str = "change";
    pub const RESOLVE_PROVIDER: &str = "resolveProvider";
    pub const TRIGGER_CHARACTERS: &str = "triggerCharacters";
    pub const FIRST_TRIGGER_CHARACTER: &str = "firstTriggerCharacter";
    pub const MORE_TRIGGER_CHARACTER: &str = "moreTriggerCharacter";

    pub const TEXT_DOCUMENT_SYNC: &str = "textDocumentSync";
    pub const HOVER_PROVIDER: &str = "hoverProvider";
    pub const COMPLETION_PROVIDER: &str = "completionProvider";
    pub const SIGNATURE_HELP_PROVIDER: &str = "signatureHelpProvider";
    pub const DEFINITION_PROVIDER: &str = "definitionProvider";
    pub const REFERENCES_PROVIDER: &str = "referencesProvider";
    pub const DOCUMENT_HIGHLIGHT_PROVIDER: &str = "documentHighlightProvider";
    pub const DOCUMENT_SYMBOL_PROVIDER: &str = "documentSymbolProvider";
    pub const WORKSPACE_SYMBOL_PROVIDER: &str = "workspaceSymbolProvider";
    pub const CODE_ACTION_PROVIDER: &str = "codeActionProvider";
    pub const CODE_LENS_PROVIDER: &str = "codeLensProvider";
    pub const DOCUMENT_FORMATTING_PROVIDER: &str = "documentFormattingProvider";
    pub const DOCUMENT_RANGE_FORMATTING_PROVIDER: &str = "documentRangeFormattingProvider";
    pub const DOCUMENT_ON_TYPE_FORMATTING_PROVIDER: &str = "documentOnTypeFormattingProvider";
    pub const RENAME_PROVIDER: &str = "renameProvider";
    pub const DOCUMENT_LINK_PROVIDER: &str = "documentLinkProvider";
    pub const EXECUTE_COMMAND_PROVIDER: &str = "executeCommandProvider";

    pub const PROCESS_ID: &str = "processId";
    pub const ROOT_URI: &str = "rootUri";
    pub const CAPABILITIES: &str = "capabilities";
    pub const TRACE: &str = "trace";
    pub const INITIALIZATION_OPTIONS: &str = "initializationOptions";

    pub const TYPE: &str = "type";
    pub const ACTIONS: &str = "actions";
    pub const REGISTRATIONS: &str = "registrations";
    pub const UNREGISTERATIONS: &str = "unregisterations";
    pub const REGISTER_OPTIONS: &str = "registerOptions";
    pub const NAME: &str = "name";
    pub const ITEMS: &str = "items";
    pub const SCOPE_URI: &str = "scopeUri";
    pub const SECTION: &str = "section";
    pub const SETTINGS: &str = "settings";
    pub const EDIT: &str = "edit";
    pub const LABEL: &str = "label";
    pub const APPLIED: &str = "applied";
    pub const FAILURE_REASON: &str = "failureReason";
}

// ============================================================================
// Method Names
// ============================================================================

/// Method names of every message this layer receives or sends
pub mod method {
    // general
    pub const INITIALIZE: &str = "initialize";
    pub const INITIALIZED: &str = "initialized";
    pub const SHUTDOWN: &str = "shutdown";
    pub const EXIT: &str = "exit";
    pub const CANCEL_REQUEST: &str = "$/cancelRequest";

    // window and telemetry
    pub const WINDOW_SHOW_MESSAGE: &str = "window/showMessage";
    pub const WINDOW_SHOW_MESSAGE_REQUEST: &str = "window/showMessageRequest";
    pub const WINDOW_LOG_MESSAGE: &str = "window/logMessage";
    pub const TELEMETRY_EVENT: &str = "telemetry/event";

    // client
    pub const CLIENT_REGISTER_CAPABILITY: &str = "client/registerCapability";
    pub const CLIENT_UNREGISTER_CAPABILITY: &str = "client/unregisterCapability";

    // workspace
    pub const WORKSPACE_WORKSPACE_FOLDERS: &str = "workspace/workspaceFolders";
    pub const WORKSPACE_DID_CHANGE_CONFIGURATION: &str = "workspace/didChangeConfiguration";
    pub const WORKSPACE_CONFIGURATION: &str = "workspace/configuration";
    pub const WORKSPACE_EXECUTE_COMMAND: &str = "workspace/executeCommand";
    pub const WORKSPACE_APPLY_EDIT: &str = "workspace/applyEdit";

    // document
    pub const TEXT_DOCUMENT_DID_OPEN: &str = "textDocument/didOpen";
    pub const TEXT_DOCUMENT_DID_CHANGE: &str = "textDocument/didChange";
    pub const TEXT_DOCUMENT_DID_SAVE: &str = "textDocument/didSave";
    pub const TEXT_DOCUMENT_DID_CLOSE: &str = "textDocument/didClose";
    pub const TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";
    pub const TEXT_DOCUMENT_HOVER: &str = "textDocument/hover";
    pub const TEXT_DOCUMENT_DEFINITION: &str = "textDocument/definition";
    pub const TEXT_DOCUMENT_CODE_ACTION: &str = "textDocument/codeAction";
    pub const TEXT_DOCUMENT_CODE_LENS: &str = "textDocument/codeLens";
}

// ============================================================================
// Dispatch Tables
// ============================================================================

/// Client-to-server requests the dispatcher knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Initialize,
    Shutdown,
    WorkspaceExecuteCommand,
    TextDocumentHover,
    TextDocumentDefinition,
    TextDocumentCodeAction,
    TextDocumentCodeLens,
}

impl RequestMethod {
    pub const ALL: [RequestMethod; 7] = [
        RequestMethod::Initialize,
        RequestMethod::Shutdown,
        RequestMethod::WorkspaceExecuteCommand,
        RequestMethod::TextDocumentHover,
        RequestMethod::TextDocumentDefinition,
        RequestMethod::TextDocumentCodeAction,
        RequestMethod::TextDocumentCodeLens,
    ];

    /// Look up a request by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            method::INITIALIZE => Some(Self::Initialize),
            method::SHUTDOWN => Some(Self::Shutdown),
            method::WORKSPACE_EXECUTE_COMMAND => Some(Self::WorkspaceExecuteCommand),
            method::TEXT_DOCUMENT_HOVER => Some(Self::TextDocumentHover),
            method::TEXT_DOCUMENT_DEFINITION => Some(Self::TextDocumentDefinition),
            method::TEXT_DOCUMENT_CODE_ACTION => Some(Self::TextDocumentCodeAction),
            method::TEXT_DOCUMENT_CODE_LENS => Some(Self::TextDocumentCodeLens),
            _ => None,
        }
    }

    /// Wire name of the request
    pub fn name(self) -> &'static str {
        match self {
            Self::Initialize => method::INITIALIZE,
            Self::Shutdown => method::SHUTDOWN,
            Self::WorkspaceExecuteCommand => method::WORKSPACE_EXECUTE_COMMAND,
            Self::TextDocumentHover => method::TEXT_DOCUMENT_HOVER,
            Self::TextDocumentDefinition => method::TEXT_DOCUMENT_DEFINITION,
            Self::TextDocumentCodeAction => method::TEXT_DOCUMENT_CODE_ACTION,
            Self::TextDocumentCodeLens => method::TEXT_DOCUMENT_CODE_LENS,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Client-to-server notifications the dispatcher knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationMethod {
    Initialized,
    Exit,
    CancelRequest,
    WorkspaceDidChangeConfiguration,
    TextDocumentDidOpen,
    TextDocumentDidChange,
    TextDocumentDidSave,
    TextDocumentDidClose,
}

impl NotificationMethod {
    pub const ALL: [NotificationMethod; 8] = [
        NotificationMethod::Initialized,
        NotificationMethod::Exit,
        NotificationMethod::CancelRequest,
        NotificationMethod::WorkspaceDidChangeConfiguration,
        NotificationMethod::TextDocumentDidOpen,
        NotificationMethod::TextDocumentDidChange,
        NotificationMethod::TextDocumentDidSave,
        NotificationMethod::TextDocumentDidClose,
    ];

    /// Look up a notification by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            method::INITIALIZED => Some(Self::Initialized),
            method::EXIT => Some(Self::Exit),
            method::CANCEL_REQUEST => Some(Self::CancelRequest),
            method::WORKSPACE_DID_CHANGE_CONFIGURATION => {
                Some(Self::WorkspaceDidChangeConfiguration)
            }
            method::TEXT_DOCUMENT_DID_OPEN => Some(Self::TextDocumentDidOpen),
            method::TEXT_DOCUMENT_DID_CHANGE => Some(Self::TextDocumentDidChange),
            method::TEXT_DOCUMENT_DID_SAVE => Some(Self::TextDocumentDidSave),
            method::TEXT_DOCUMENT_DID_CLOSE => Some(Self::TextDocumentDidClose),
            _ => None,
        }
    }

    /// Wire name of the notification
    pub fn name(self) -> &'static str {
        match self {
            Self::Initialized => method::INITIALIZED,
            Self::Exit => method::EXIT,
            Self::CancelRequest => method::CANCEL_REQUEST,
            Self::WorkspaceDidChangeConfiguration => method::WORKSPACE_DID_CHANGE_CONFIGURATION,
            Self::TextDocumentDidOpen => method::TEXT_DOCUMENT_DID_OPEN,
            Self::TextDocumentDidChange => method::TEXT_DOCUMENT_DID_CHANGE,
            Self::TextDocumentDidSave => method::TEXT_DOCUMENT_DID_SAVE,
            Self::TextDocumentDidClose => method::TEXT_DOCUMENT_DID_CLOSE,
        }
    }
}

impl fmt::Display for NotificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_request_table_is_bijective() {
        let names: HashSet<_> = RequestMethod::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), RequestMethod::ALL.len());

        for request in RequestMethod::ALL {
            assert_eq!(RequestMethod::from_name(request.name()), Some(request));
        }
    }

    #[test]
    fn test_notification_table_is_bijective() {
        let names: HashSet<_> = NotificationMethod::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), NotificationMethod::ALL.len());

        for notification in NotificationMethod::ALL {
            assert_eq!(
                NotificationMethod::from_name(notification.name()),
                Some(notification)
            );
        }
    }

    #[test]
    fn test_tables_do_not_overlap() {
        for request in RequestMethod::ALL {
            assert!(NotificationMethod::from_name(request.name()).is_none());
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(RequestMethod::from_name("textDocument/rename"), None);
        assert_eq!(NotificationMethod::from_name(""), None);
        assert_eq!(RequestMethod::from_name("Initialize"), None);
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(RequestMethod::TextDocumentHover.to_string(), "textDocument/hover");
        assert_eq!(NotificationMethod::CancelRequest.to_string(), "$/cancelRequest");
    }
}
