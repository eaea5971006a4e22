//! Wire-name agreement with the `lsp-types` crate
//!
//! Payloads produced by this crate must deserialize as the corresponding
//! `lsp-types` structures, and payloads produced by `lsp-types` must pass
//! validation here.

use lsp_server_core::lsp::content::{
    CodeLensOptions, Diagnostic, DiagnosticSeverity, ExecuteCommandOptions, HoverParams,
    HoverResult, InitializeResult, MessageActionItem, MessageType, Position,
    PublishDiagnosticsParams, Range, Registration, RegistrationParams, ServerCapabilities,
    ShowMessageRequestParams, TextDocumentSync, TextDocumentSyncKind, Unregistration,
    UnregistrationParams,
};
use lsp_server_core::lsp::content::{CodeActionParams, DidChangeTextDocumentParams};
use lsp_server_core::{
    Content, DocumentUri, Message, MessageKind, Server, ServerInterface, dispatch_payload,
};
use serde_json::{Value, json};

fn uri(text: &str) -> DocumentUri {
    DocumentUri::parse(text).unwrap()
}

fn lsp_uri(text: &str) -> lsp_types::Uri {
    text.parse().unwrap()
}

fn lsp_range(start: (u32, u32), end: (u32, u32)) -> lsp_types::Range {
    lsp_types::Range::new(
        lsp_types::Position::new(start.0, start.1),
        lsp_types::Position::new(end.0, end.1),
    )
}

#[test]
fn test_initialize_result_matches_lsp_types() {
    let capabilities = ServerCapabilities {
        text_document_sync: Some(TextDocumentSync::Kind(TextDocumentSyncKind::Full)),
        hover_provider: Some(true),
        code_lens_provider: Some(CodeLensOptions {
            resolve_provider: Some(false),
        }),
        execute_command_provider: Some(ExecuteCommandOptions::new(vec!["build".to_string()])),
        ..Default::default()
    };
    let value = InitializeResult::new(capabilities).to_value().unwrap();

    let theirs: lsp_types::InitializeResult = serde_json::from_value(value).unwrap();
    assert_eq!(
        theirs.capabilities.text_document_sync,
        Some(lsp_types::TextDocumentSyncCapability::Kind(
            lsp_types::TextDocumentSyncKind::FULL
        ))
    );
    assert_eq!(
        theirs.capabilities.hover_provider,
        Some(lsp_types::HoverProviderCapability::Simple(true))
    );
    assert_eq!(
        theirs.capabilities.execute_command_provider.unwrap().commands,
        vec!["build".to_string()]
    );
    assert_eq!(
        theirs.capabilities.code_lens_provider.unwrap().resolve_provider,
        Some(false)
    );
}

#[test]
fn test_publish_diagnostics_matches_lsp_types() {
    let range = Range::new(Position::new(2, 4), Position::new(2, 9));
    let params = PublishDiagnosticsParams::new(
        uri("file:///src/main.rs"),
        vec![
            Diagnostic::new(range, "unused variable")
                .with_severity(DiagnosticSeverity::Warning)
                .with_code(4i64)
                .with_source("rustc"),
            Diagnostic::new(range, "type mismatch").with_code("E0308"),
        ],
    );

    let theirs: lsp_types::PublishDiagnosticsParams =
        serde_json::from_value(params.to_value().unwrap()).unwrap();
    assert_eq!(theirs.uri.as_str(), "file:///src/main.rs");
    assert_eq!(theirs.diagnostics[0].range, lsp_range((2, 4), (2, 9)));
    assert_eq!(
        theirs.diagnostics[0].severity,
        Some(lsp_types::DiagnosticSeverity::WARNING)
    );
    assert_eq!(
        theirs.diagnostics[0].code,
        Some(lsp_types::NumberOrString::Number(4))
    );
    assert_eq!(theirs.diagnostics[0].source.as_deref(), Some("rustc"));
    assert_eq!(
        theirs.diagnostics[1].code,
        Some(lsp_types::NumberOrString::String("E0308".to_string()))
    );
}

#[test]
fn test_show_message_request_matches_lsp_types() {
    let mut params = ShowMessageRequestParams::new(MessageType::Warning, "Reload window?");
    params.add_action(MessageActionItem::new("Reload"));

    let theirs: lsp_types::ShowMessageRequestParams =
        serde_json::from_value(params.to_value().unwrap()).unwrap();
    assert_eq!(theirs.typ, lsp_types::MessageType::WARNING);
    assert_eq!(theirs.message, "Reload window?");
    assert_eq!(theirs.actions.unwrap()[0].title, "Reload");
}

#[test]
fn test_registration_params_match_lsp_types() {
    let registrations = RegistrationParams::new(vec![
        Registration::new("sync", "textDocument/didSave")
            .with_register_options(json!({"includeText": true})),
    ]);
    let theirs: lsp_types::RegistrationParams =
        serde_json::from_value(registrations.to_value().unwrap()).unwrap();
    assert_eq!(theirs.registrations[0].method, "textDocument/didSave");
    assert_eq!(
        theirs.registrations[0].register_options,
        Some(json!({"includeText": true}))
    );

    let unregistrations =
        UnregistrationParams::new(vec![Unregistration::new("sync", "textDocument/didSave")]);
    let theirs: lsp_types::UnregistrationParams =
        serde_json::from_value(unregistrations.to_value().unwrap()).unwrap();
    assert_eq!(theirs.unregisterations[0].id, "sync");
}

#[test]
fn test_lsp_types_hover_params_validate() {
    let theirs = lsp_types::HoverParams {
        text_document_position_params: lsp_types::TextDocumentPositionParams::new(
            lsp_types::TextDocumentIdentifier::new(lsp_uri("file:///src/lib.rs")),
            lsp_types::Position::new(10, 3),
        ),
        work_done_progress_params: Default::default(),
    };

    let ours = HoverParams::from_value(serde_json::to_value(&theirs).unwrap()).unwrap();
    assert_eq!(ours.text_document.uri.path(), "/src/lib.rs");
    assert_eq!(ours.position, Position::new(10, 3));
}

#[test]
fn test_lsp_types_did_change_validates() {
    let theirs = lsp_types::DidChangeTextDocumentParams {
        text_document: lsp_types::VersionedTextDocumentIdentifier::new(
            lsp_uri("file:///src/lib.rs"),
            3,
        ),
        content_changes: vec![
            lsp_types::TextDocumentContentChangeEvent {
                range: Some(lsp_range((0, 0), (0, 2))),
                range_length: None,
                text: "fn".to_string(),
            },
            lsp_types::TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "fn main() {}".to_string(),
            },
        ],
    };

    let ours =
        DidChangeTextDocumentParams::from_value(serde_json::to_value(&theirs).unwrap()).unwrap();
    assert_eq!(ours.text_document.version, 3);
    assert!(!ours.content_changes[0].is_full());
    assert!(ours.content_changes[1].is_full());
}

#[test]
fn test_lsp_types_code_action_params_validate() {
    let range = lsp_range((1, 0), (1, 8));
    let theirs = lsp_types::CodeActionParams {
        text_document: lsp_types::TextDocumentIdentifier::new(lsp_uri("file:///a.rs")),
        range,
        context: lsp_types::CodeActionContext {
            diagnostics: vec![lsp_types::Diagnostic::new_simple(range, "unused".to_string())],
            only: None,
            trigger_kind: None,
        },
        work_done_progress_params: Default::default(),
        partial_result_params: Default::default(),
    };

    let ours = CodeActionParams::from_value(serde_json::to_value(&theirs).unwrap()).unwrap();
    assert_eq!(ours.context.diagnostics[0].message, "unused");
    assert_eq!(ours.range, Range::new(Position::new(1, 0), Position::new(1, 8)));
}

#[test]
fn test_lsp_types_hover_validates() {
    let theirs = lsp_types::Hover {
        contents: lsp_types::HoverContents::Array(vec![
            lsp_types::MarkedString::String("docs".to_string()),
            lsp_types::MarkedString::LanguageString(lsp_types::LanguageString {
                language: "rust".to_string(),
                value: "fn main()".to_string(),
            }),
        ]),
        range: Some(lsp_range((0, 0), (0, 4))),
    };

    let ours = HoverResult::from_value(serde_json::to_value(&theirs).unwrap()).unwrap();
    assert_eq!(ours.contents().len(), 2);
    assert_eq!(ours.contents()[1].value(), "fn main()");

    let back: lsp_types::Hover = serde_json::from_value(ours.to_value().unwrap()).unwrap();
    assert_eq!(back, theirs);
}

#[test]
fn test_lsp_types_request_dispatches() {
    let params = lsp_types::HoverParams {
        text_document_position_params: lsp_types::TextDocumentPositionParams::new(
            lsp_types::TextDocumentIdentifier::new(lsp_uri("file:///src/lib.rs")),
            lsp_types::Position::new(0, 0),
        ),
        work_done_progress_params: Default::default(),
    };
    let raw = json!({
        "jsonrpc": "2.0",
        "id": 11,
        "method": <lsp_types::request::HoverRequest as lsp_types::request::Request>::METHOD,
        "params": params,
    })
    .to_string();

    let server = Server::new();
    assert_eq!(dispatch_payload(&raw, &server).unwrap(), MessageKind::Request);

    let messages = server.outbox().drain();
    assert_eq!(messages.len(), 1);
    let Message::Response(response) = &messages[0] else {
        panic!("Expected response, got: {:?}", messages[0]);
    };
    assert_eq!(response.id().as_deref(), Some("11"));
    assert_eq!(response.result(), Some(&Value::Null));
}
