pub mod logging;
pub mod lsp;
pub mod replay;

#[cfg(test)]
mod test_utils;

pub use lsp::content::Content;
pub use lsp::{
    DocumentUri, ErrorCode, Exception, LspError, Message, MessageKind, Outbox, Server,
    ServerInterface, ServerInterfaceExt, dispatch_payload, parse_message,
};
