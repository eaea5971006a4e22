//! Language Server Protocol message layer
//!
//! Raw JSON text enters through [`dispatch_payload`], is classified by
//! [`message`], validated against the [`content`] schema and routed by
//! [`dispatch`] to a [`ServerInterface`] implementation, whose answers are
//! queued in its [`Outbox`] until flushed.

pub mod content;
pub mod dispatch;
pub mod error;
pub mod identifier;
pub mod interface;
pub mod message;
pub mod server;
pub mod uri;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::dispatch_payload;
pub use error::{ErrorCode, Exception, LspError};
pub use interface::{Outbox, ServerInterface, ServerInterfaceExt};
pub use message::{
    Message, MessageKind, NotificationMessage, RequestId, RequestMessage, ResponseError,
    ResponseMessage, classify, parse_message,
};
pub use server::Server;
pub use uri::DocumentUri;
