//! Replay recorded JSON-RPC traffic through a server
//!
//! Input holds one JSON-RPC payload per line. Each payload is dispatched, the
//! outbox is flushed, and every outbound message is written to the output as
//! JSON. Blank lines are skipped.

use crate::log_timing;
use crate::lsp::dispatch::dispatch_payload;
use crate::lsp::interface::{ServerInterface, ServerInterfaceExt};
use crate::lsp::message::Message;
use crate::lsp::server::Server;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use thiserror::Error;
use tracing::{Level, debug, info};

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Pretty-print outbound messages instead of one per line
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Non-blank input lines
    pub lines_read: usize,
    /// Input lines that could not be parsed into a message
    pub rejected: usize,
    pub messages_written: usize,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),
}

fn write_message<W: Write>(output: &mut W, message: &Message, pretty: bool) -> Result<(), ReplayError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *output, message)?;
    } else {
        serde_json::to_writer(&mut *output, message)?;
    }
    writeln!(output)?;
    Ok(())
}

/// Replay `input` through a [`Server`] with no-op handlers
pub fn replay<R: BufRead, W: Write>(
    input: R,
    output: W,
    options: &ReplayOptions,
) -> Result<ReplaySummary, ReplayError> {
    replay_with(&Server::new(), input, output, options)
}

/// Replay `input` through `server`
pub fn replay_with<S, R, W>(
    server: &S,
    input: R,
    mut output: W,
    options: &ReplayOptions,
) -> Result<ReplaySummary, ReplayError>
where
    S: ServerInterface + ?Sized,
    R: BufRead,
    W: Write,
{
    let start = Instant::now();
    let mut summary = ReplaySummary::default();

    for line in input.lines() {
        let line = line?;
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }
        summary.lines_read += 1;

        if let Err(exception) = dispatch_payload(payload, server) {
            debug!("Line {} rejected: {}", summary.lines_read, exception);
            summary.rejected += 1;
        }

        let mut outbound = Vec::new();
        server.flush(|message| outbound.push(message));
        for message in &outbound {
            write_message(&mut output, message, options.pretty)?;
        }
        summary.messages_written += outbound.len();
    }

    output.flush()?;
    log_timing!(Level::DEBUG, "replay", start.elapsed());
    info!(
        "Replayed {} lines ({} rejected), wrote {} messages",
        summary.lines_read, summary.rejected, summary.messages_written
    );
    Ok(summary)
}
