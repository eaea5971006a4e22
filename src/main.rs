use clap::Parser;
use lsp_server_core::logging::{LogConfig, init_logging};
use lsp_server_core::replay::{ReplayOptions, replay};

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::info;

/// Replay recorded LSP traffic (one JSON-RPC payload per line) through a
/// server with no-op handlers and print every outbound message
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File with one JSON-RPC payload per line (defaults to stdin)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Pretty-print outbound messages
    #[arg(long)]
    pretty: bool,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path (overrides LSP_LOG_FILE env var)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(args.log_level, args.log_file);
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let options = ReplayOptions { pretty: args.pretty };
    let stdout = io::stdout().lock();

    let summary = match args.input {
        Some(path) => {
            info!("Replaying {}", path.display());
            let file = File::open(&path).map_err(|e| {
                eprintln!("Failed to open {}: {e}", path.display());
                e
            })?;
            replay(BufReader::new(file), stdout, &options)?
        }
        None => {
            info!("Replaying stdin");
            replay(io::stdin().lock(), stdout, &options)?
        }
    };

    if summary.rejected > 0 {
        info!("{} of {} lines rejected", summary.rejected, summary.lines_read);
    }

    Ok(())
}
