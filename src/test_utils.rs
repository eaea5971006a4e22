//! Test utilities and global setup
//!
//! Provides centralized test logging configuration and wire payload builders.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging globally - safe to call multiple times
    ///
    /// Respects `RUST_LOG`, defaulting to `debug`. Output goes through the
    /// test writer so it is only shown for failing tests.
    ///
    /// ```bash
    /// RUST_LOG=lsp_server_core::lsp::dispatch=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .with_target(true)
                .with_thread_ids(true)
                .try_init()
                .ok();
        });
    }
}

/// Builders for raw JSON-RPC payload lines
#[cfg(test)]
pub mod wire {
    use serde_json::{Value, json};

    /// Request line; `Value::Null` params are left out
    pub fn request(id: i64, method: &str, params: Value) -> String {
        let mut payload = json!({"jsonrpc": "2.0", "id": id, "method": method});
        if !params.is_null() {
            payload["params"] = params;
        }
        payload.to_string()
    }

    pub fn notification(method: &str, params: Value) -> String {
        json!({"jsonrpc": "2.0", "method": method, "params": params}).to_string()
    }

    pub fn initialize(id: i64) -> String {
        request(id, "initialize", json!({"rootUri": null, "capabilities": {}}))
    }
}
