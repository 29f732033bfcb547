//! Common test utilities
//!
//! Shared fixtures and source construction used across test modules.

use std::path::PathBuf;

use httpmock::MockServer;
use tosho_mangaplus::{MangaPlusSource, SourceConfigBuilder};

/// Loads a canned API response from `tests/responses`.
#[allow(dead_code)]
pub fn get_response(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/responses");
    path.push(filename);
    std::fs::read_to_string(path).expect("Failed to read response file")
}

/// Builds a source whose API base points at the mock server.
///
/// Retries are disabled so every test sees exactly the requests the source
/// issues itself.
#[allow(dead_code)]
pub fn mock_source(server: &MockServer) -> MangaPlusSource {
    init_tracing();

    let config = SourceConfigBuilder::default()
        .api_base(server.url("/api"))
        .max_retries(0u32)
        .build()
        .expect("Failed to build config");

    MangaPlusSource::with_config(config)
}

/// Routes library logs to the test output; `RUST_LOG=tosho_mangaplus=debug` to see them.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
