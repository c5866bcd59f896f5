//! # Tilesync Test
//! In-memory transport and harness for driving real host & peer sessions in tests.

pub mod local_hub;

pub use harness::{exchange, host_with_peers, Participant, TestHost, TestPeer};
pub use local_hub::{Endpoint, LocalHub, HOST_CONNECTION};

/// Installs a test logger once; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
