//! Coffee Cart Daemon
//!
//! Hosts one storefront session behind a single-writer lock, arms the
//! purchase confirmation expiry, and speaks a line-delimited JSON protocol.

pub mod config;
pub mod protocol;
pub mod state;

pub use config::DaemonConfig;
pub use protocol::{handle_line, Response};
pub use state::StateManager;
