//! Logging setup.
//!
//! Library code only talks to the `log` facade; binaries pick the backend by
//! calling `init_logging` once at startup.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
