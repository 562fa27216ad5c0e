//! Logging setup.
//!
//! The crate logs through the `log` facade; `init_logging` installs
//! `env_logger` as the backend for binaries and tools.

mod init;

pub use init::{LoggingConfig, init_logging};
