//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade so the
//! demo binary and the engine share one setup path.

mod init;

pub use init::{init_logging, LoggingConfig};
