//! CLI command implementations

pub mod init;
pub mod preview;
pub mod redact;
pub mod validate;
