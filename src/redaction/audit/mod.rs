//! Audit trail module
//!
//! Records each redaction run with hashed entity values.

pub mod logger;

pub use logger::AuditLogger;
