//! Logging and observability
//!
//! Structured logging with `tracing`: a console layer, an optional JSON file
//! layer with rotation, and a few macros for the redaction lifecycle. Document
//! text and key material are never passed to these macros.
//!
//! # Example
//!
//! ```no_run
//! use docveil::logging::init_logging;
//! use docveil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a redaction run
///
/// # Example
///
/// ```no_run
/// use docveil::log_redaction_start;
///
/// log_redaction_start!(3, false, 1024);
/// ```
#[macro_export]
macro_rules! log_redaction_start {
    ($level:expr, $use_synthetic:expr, $text_len:expr) => {
        tracing::info!(
            level = $level,
            use_synthetic = $use_synthetic,
            text_bytes = $text_len,
            "Starting redaction"
        );
    };
}

/// Log the completion of a redaction run
///
/// # Example
///
/// ```no_run
/// use docveil::log_redaction_complete;
/// use std::time::Duration;
///
/// log_redaction_complete!("secondary_pass", 4, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_redaction_complete {
    ($decision:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            decision = %$decision,
            replacements = $count,
            duration_ms = $duration.as_millis() as u64,
            "Redaction completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use docveil::log_error_with_context;
/// use docveil::domain::DocveilError;
///
/// let error = DocveilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
