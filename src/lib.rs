// Docveil - Document Redaction Tool
// Copyright (c) 2025 Docveil Contributors
// Licensed under the MIT License

//! # Docveil - document redaction
//!
//! Docveil removes sensitive entities from documents before they are shared.
//!
//! ## Overview
//!
//! A redaction run:
//! - **Detects** entities (people, organizations, places, dates, amounts,
//!   identifiers, contact details) in the original text
//! - **Rewrites** the entities allowed by a 1-5 redaction level with
//!   placeholders or synthetic values, by byte offset
//! - **Escalates** to a whole-document marker when the rewritten text reads
//!   as strongly negative
//! - **Reconciles** the level-based rewrite with a secondary `<LABEL>`
//!   anonymization into one final text and an explicit [`redaction::Decision`]
//!
//! Uploaded documents live in a [`session::RedactionSession`], encrypted with
//! a key that exists only for the session.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`redaction`] - Level policy, capabilities, engine, audit and reports
//! - [`session`] - Decoding, extraction, encrypted document store
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docveil::redaction::{Capabilities, RedactionConfig, RedactionEngine};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = RedactionEngine::new(RedactionConfig::default(), Capabilities::builtin()?)?;
//! let result = engine.redact("John Smith works at Acme Corp in Paris.", 3, false)?;
//!
//! println!("{}", result.text);
//! println!("decision: {}", result.decision);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::DocveilError`]. Capability failures
//! keep the full `anyhow` context chain of the capability that broke:
//!
//! ```rust,no_run
//! use docveil::domain::DocveilError;
//! use docveil::session::DocumentFormat;
//!
//! match DocumentFormat::from_path("scan.odt") {
//!     Err(DocveilError::UnsupportedFormat(msg)) => eprintln!("{msg}"),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! Docveil uses structured logging with the `tracing` crate. Document text
//! and key material are never logged:
//!
//! ```rust,no_run
//! use tracing::info;
//!
//! info!(level = 3, span_count = 4, "Entities detected");
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod redaction;
pub mod session;
