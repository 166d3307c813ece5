//! Domain error types shared across docveil.
//!
//! All fallible operations return [`Result<T, DocveilError>`](Result):
//!
//! ```rust
//! use docveil::domain::{DocveilError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(DocveilError::UnsupportedFormat("odt".to_string()))
//! }
//!
//! assert!(example().is_err());
//! ```

pub mod errors;
pub mod result;

pub use errors::DocveilError;
pub use result::Result;
