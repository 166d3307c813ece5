//! Result type alias for docveil

use super::errors::DocveilError;

/// Result type alias for docveil operations
///
/// # Examples
///
/// ```
/// use docveil::domain::result::Result;
/// use docveil::domain::errors::DocveilError;
///
/// fn checked_level(level: i64) -> Result<i64> {
///     if (1..=5).contains(&level) {
///         Ok(level)
///     } else {
///         Err(DocveilError::InvalidLevel(level))
///     }
/// }
///
/// assert!(checked_level(3).is_ok());
/// assert!(checked_level(9).is_err());
/// ```
pub type Result<T> = std::result::Result<T, DocveilError>;
