//! Result type alias for the redactor
//!
//! This module provides a convenient Result type alias that uses RedactorError
//! as the error type.

use super::errors::RedactorError;

/// Result type alias for redactor operations
///
/// # Examples
///
/// ```
/// use phi_redactor::domain::result::Result;
/// use phi_redactor::domain::errors::RedactorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RedactorError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RedactorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RedactorError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(RedactorError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
