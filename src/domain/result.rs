//! Result type alias for docmodel
//!
//! This module provides a convenient Result type alias that uses ModelError
//! as the error type.

use super::errors::ModelError;

/// Result type alias for docmodel operations
///
/// # Examples
///
/// ```
/// use docmodel::domain::result::Result;
/// use docmodel::domain::errors::ModelError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ModelError::Configuration("schema not set".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ModelError::MissingIdentifier("User".to_string()));
        assert!(result.is_err());
    }
}
