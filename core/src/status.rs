//! # Status Codes
//!
//! Response keys are decimal status codes rendered as strings.

use crate::error::AppResult;

/// Renders `code` as a response key.
pub fn status_code_to_string(code: u16) -> String {
    code.to_string()
}

/// Parses a response key back into a status code.
///
/// Fails with [`AppError::StatusCode`](crate::error::AppError::StatusCode)
/// when the key is not a decimal integer.
pub fn status_code_from_string(key: &str) -> AppResult<u16> {
    Ok(key.parse::<u16>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_round_trip() {
        assert_eq!(status_code_to_string(404), "404");
        assert_eq!(status_code_from_string("404").unwrap(), 404);
        assert_eq!(status_code_from_string(&status_code_to_string(201)).unwrap(), 201);
    }

    #[test]
    fn test_non_numeric_fails() {
        let err = status_code_from_string("abc").unwrap_err();
        assert!(matches!(err, AppError::StatusCode(_)));
        assert!(status_code_from_string("").is_err());
        assert!(status_code_from_string("4o4").is_err());
        assert!(status_code_from_string(" 404").is_err());
        assert!(status_code_from_string("404 ").is_err());
    }
}
