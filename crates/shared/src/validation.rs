//! Common validation utilities.

use validator::ValidationError;

/// Validates that a field is non-empty once surrounding whitespace is
/// removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Field must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a phone number still contains digits after normalization.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if crate::phone::digits_only(value).is_empty() {
        let mut err = ValidationError::new("phone_digits");
        err.message = Some("Phone number must contain digits".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Raphael").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }

    #[test]
    fn test_validate_not_blank_error_message() {
        let err = validate_not_blank("  ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Field must not be empty");
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("501234567").is_ok());
        assert!(validate_phone("+971 50 123 4567").is_ok());
        assert!(validate_phone("no digits").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_phone_error_message() {
        let err = validate_phone("---").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Phone number must contain digits"
        );
    }
}
