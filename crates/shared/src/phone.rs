//! Phone number normalization and validation.

use validator::ValidationError;

lazy_static::lazy_static! {
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\d{10,15}$").unwrap();
}

/// Normalize a requester phone number to bare digits.
///
/// Accepts `+7...`, `8...` and already-normalized `7...` forms; a leading
/// `8` on an 11-digit number is rewritten to the `7` country code.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('8') {
        format!("7{}", &digits[1..])
    } else {
        digits
    }
}

/// Validates that a phone number is 10-15 digits after normalization.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(&normalize_phone(phone)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must contain 10-15 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_plus() {
        assert_eq!(normalize_phone("+71234567890"), "71234567890");
    }

    #[test]
    fn test_normalize_rewrites_leading_eight() {
        assert_eq!(normalize_phone("81234567890"), "71234567890");
    }

    #[test]
    fn test_normalize_keeps_canonical_form() {
        assert_eq!(normalize_phone("71234567890"), "71234567890");
    }

    #[test]
    fn test_normalize_drops_separators() {
        assert_eq!(normalize_phone("+7 (123) 456-78-90"), "71234567890");
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+71234567890").is_ok());
        assert!(validate_phone("81234567890").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("not a phone").is_err());
    }
}
