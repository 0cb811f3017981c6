//! Common validation utilities.

use chrono::{Datelike, Utc};
use validator::ValidationError;

/// Earliest model year accepted for listed vehicles and alert criteria.
pub const MIN_MODEL_YEAR: i32 = 1900;

/// Highest listed vehicle price, in whole currency units.
pub const MAX_VEHICLE_PRICE: i64 = 100_000_000;

lazy_static::lazy_static! {
    /// Loose phone pattern: optional leading +, then digits with common separators.
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9 ().-]{6,19}$").unwrap();
    /// Vehicle identification number: 17 characters, no I, O or Q.
    static ref VIN_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
}

/// Latest model year accepted: manufacturers release next year's models early.
pub fn max_model_year() -> i32 {
    Utc::now().year() + 1
}

/// Validates that a model year is between 1900 and next calendar year.
pub fn validate_model_year(year: i32) -> Result<(), ValidationError> {
    if (MIN_MODEL_YEAR..=max_model_year()).contains(&year) {
        Ok(())
    } else {
        let mut err = ValidationError::new("model_year_range");
        err.message = Some(
            format!(
                "Year must be between {} and {}",
                MIN_MODEL_YEAR,
                max_model_year()
            )
            .into(),
        );
        Err(err)
    }
}

/// Validates a phone number in a permissive international format.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if PHONE_REGEX.is_match(phone.trim()) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number format is invalid".into());
        Err(err)
    }
}

/// Validates a 17-character VIN (uppercase, excluding I/O/Q).
pub fn validate_vin(vin: &str) -> Result<(), ValidationError> {
    if VIN_REGEX.is_match(vin) {
        Ok(())
    } else {
        let mut err = ValidationError::new("vin_format");
        err.message = Some("VIN must be 17 characters and may not contain I, O or Q".into());
        Err(err)
    }
}

/// Validates that a price is positive and at most [`MAX_VEHICLE_PRICE`].
pub fn validate_positive_price(price: i64) -> Result<(), ValidationError> {
    if (1..=MAX_VEHICLE_PRICE).contains(&price) {
        Ok(())
    } else {
        let mut err = ValidationError::new("price_range");
        err.message = Some(
            format!("Price must be greater than zero and at most {}", MAX_VEHICLE_PRICE).into(),
        );
        Err(err)
    }
}

/// Validates that every entry in a URL list looks like an http(s) URL.
pub fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    let bad = urls
        .iter()
        .any(|u| !(u.starts_with("https://") || u.starts_with("http://") || u.starts_with('/')));
    if bad {
        let mut err = ValidationError::new("image_url");
        err.message = Some("Image URLs must be absolute http(s) URLs or site paths".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_model_year() {
        assert!(validate_model_year(2020).is_ok());
        assert!(validate_model_year(MIN_MODEL_YEAR).is_ok());
        assert!(validate_model_year(max_model_year()).is_ok());
        assert!(validate_model_year(1899).is_err());
        assert!(validate_model_year(max_model_year() + 1).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("555.123.4567").is_ok());
        assert!(validate_phone("5551234").is_ok());
        assert!(validate_phone("12").is_err());
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone("+1 555 123 4567 8901 2345").is_err());
    }

    #[test]
    fn test_validate_phone_error_message() {
        let err = validate_phone("abc").unwrap_err();
        assert_eq!(err.code, "phone_format");
        assert!(err.message.unwrap().contains("invalid"));
    }

    #[test]
    fn test_validate_vin() {
        assert!(validate_vin("1HGCM82633A004352").is_ok());
        assert!(validate_vin("1HGCM82633A00435").is_err()); // 16 chars
        assert!(validate_vin("1HGCM82633A00435O").is_err()); // contains O
        assert!(validate_vin("1hgcm82633a004352").is_err()); // lowercase
    }

    #[test]
    fn test_validate_positive_price() {
        assert!(validate_positive_price(1).is_ok());
        assert!(validate_positive_price(0).is_err());
        assert!(validate_positive_price(-100).is_err());
        assert!(validate_positive_price(MAX_VEHICLE_PRICE).is_ok());
        assert!(validate_positive_price(MAX_VEHICLE_PRICE + 1).is_err());
        assert!(validate_positive_price(1_000_000_000_000_000_000).is_err());
    }

    #[test]
    fn test_validate_image_urls() {
        assert!(validate_image_urls(&[]).is_ok());
        assert!(validate_image_urls(&["https://cdn.example.com/a.jpg".to_string()]).is_ok());
        assert!(validate_image_urls(&["/images/a.jpg".to_string()]).is_ok());
        assert!(validate_image_urls(&["ftp://x/a.jpg".to_string()]).is_err());
    }
}
