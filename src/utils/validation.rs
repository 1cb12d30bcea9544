use crate::utils::error::{RelayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 不把值本身寫進錯誤 (可能是密鑰)
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("crm.auth_url", "https://example.com/oauth2/token").is_ok());
        assert!(validate_url("crm.auth_url", "http://localhost:8080").is_ok());
        assert!(validate_url("crm.auth_url", "").is_err());
        assert!(validate_url("crm.auth_url", "invalid-url").is_err());
        assert!(validate_url("crm.auth_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("server.port", 3000, 1).is_ok());
        assert!(validate_positive_number("server.port", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string_hides_value() {
        let err = validate_non_empty_string("crm.client_secret", "   ").unwrap_err();
        assert!(matches!(err, RelayError::MissingConfigError { ref field } if field == "crm.client_secret"));
        assert!(validate_non_empty_string("crm.client_secret", "s3cret").is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("cache_notify.timeout_seconds", 5, 1, 300).is_ok());
        assert!(validate_range("cache_notify.timeout_seconds", 0, 1, 300).is_err());
        assert!(validate_range("cache_notify.timeout_seconds", 301, 1, 300).is_err());
    }
}
