use crate::domain::model::Item;
use crate::utils::error::{PlannerError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PlannerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PlannerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PlannerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PlannerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
    // NaN 不會通過任何比較
    if !(value >= min && value <= max) {
        return Err(PlannerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 檢查單一項目的欄位
pub fn validate_item(field_name: &str, item: &Item) -> Result<()> {
    validate_non_empty_string(&format!("{}.id", field_name), &item.id)?;
    validate_non_empty_string(&format!("{}.title", field_name), &item.title)?;
    if let Some(location) = item.location {
        validate_range(&format!("{}.location.lat", field_name), location.lat, -90.0, 90.0)?;
        validate_range(&format!("{}.location.lng", field_name), location.lng, -180.0, 180.0)?;
    }
    Ok(())
}

impl Validate for Item {
    fn validate(&self) -> Result<()> {
        validate_item(&format!("item '{}'", self.id), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("maps.base_url", "https://example.com").is_ok());
        assert!(validate_url("maps.base_url", "http://example.com").is_ok());
        assert!(validate_url("maps.base_url", "").is_err());
        assert!(validate_url("maps.base_url", "invalid-url").is_err());
        assert!(validate_url("maps.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("assistant.timeout_seconds", 30, 1).is_ok());
        assert!(validate_positive_number("assistant.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("lat", 35.0, -90.0, 90.0).is_ok());
        assert!(validate_range("lat", f64::NAN, -90.0, 90.0).is_err());
        assert!(validate_range("lng", 181.0, -180.0, 180.0).is_err());
    }

    #[test]
    fn test_validate_item() {
        assert!(Item::new("a", "Asakusa").with_location(35.7, 139.8).validate().is_ok());
        assert!(Item::new("a", "  ").validate().is_err());
        assert!(Item::new("a", "Pole").with_location(95.0, 0.0).validate().is_err());
    }
}
