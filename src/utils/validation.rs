use crate::utils::error::{ChatError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ChatError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ChatError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ChatError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChatError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_max_length(field_name: &str, value: &str, max_len: usize) -> Result<()> {
    if value.len() > max_len {
        return Err(ChatError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value is longer than {} bytes", max_len),
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
    // NaN fails both comparisons, reject it explicitly
    if !(value >= min && value <= max) {
        return Err(ChatError::InvalidConfigValueError {
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
    fn test_validate_path() {
        assert!(validate_path("chat.file", "chat.txt").is_ok());
        assert!(validate_path("chat.file", "").is_err());
        assert!(validate_path("chat.file", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("chat.max_patterns", 500, 1).is_ok());
        assert!(validate_positive_number("chat.max_patterns", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("winrate", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("winrate", 1.0, 0.0, 1.0).is_ok());
        assert!(validate_range("winrate", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range("winrate", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_max_length() {
        assert!(validate_max_length("from", "pasky", 20).is_ok());
        assert!(validate_max_length("from", &"x".repeat(21), 20).is_err());
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty_string("chat.default_reply", "   ").is_err());
        assert!(validate_non_empty_string("chat.default_reply", "hi").is_ok());
    }
}
