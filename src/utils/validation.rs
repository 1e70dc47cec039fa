use crate::utils::error::{PlacerError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlacerError::ConfigError {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 副檔名不含開頭的點，也不能含路徑分隔符
pub fn validate_extension(field_name: &str, extension: &str) -> Result<()> {
    validate_non_empty_string(field_name, extension)?;

    if extension.contains(['.', '/', '\\']) || extension.chars().any(char::is_whitespace) {
        return Err(PlacerError::ConfigError {
            field: field_name.to_string(),
            message: format!(
                "`{}` must be a bare extension without dots, separators or spaces",
                extension
            ),
        });
    }
    Ok(())
}

pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if name.contains(['/', '\\', '\0']) {
        return Err(PlacerError::ConfigError {
            field: field_name.to_string(),
            message: format!("`{}` must be a plain file name", name),
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
        return Err(PlacerError::ConfigError {
            field: field_name.to_string(),
            message: format!("Value {} must be between {} and {}", value, min, max),
        });
    }
    Ok(())
}
