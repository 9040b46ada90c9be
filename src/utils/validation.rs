// Validation utilities for string fields

/// Trim a string field, rejecting blank values when required.
pub fn trim_and_validate_field(field: &str, name: &str) -> Result<String, String> {
    let trimmed = field.trim().to_string();
    if trimmed.is_empty() {
        Err(format!("{} cannot be empty", name))
    } else {
        Ok(trimmed)
    }
}

/// Trim an optional string field, mapping blank values to None.
pub fn trim_optional_field(field: Option<&String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_validate_field() {
        assert_eq!(
            trim_and_validate_field("  export.zip  ", "file_name"),
            Ok("export.zip".to_string())
        );
        assert_eq!(
            trim_and_validate_field("   ", "file_name"),
            Err("file_name cannot be empty".to_string())
        );
    }

    #[test]
    fn test_trim_optional_field() {
        assert_eq!(trim_optional_field(None), None);
        assert_eq!(trim_optional_field(Some(&"  ".to_string())), None);
        assert_eq!(
            trim_optional_field(Some(&" hi ".to_string())),
            Some("hi".to_string())
        );
    }
}
