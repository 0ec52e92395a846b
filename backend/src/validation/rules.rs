//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Validates username format.
///
/// Requirements:
/// - Only ASCII alphanumeric characters, underscores, dots and dashes
/// - 3-50 characters in length
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.len() < 3 || username.len() > 50 {
        return Err(ValidationError::new("username_invalid_length"));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::new("username_invalid_characters"));
    }

    Ok(())
}
