//! # Validation Utilities
//!
//! Input validation helpers for credentials and registration data.
//!
//! These checks gate malformed input before any store access. They are
//! shape checks only; uniqueness is enforced by the user directory.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a login: 3-32 characters, alphanumeric plus underscore.
pub fn validate_login(login: &str) -> Result<(), String> {
    if login.len() < 3 || login.len() > 32 {
        return Err("Login must be between 3 and 32 characters".to_string());
    }
    if !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Login may only contain letters, digits, and underscores".to_string());
    }
    Ok(())
}

/// Validate email format (basic check).
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.contains('@') && email.contains('.') {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Validate a password meets the minimum length policy.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        Err("Password must be at least 8 characters".to_string())
    } else {
        Ok(())
    }
}
