use crate::error::AppError;

pub fn validate_login_form(username: &str, password: &str) -> Result<(), AppError> {
    if username.trim().is_empty() {
        return Err(AppError::validation("Username is required"));
    }

    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validation() {
        assert!(validate_login_form("anny", "password123").is_ok());
        assert!(validate_login_form("  ", "password123").is_err());
        assert!(validate_login_form("anny", "").is_err());
    }
}
