/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during password validation
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    /// Password is shorter than the minimum required length
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    /// Password contains no digit
    #[error("Password must contain at least one digit")]
    MissingDigit,

    /// Password contains no uppercase letter
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    /// Password contains no lowercase letter
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    /// Password contains no special character
    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Validate a registration password against the complexity policy
///
/// Checks run in order (fail fast): length, digit, uppercase, lowercase,
/// special character.
pub fn validate_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Err(PasswordPolicyError::MissingSpecial);
    }
    Ok(())
}
