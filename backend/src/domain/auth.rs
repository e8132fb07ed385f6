//! Login credentials accepted by the session login endpoint.
//!
//! Identity-provider integration is out of scope; these credentials only feed
//! the [`crate::domain::ports::LoginService`] adapters that back development
//! and test deployments.

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim; it is zeroed on drop.
///
/// # Examples
/// ```
/// use inkpost::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada ", "pw").expect("valid credentials");
/// assert!(creds.matches("ada", "pw"));
/// assert!(!creds.matches("ada", "PW"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password exactly as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Compare against a stored account; usernames match case-insensitively,
    /// passwords exactly.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let password_ok = self.password.len() == password.len()
            && self
                .password
                .bytes()
                .zip(password.bytes())
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0;
        self.username.eq_ignore_ascii_case(username.trim()) && password_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("grace", "", LoginValidationError::EmptyPassword)]
    fn rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("Grace", "secret", true)]
    #[case("GRACE", "secret", true)]
    #[case("grace", "secret ", false)]
    #[case("grace", "Secret", false)]
    #[case("hopper", "secret", false)]
    fn matches_compares_stored_account(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: bool,
    ) {
        let creds = LoginCredentials::try_from_parts("  grace  ", "secret").expect("valid shape");
        assert_eq!(creds.matches(username, password), expected);
    }
}
