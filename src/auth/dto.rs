use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for login. Only presence is checked here so that a malformed
/// email fails the same way as an unknown one.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: "hunter22".into(),
        };
        let rendered = format!("{req:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter22"));
    }
}
