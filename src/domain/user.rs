use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 72;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Registration payload.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() { return Err(ValidationError::EmptyName); }
        if email.is_empty() { return Err(ValidationError::EmptyEmail); }
        let len = password.chars().count();
        if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
            return Err(ValidationError::PasswordLength { min: PASSWORD_MIN_LEN, max: PASSWORD_MAX_LEN });
        }
        Ok(Self { name: name.to_string(), email: email.to_string(), password: password.to_string() })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials { email: self.email.clone(), password: self.password.clone() }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser").field("name", &self.name).field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String { "bearer".to_string() }

/// An authenticated user and the token that proves it.
///
/// Handed explicitly to every call that needs authentication; dropping it is
/// logging out.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self { Self { token: token.into(), user } }
    pub fn token(&self) -> &str { &self.token }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("user", &self.user).field("token", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_checks_password_length() {
        assert_eq!(NewUser::new("Ana", "ana@example.com", "short"), Err(ValidationError::PasswordLength { min: 8, max: 72 }));
        assert_eq!(NewUser::new("Ana", "ana@example.com", &"x".repeat(73)), Err(ValidationError::PasswordLength { min: 8, max: 72 }));
        assert_eq!(NewUser::new(" ", "ana@example.com", "long enough"), Err(ValidationError::EmptyName));
        assert_eq!(NewUser::new("Ana", "", "long enough"), Err(ValidationError::EmptyEmail));
        let ok = NewUser::new(" Ana ", " ana@example.com", "long enough").unwrap();
        assert_eq!(ok.credentials(), Credentials { email: "ana@example.com".into(), password: "long enough".into() });
    }

    #[test]
    fn secrets_stay_out_of_debug_output() {
        let user = User { id: UserId(1), name: "Ana".into(), email: "ana@example.com".into() };
        let session = Session::new("secret-token", user);
        assert!(!format!("{session:?}").contains("secret-token"));
        let creds = Credentials { email: "a@b.c".into(), password: "hunter22".into() };
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}
