use thiserror::Error;

use super::date_parts::DateError;

/// Input rejected on the client before anything is sent to the API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("tag name cannot be empty")]
    EmptyTagName,
    #[error("{0:?} is not a valid color")]
    InvalidColor(String),
    #[error("name is required")]
    EmptyName,
    #[error("email is required")]
    EmptyEmail,
    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
    #[error(transparent)]
    Date(#[from] DateError),
}
