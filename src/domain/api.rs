use async_trait::async_trait;
use thiserror::Error;

use super::tag::{NewTag, Tag};
use super::task::{NewTask, Task, TaskId, UpdateTask};
use super::user::{AccessToken, Credentials, NewUser, Session, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("not authenticated: {0}")]
    Unauthorized(String),
    #[error("not allowed: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("could not reach the task service: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// The remote task service. Everything but registration and login needs a
/// [`Session`].
#[async_trait]
pub trait TaskApi: Send + Sync + 'static {
    async fn register(&self, input: &NewUser) -> Result<User, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;
    async fn list_tags(&self, session: &Session) -> Result<Vec<Tag>, ApiError>;
    async fn create_tag(&self, session: &Session, input: &NewTag) -> Result<Tag, ApiError>;
    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, session: &Session, input: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, session: &Session, id: TaskId, input: &UpdateTask) -> Result<Task, ApiError>;
    async fn delete_task(&self, session: &Session, id: TaskId) -> Result<(), ApiError>;
}
