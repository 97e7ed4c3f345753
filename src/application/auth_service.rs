use anyhow::{Context, Result};

use crate::domain::api::{ApiError, TaskApi};
use crate::domain::user::{Credentials, NewUser, Session, User};

/// Sign-up and sign-in. A successful login yields the [`Session`] every
/// other call takes; there is no process-wide current user.
#[derive(Clone)]
pub struct AuthService<A: TaskApi> {
    api: A,
}

impl<A: TaskApi> AuthService<A> {
    pub fn new(api: A) -> Self { Self { api } }

    pub async fn register(&self, input: &NewUser) -> Result<User> {
        let user = self.api.register(input).await.context("registering")?;
        tracing::info!(user_id = user.id.0, "account registered");
        Ok(user)
    }

    /// Exchanges credentials for a token, then fetches the user it belongs to.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let token = self.api.login(credentials).await.context("logging in")?;
        let user = self.api.current_user(&token.access_token).await.context("fetching current user")?;
        tracing::info!(user_id = user.id.0, "logged in");
        Ok(Session::new(token.access_token, user))
    }

    pub async fn register_and_login(&self, input: &NewUser) -> Result<Session> {
        self.register(input).await?;
        self.login(&input.credentials()).await
    }

    /// Rebuilds a session from a token obtained earlier. A token the API no
    /// longer accepts is dropped and `None` returned.
    pub async fn resume(&self, token: &str) -> Result<Option<Session>> {
        match self.api.current_user(token).await {
            Ok(user) => Ok(Some(Session::new(token, user))),
            Err(ApiError::Unauthorized(detail)) => {
                tracing::warn!(%detail, "saved token rejected");
                Ok(None)
            }
            Err(e) => Err(e).context("fetching current user"),
        }
    }
}
