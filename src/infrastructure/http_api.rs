use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{
    api::{ApiError, TaskApi},
    tag::{NewTag, Tag},
    task::{NewTask, Task, TaskId, UpdateTask},
    user::{AccessToken, Credentials, NewUser, Session, User},
};

/// [`TaskApi`] over the task service's REST interface.
#[derive(Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).with_context(|| format!("invalid API url {base_url:?}"))?;
        let client = Client::builder().timeout(timeout).build().context("building HTTP client")?;
        Ok(Self { client, base_url: parsed.as_str().trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn register(&self, input: &NewUser) -> Result<User, ApiError> {
        send(self.client.post(self.url("/auth/register")).json(input)).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        // OAuth2 password form: the email goes in `username`
        let form = [("username", credentials.email.as_str()), ("password", credentials.password.as_str())];
        send(self.client.post(self.url("/auth/login")).form(&form)).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        send(self.client.get(self.url("/users/me")).bearer_auth(token)).await
    }

    async fn list_tags(&self, session: &Session) -> Result<Vec<Tag>, ApiError> {
        send(self.client.get(self.url("/tags")).bearer_auth(session.token())).await
    }

    async fn create_tag(&self, session: &Session, input: &NewTag) -> Result<Tag, ApiError> {
        send(self.client.post(self.url("/tags")).bearer_auth(session.token()).json(input)).await
    }

    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, ApiError> {
        send(self.client.get(self.url("/tasks")).bearer_auth(session.token())).await
    }

    async fn create_task(&self, session: &Session, input: &NewTask) -> Result<Task, ApiError> {
        send(self.client.post(self.url("/tasks")).bearer_auth(session.token()).json(input)).await
    }

    async fn update_task(&self, session: &Session, id: TaskId, input: &UpdateTask) -> Result<Task, ApiError> {
        send(self.client.put(self.url(&format!("/tasks/{}", id.0))).bearer_auth(session.token()).json(input)).await
    }

    async fn delete_task(&self, session: &Session, id: TaskId) -> Result<(), ApiError> {
        dispatch(self.client.delete(self.url(&format!("/tasks/{}", id.0))).bearer_auth(session.token())).await.map(|_| ())
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = dispatch(request).await?;
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

async fn dispatch(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "api response");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_for(status, &body))
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn error_for(status: StatusCode, body: &str) -> ApiError {
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail: serde_json::Value::String(s) }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("no details").to_string(),
        Err(_) => body.trim().to_string(),
    };
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(detail),
        StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        _ => ApiError::Rejected { status: status.as_u16(), detail },
    }
}
