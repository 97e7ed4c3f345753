use crate::domain::api::TaskApi;
use crate::domain::tag::{NewTag, Tag};
use crate::domain::task::{Task, TaskDraft, TaskId, TaskStatus, UpdateTask};
use crate::domain::user::Session;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::TimeZone;

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    fn session(&self) -> &Session;
    async fn list(&self) -> Result<Vec<Task>>;
    async fn create(&self, draft: TaskDraft) -> Result<Task>;
    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Task>;
    async fn delete(&self, id: TaskId) -> Result<()>;
    async fn list_tags(&self) -> Result<Vec<Tag>>;
    async fn create_tag(&self, name: &str, color: &str) -> Result<Tag>;
}

/// Task operations for one signed-in user. Due dates typed into drafts are
/// read as wall-clock time in `tz`.
#[derive(Clone)]
pub struct TaskServiceImpl<A: TaskApi, Tz: TimeZone> {
    api: A,
    session: Session,
    tz: Tz,
}

impl<A: TaskApi, Tz: TimeZone> TaskServiceImpl<A, Tz> {
    pub fn new(api: A, session: Session, tz: Tz) -> Self { Self { api, session, tz } }
}

#[async_trait]
impl<A, Tz> TaskService for TaskServiceImpl<A, Tz>
where
    A: TaskApi,
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Send + Sync,
{
    fn session(&self) -> &Session { &self.session }

    async fn list(&self) -> Result<Vec<Task>> {
        let tasks = self.api.list_tasks(&self.session).await.context("loading tasks")?;
        tracing::debug!(count = tasks.len(), "tasks loaded");
        Ok(tasks)
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task> {
        // nothing is sent unless the draft is complete and the date is real
        let input = draft.validate(&self.tz)?;
        let task = self.api.create_task(&self.session, &input).await.context("creating task")?;
        tracing::info!(task_id = task.id.0, "task created");
        Ok(task)
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
        let task = self.api.update_task(&self.session, id, &UpdateTask::status(status)).await.with_context(|| format!("updating task {}", id.0))?;
        tracing::info!(task_id = id.0, status = task.status.as_str(), "task status changed");
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        self.api.delete_task(&self.session, id).await.with_context(|| format!("deleting task {}", id.0))?;
        tracing::info!(task_id = id.0, "task deleted");
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> { Ok(self.api.list_tags(&self.session).await.context("loading tags")?) }

    async fn create_tag(&self, name: &str, color: &str) -> Result<Tag> {
        let input = NewTag::new(name, color)?;
        let tag = self.api.create_tag(&self.session, &input).await.context("creating tag (the name may already exist)")?;
        tracing::info!(tag_id = tag.id.0, name = %tag.name, "tag created");
        Ok(tag)
    }
}
