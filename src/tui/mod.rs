//! Terminal front end: a blocking-poll event loop that turns key presses into
//! service calls and redraws after every step.

pub mod app;
pub mod ui;

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};

use crate::application::auth_service::AuthService;
use crate::application::task_service::{TaskService, TaskServiceImpl};
use crate::domain::api::TaskApi;
use crate::domain::user::Session;
use app::{App, Command};

const TICK: Duration = Duration::from_millis(200);

/// Runs until the user quits. `saved_token` skips the login screen while the
/// API still accepts it.
pub async fn run<B: Backend, A: TaskApi + Clone>(terminal: &mut Terminal<B>, api: A, saved_token: Option<String>) -> Result<()> {
    let auth = AuthService::new(api.clone());
    let mut app = App::new(Local::now().date_naive());
    let mut service = None;

    if let Some(token) = saved_token {
        match auth.resume(&token).await {
            Ok(Some(session)) => service = Some(start_session(&api, &mut app, session).await),
            Ok(None) => app.fail("Saved session has expired, please sign in"),
            Err(e) => app.fail(format!("{e:#}")),
        }
    }

    loop {
        let now = Local::now();
        terminal.draw(|f| ui::draw(f, &app, now.date_naive(), &Local))?;

        if !event::poll(TICK)? { continue; }
        let Event::Key(key) = event::read()? else { continue };
        // Only act on key presses; ignore repeats and releases
        if key.kind != KeyEventKind::Press { continue; }
        let Some(command) = app.handle_key(key, now.naive_local()) else { continue };

        match command {
            Command::Quit => break,
            Command::Login(credentials) => match auth.login(&credentials).await {
                Ok(session) => service = Some(start_session(&api, &mut app, session).await),
                Err(e) => app.fail(format!("{e:#}")),
            },
            Command::Register(input) => match auth.register_and_login(&input).await {
                Ok(session) => service = Some(start_session(&api, &mut app, session).await),
                Err(e) => app.fail(format!("{e:#}")),
            },
            Command::Logout => {
                if let Some(s) = service.take() { tracing::info!(user_id = s.session().user.id.0, "logged out"); }
                app.signed_out();
            }
            other => match &service {
                Some(s) => execute(s, &mut app, other).await,
                None => app.fail("Not signed in"),
            },
        }
    }
    Ok(())
}

async fn start_session<A: TaskApi + Clone>(api: &A, app: &mut App, session: Session) -> TaskServiceImpl<A, Local> {
    app.signed_in(session.user.clone());
    let service = TaskServiceImpl::new(api.clone(), session, Local);
    execute(&service, app, Command::Reload).await;
    service
}

/// Runs one dashboard command against the service and folds the outcome into
/// the UI state. Failures become an error notice; the local copy is only
/// patched after the service accepted the change.
pub async fn execute<S: TaskService>(service: &S, app: &mut App, command: Command) {
    let outcome = match command {
        Command::Reload => tokio::try_join!(service.list(), service.list_tags()).map(|(tasks, tags)| app.loaded(tasks, tags)),
        Command::CreateTask(draft) => service.create(draft).await.map(|task| app.task_created(task)),
        Command::CreateTag { name, color } => service.create_tag(&name, &color).await.map(|tag| app.tag_created(tag)),
        Command::SetStatus(id, status) => service.set_status(id, status).await.map(|task| app.status_changed(task)),
        Command::Delete(id) => service.delete(id).await.map(|()| app.task_deleted(id)),
        Command::Login(_) | Command::Register(_) | Command::Logout | Command::Quit => Ok(()),
    };
    if let Err(e) = outcome { app.fail(format!("{e:#}")); }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{anyhow, bail};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::date_parts::DateParts;
    use crate::domain::tag::{Tag, TagId};
    use crate::domain::task::{Task, TaskDraft, TaskId, TaskStatus};
    use crate::domain::user::{User, UserId};
    use super::app::Notice;

    struct FakeService {
        session: Session,
        tasks: Mutex<Vec<Task>>,
    }

    impl FakeService {
        fn new(tasks: Vec<Task>) -> Self {
            let user = User { id: UserId(1), name: "Ana".into(), email: "ana@example.com".into() };
            Self { session: Session::new("token-1", user), tasks: Mutex::new(tasks) }
        }
    }

    #[async_trait]
    impl TaskService for FakeService {
        fn session(&self) -> &Session { &self.session }

        async fn list(&self) -> Result<Vec<Task>> { Ok(self.tasks.lock().unwrap().clone()) }

        async fn create(&self, draft: TaskDraft) -> Result<Task> {
            let input = draft.validate(&Utc)?;
            let task = Task { id: TaskId(99), title: input.title, description: input.description, status: input.status, due_date: input.due_date, tags: vec![] };
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks.iter_mut().find(|t| t.id == id).ok_or_else(|| anyhow!("task {} not found", id.0))?;
            task.status = status;
            Ok(task.clone())
        }

        async fn delete(&self, id: TaskId) -> Result<()> {
            let mut tasks = self.tasks.lock().unwrap();
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before { bail!("task {} not found", id.0); }
            Ok(())
        }

        async fn list_tags(&self) -> Result<Vec<Tag>> { Ok(vec![Tag { id: TagId(1), name: "work".into(), color: "#ff0000".into() }]) }

        async fn create_tag(&self, name: &str, color: &str) -> Result<Tag> { Ok(Tag { id: TagId(2), name: name.into(), color: color.into() }) }
    }

    fn task(id: i64, status: TaskStatus) -> Task {
        Task { id: TaskId(id), title: format!("t{id}"), description: None, status, due_date: None, tags: vec![] }
    }

    fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 2, 10).unwrap() }

    #[tokio::test]
    async fn reload_fills_the_dashboard() {
        let service = FakeService::new(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Done)]);
        let mut app = App::new(today());
        execute(&service, &mut app, Command::Reload).await;
        assert_eq!(app.dashboard.tasks().len(), 2);
        assert_eq!(app.dashboard.tags().len(), 1);
        assert_eq!(app.notice, None);
    }

    #[tokio::test]
    async fn mutations_patch_the_local_copy() {
        let service = FakeService::new(vec![task(1, TaskStatus::Todo)]);
        let mut app = App::new(today());
        execute(&service, &mut app, Command::Reload).await;

        execute(&service, &mut app, Command::SetStatus(TaskId(1), TaskStatus::Done)).await;
        assert_eq!(app.dashboard.task(TaskId(1)).map(|t| t.status.clone()), Some(TaskStatus::Done));

        let mut draft = TaskDraft::new(DateParts { day: "29".into(), month: "2".into(), year: "2024".into(), hour: "9".into(), minute: "30".into() });
        draft.title = "Leap day".into();
        execute(&service, &mut app, Command::CreateTask(draft)).await;
        let created = app.dashboard.task(TaskId(99)).expect("created task");
        assert_eq!(created.due_date.map(|d| d.to_rfc3339()), Some("2024-02-29T09:30:00+00:00".to_string()));
        assert!(matches!(app.notice, Some(Notice::Info(_))));

        execute(&service, &mut app, Command::CreateTag { name: "home".into(), color: "#00ff00".into() }).await;
        assert_eq!(app.dashboard.tags().len(), 2);

        execute(&service, &mut app, Command::Delete(TaskId(1))).await;
        assert!(app.dashboard.task(TaskId(1)).is_none());
    }

    #[tokio::test]
    async fn failures_leave_state_untouched() {
        let service = FakeService::new(vec![task(1, TaskStatus::Todo)]);
        let mut app = App::new(today());
        execute(&service, &mut app, Command::Reload).await;

        let mut draft = TaskDraft::new(DateParts { day: "30".into(), month: "02".into(), year: "2024".into(), hour: "10".into(), minute: "00".into() });
        draft.title = "Impossible".into();
        execute(&service, &mut app, Command::CreateTask(draft)).await;
        assert!(matches!(&app.notice, Some(Notice::Error(msg)) if msg.contains("not a valid date")));
        assert_eq!(app.dashboard.tasks().len(), 1);

        execute(&service, &mut app, Command::Delete(TaskId(7))).await;
        assert!(matches!(&app.notice, Some(Notice::Error(msg)) if msg.contains("task 7 not found")));
        assert_eq!(app.dashboard.tasks().len(), 1);
    }
}
