#[cfg(test)]
mod tests {
    use super::super::auth_service::AuthService;
    use super::super::task_service::{TaskService, TaskServiceImpl};
    use crate::domain::api::{ApiError, TaskApi};
    use crate::domain::date_parts::DateParts;
    use crate::domain::error::ValidationError;
    use crate::domain::tag::{NewTag, Tag, TagId};
    use crate::domain::task::{NewTask, Task, TaskDraft, TaskId, TaskStatus, UpdateTask};
    use crate::domain::user::{AccessToken, Credentials, NewUser, Session, User, UserId};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct State {
        users: Vec<(User, String)>,
        tasks: Vec<Task>,
        tags: Vec<Tag>,
        next_id: i64,
        requests: usize,
    }

    #[derive(Clone, Default)]
    struct InMemoryApi {
        state: Arc<Mutex<State>>,
    }

    impl InMemoryApi {
        fn with_user(email: &str, password: &str) -> Self {
            let api = Self::default();
            api.state.lock().unwrap().users.push((User { id: UserId(1), name: "Ana".into(), email: email.into() }, password.into()));
            api
        }

        fn requests(&self) -> usize { self.state.lock().unwrap().requests }

        fn user_for(&self, token: &str) -> Result<User, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.requests += 1;
            state.users.iter()
                .find(|(u, _)| format!("token-{}", u.id.0) == token)
                .map(|(u, _)| u.clone())
                .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".into()))
        }

        fn next_id(&self) -> i64 {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.next_id
        }
    }

    #[async_trait]
    impl TaskApi for InMemoryApi {
        async fn register(&self, input: &NewUser) -> Result<User, ApiError> {
            let id = self.next_id();
            let mut state = self.state.lock().unwrap();
            state.requests += 1;
            if state.users.iter().any(|(u, _)| u.email == input.email) {
                return Err(ApiError::Rejected { status: 400, detail: "Email already registered".into() });
            }
            let user = User { id: UserId(100 + id), name: input.name.clone(), email: input.email.clone() };
            state.users.push((user.clone(), input.password.clone()));
            Ok(user)
        }
        async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.requests += 1;
            state.users.iter()
                .find(|(u, p)| u.email == credentials.email && *p == credentials.password)
                .map(|(u, _)| AccessToken { access_token: format!("token-{}", u.id.0), token_type: "bearer".into() })
                .ok_or_else(|| ApiError::Unauthorized("Incorrect email or password".into()))
        }
        async fn current_user(&self, token: &str) -> Result<User, ApiError> { self.user_for(token) }
        async fn list_tags(&self, session: &Session) -> Result<Vec<Tag>, ApiError> {
            self.user_for(session.token())?;
            Ok(self.state.lock().unwrap().tags.clone())
        }
        async fn create_tag(&self, session: &Session, input: &NewTag) -> Result<Tag, ApiError> {
            self.user_for(session.token())?;
            let tag = Tag { id: TagId(self.next_id()), name: input.name.clone(), color: input.color.clone() };
            self.state.lock().unwrap().tags.push(tag.clone());
            Ok(tag)
        }
        async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, ApiError> {
            self.user_for(session.token())?;
            Ok(self.state.lock().unwrap().tasks.clone())
        }
        async fn create_task(&self, session: &Session, input: &NewTask) -> Result<Task, ApiError> {
            self.user_for(session.token())?;
            let id = TaskId(self.next_id());
            let mut state = self.state.lock().unwrap();
            let tags = state.tags.iter().filter(|t| input.tag_ids.contains(&t.id)).cloned().collect();
            let task = Task { id, title: input.title.clone(), description: input.description.clone(), status: input.status.clone(), due_date: input.due_date, tags };
            state.tasks.push(task.clone());
            Ok(task)
        }
        async fn update_task(&self, session: &Session, id: TaskId, input: &UpdateTask) -> Result<Task, ApiError> {
            self.user_for(session.token())?;
            let mut state = self.state.lock().unwrap();
            let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else { return Err(ApiError::NotFound("Task not found".into())) };
            if let Some(s) = &input.status { task.status = s.clone(); }
            if let Some(t) = &input.title { task.title = t.clone(); }
            Ok(task.clone())
        }
        async fn delete_task(&self, session: &Session, id: TaskId) -> Result<(), ApiError> {
            self.user_for(session.token())?;
            let mut state = self.state.lock().unwrap();
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            if state.tasks.len() == before { Err(ApiError::NotFound("Task not found".into())) } else { Ok(()) }
        }
    }

    fn credentials() -> Credentials { Credentials { email: "ana@example.com".into(), password: "correct horse".into() } }

    async fn signed_in() -> (InMemoryApi, TaskServiceImpl<InMemoryApi, Utc>) {
        let api = InMemoryApi::with_user("ana@example.com", "correct horse");
        let session = AuthService::new(api.clone()).login(&credentials()).await.unwrap();
        (api.clone(), TaskServiceImpl::new(api, session, Utc))
    }

    fn draft(title: &str, day: &str) -> TaskDraft {
        let mut draft = TaskDraft::new(DateParts { day: day.into(), month: "2".into(), year: "2024".into(), hour: "10".into(), minute: "0".into() });
        draft.title = title.into();
        draft
    }

    #[tokio::test]
    async fn unit_create_and_list() {
        let (_, service) = signed_in().await;
        assert_eq!(service.session().user.email, "ana@example.com");
        let created = service.create(draft("Report", "15")).await.unwrap();
        assert_eq!(created.title, "Report");
        assert_eq!(created.status, TaskStatus::Todo);
        assert_eq!(created.due_date, Some(Utc.with_ymd_and_hms(2024, 2, 15, 10, 0, 0).unwrap()));
        let listed = service.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn unit_invalid_draft_never_reaches_the_api() {
        let (api, service) = signed_in().await;
        let before = api.requests();

        let err = service.create(draft("  ", "15")).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::EmptyTitle));
        let err = service.create(draft("Report", "30")).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ValidationError>(), Some(ValidationError::Date(_))));

        assert_eq!(api.requests(), before);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unit_status_change_and_delete() {
        let (_, service) = signed_in().await;
        let created = service.create(draft("Report", "15")).await.unwrap();
        let updated = service.set_status(created.id, TaskStatus::InProgress).await.unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);

        service.delete(created.id).await.unwrap();
        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NotFound(_))));
        let err = service.set_status(created.id, TaskStatus::Done).await.unwrap_err();
        assert!(format!("{err:#}").contains(&format!("updating task {}", created.id.0)));
    }

    #[tokio::test]
    async fn unit_tags_are_normalized_and_attached() {
        let (_, service) = signed_in().await;
        assert!(service.create_tag(" ", "red").await.is_err());
        assert!(service.create_tag("work", "nope").await.is_err());
        let tag = service.create_tag(" work ", "RED").await.unwrap();
        assert_eq!((tag.name.as_str(), tag.color.as_str()), ("work", "#ff0000"));
        assert_eq!(service.list_tags().await.unwrap(), vec![tag.clone()]);

        let mut with_tag = draft("Tagged", "1");
        with_tag.toggle_tag(tag.id);
        let created = service.create(with_tag).await.unwrap();
        assert_eq!(created.tag_ids(), vec![tag.id]);
    }

    #[tokio::test]
    async fn unit_login_resume_and_register() {
        let api = InMemoryApi::with_user("ana@example.com", "correct horse");
        let auth = AuthService::new(api.clone());

        let wrong = Credentials { password: "wrong".into(), ..credentials() };
        let err = auth.login(&wrong).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized(_))));

        let session = auth.login(&credentials()).await.unwrap();
        assert_eq!(session.token(), "token-1");
        assert_eq!(auth.resume(session.token()).await.unwrap(), Some(session));
        assert_eq!(auth.resume("token-404").await.unwrap(), None);

        let new_user = NewUser::new("Luis", "luis@example.com", "long password").unwrap();
        let session = auth.register_and_login(&new_user).await.unwrap();
        assert_eq!(session.user.name, "Luis");
        assert!(auth.register(&new_user).await.is_err());
    }
}
