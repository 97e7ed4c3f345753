//! UI state and key handling. Nothing here performs I/O: keys turn into
//! [`Command`]s for the run loop, and results come back through the
//! `*_loaded` / `task_*` methods.

use chrono::{NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::application::dashboard::{Dashboard, View};
use crate::domain::date_parts::{DateField, DateParts};
use crate::domain::error::ValidationError;
use crate::domain::tag::{DEFAULT_TAG_COLOR, PRESET_COLORS, Tag};
use crate::domain::task::{Task, TaskDraft, TaskId, TaskStatus};
use crate::domain::user::{Credentials, NewUser, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(Credentials),
    Register(NewUser),
    Reload,
    CreateTask(TaskDraft),
    CreateTag { name: String, color: String },
    SetStatus(TaskId, TaskStatus),
    Delete(TaskId),
    Logout,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen { Login, Dashboard }

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoginField { Name, Email, Password }

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub register: bool,
    pub field: LoginField,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self { register: false, field: LoginField::Email, name: String::new(), email: String::new(), password: String::new() }
    }
}

impl LoginForm {
    pub fn fields(&self) -> &'static [LoginField] {
        if self.register { &[LoginField::Name, LoginField::Email, LoginField::Password] } else { &[LoginField::Email, LoginField::Password] }
    }

    fn focus(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[step(idx, fields.len(), forward)];
    }

    fn input(&mut self) -> &mut String {
        match self.field {
            LoginField::Name => &mut self.name,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_mode(&mut self) {
        self.register = !self.register;
        self.field = if self.register { LoginField::Name } else { LoginField::Email };
    }

    fn submit(&self) -> Result<Command, ValidationError> {
        if self.register {
            return Ok(Command::Register(NewUser::new(&self.name, &self.email, &self.password)?));
        }
        let email = self.email.trim();
        if email.is_empty() { return Err(ValidationError::EmptyEmail); }
        Ok(Command::Login(Credentials { email: email.to_string(), password: self.password.clone() }))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField { Title, Description, Date(DateField), Tags, NewTag }

impl FormField {
    pub const ORDER: [FormField; 9] = [
        FormField::Title,
        FormField::Description,
        FormField::Date(DateField::Day),
        FormField::Date(DateField::Month),
        FormField::Date(DateField::Year),
        FormField::Date(DateField::Hour),
        FormField::Date(DateField::Minute),
        FormField::Tags,
        FormField::NewTag,
    ];
}

/// The create-task dialog.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub draft: TaskDraft,
    pub field: FormField,
    pub tag_cursor: usize,
    pub new_tag_name: String,
    pub new_tag_color: usize,
}

impl TaskForm {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { draft: TaskDraft::new(DateParts::now_in(&now)), field: FormField::Title, tag_cursor: 0, new_tag_name: String::new(), new_tag_color: default_color_index() }
    }

    pub fn new_tag_color(&self) -> &'static str { PRESET_COLORS[self.new_tag_color % PRESET_COLORS.len()] }

    fn focus(&mut self, forward: bool) {
        // leaving a date field is its blur
        if let FormField::Date(f) = self.field { self.draft.due.pad(f); }
        let idx = FormField::ORDER.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = FormField::ORDER[step(idx, FormField::ORDER.len(), forward)];
    }
}

fn default_color_index() -> usize { PRESET_COLORS.iter().position(|c| *c == DEFAULT_TAG_COLOR).unwrap_or(0) }

fn step(idx: usize, len: usize, forward: bool) -> usize {
    if forward { (idx + 1) % len } else { (idx + len - 1) % len }
}

pub struct App {
    pub screen: Screen,
    pub login: LoginForm,
    pub user: Option<User>,
    pub dashboard: Dashboard,
    pub form: Option<TaskForm>,
    pub column: usize,
    pub row: usize,
    pub pending_delete: Option<TaskId>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            screen: Screen::Login,
            login: LoginForm::default(),
            user: None,
            dashboard: Dashboard::new(today),
            form: None,
            column: 0,
            row: 0,
            pending_delete: None,
            notice: None,
        }
    }

    /// Board columns in display order; the "other" column only when it has tasks.
    pub fn columns(&self) -> Vec<(TaskStatus, Vec<&Task>)> {
        let board = self.dashboard.board();
        let mut statuses = vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];
        if !board.other.is_empty() { statuses.push(TaskStatus::Other("other".into())); }
        statuses.into_iter().map(|s| { let tasks = board.column(&s).to_vec(); (s, tasks) }).collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.columns().get(self.column).and_then(|(_, tasks)| tasks.get(self.row).copied())
    }

    fn clamp_selection(&mut self) {
        let sizes: Vec<usize> = self.columns().iter().map(|(_, t)| t.len()).collect();
        self.column = self.column.min(sizes.len() - 1);
        self.row = self.row.min(sizes[self.column].saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }
        match self.screen {
            Screen::Login => self.login_key(key),
            Screen::Dashboard if self.form.is_some() => self.form_key(key),
            Screen::Dashboard => self.dashboard_key(key, now),
        }
    }

    fn login_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => return Some(Command::Quit),
            KeyCode::Tab | KeyCode::Down => self.login.focus(true),
            KeyCode::BackTab | KeyCode::Up => self.login.focus(false),
            KeyCode::F(2) => self.login.toggle_mode(),
            KeyCode::Backspace => { self.login.input().pop(); }
            KeyCode::Char(c) => self.login.input().push(c),
            KeyCode::Enter => match self.login.submit() {
                Ok(cmd) => {
                    self.notice = Some(Notice::Info(if self.login.register { "Creating account...".into() } else { "Signing in...".into() }));
                    return Some(cmd);
                }
                Err(e) => self.notice = Some(Notice::Error(e.to_string())),
            },
            _ => {}
        }
        None
    }

    fn dashboard_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> Option<Command> {
        if let Some(id) = self.pending_delete.take() {
            self.notice = None;
            return matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')).then_some(Command::Delete(id));
        }
        match key.code {
            KeyCode::Char('q') => return Some(Command::Quit),
            KeyCode::Char('r') => return Some(Command::Reload),
            KeyCode::Char('l') => return Some(Command::Logout),
            KeyCode::Char('v') => self.dashboard.toggle_view(),
            KeyCode::Char('n') => {
                self.notice = None;
                self.form = Some(TaskForm::new(now));
            }
            _ => match self.dashboard.view() {
                View::Board => return self.board_key(key),
                View::Calendar => self.calendar_key(key, now.date()),
            },
        }
        None
    }

    fn board_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Left => { self.column = self.column.saturating_sub(1); self.clamp_selection(); }
            KeyCode::Right => { self.column += 1; self.clamp_selection(); }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => { self.row += 1; self.clamp_selection(); }
            KeyCode::Char('s') => {
                let task = self.selected_task()?;
                return Some(Command::SetStatus(task.id, task.status.next()));
            }
            KeyCode::Char('d') => {
                let task = self.selected_task()?;
                let (id, prompt) = (task.id, format!("Delete \"{}\"? (y/n)", task.title));
                self.pending_delete = Some(id);
                self.notice = Some(Notice::Info(prompt));
            }
            _ => {}
        }
        None
    }

    fn calendar_key(&mut self, key: KeyEvent, today: NaiveDate) {
        match key.code {
            KeyCode::Left | KeyCode::Char('[') => self.dashboard.previous_month(),
            KeyCode::Right | KeyCode::Char(']') => self.dashboard.next_month(),
            KeyCode::Char('t') => self.dashboard.go_to_today(today),
            _ => {}
        }
    }

    fn form_key(&mut self, key: KeyEvent) -> Option<Command> {
        let tag_count = self.dashboard.tags().len();
        let form = self.form.as_mut()?;
        match (form.field, key.code) {
            (_, KeyCode::Esc) => { self.form = None; self.notice = None; }
            (_, KeyCode::Tab | KeyCode::Down) => form.focus(true),
            (_, KeyCode::BackTab | KeyCode::Up) => form.focus(false),
            (FormField::NewTag, KeyCode::Enter) => {
                if form.new_tag_name.trim().is_empty() {
                    self.notice = Some(Notice::Error(ValidationError::EmptyTagName.to_string()));
                    return None;
                }
                return Some(Command::CreateTag { name: form.new_tag_name.clone(), color: form.new_tag_color().to_string() });
            }
            (_, KeyCode::Enter) => {
                form.draft.due.pad_all();
                return Some(Command::CreateTask(form.draft.clone()));
            }
            (FormField::Title, KeyCode::Char(c)) => form.draft.title.push(c),
            (FormField::Title, KeyCode::Backspace) => { form.draft.title.pop(); }
            (FormField::Description, KeyCode::Char(c)) => form.draft.description.push(c),
            (FormField::Description, KeyCode::Backspace) => { form.draft.description.pop(); }
            (FormField::Date(f), KeyCode::Char(c)) => { form.draft.due.push_digit(f, c); }
            (FormField::Date(f), KeyCode::Backspace) => form.draft.due.backspace(f),
            (FormField::Tags, KeyCode::Left) if tag_count > 0 => form.tag_cursor = (form.tag_cursor + tag_count - 1) % tag_count,
            (FormField::Tags, KeyCode::Right) if tag_count > 0 => form.tag_cursor = (form.tag_cursor + 1) % tag_count,
            (FormField::Tags, KeyCode::Char(' ')) => {
                if let Some(tag) = self.dashboard.tags().get(form.tag_cursor) { form.draft.toggle_tag(tag.id); }
            }
            (FormField::NewTag, KeyCode::Left) => form.new_tag_color = (form.new_tag_color + PRESET_COLORS.len() - 1) % PRESET_COLORS.len(),
            (FormField::NewTag, KeyCode::Right) => form.new_tag_color = (form.new_tag_color + 1) % PRESET_COLORS.len(),
            (FormField::NewTag, KeyCode::Char(c)) => form.new_tag_name.push(c),
            (FormField::NewTag, KeyCode::Backspace) => { form.new_tag_name.pop(); }
            _ => {}
        }
        None
    }

    pub fn signed_in(&mut self, user: User) {
        self.user = Some(user);
        self.screen = Screen::Dashboard;
        self.login = LoginForm::default();
        self.notice = None;
    }

    pub fn signed_out(&mut self) {
        self.user = None;
        self.screen = Screen::Login;
        self.form = None;
        self.pending_delete = None;
        self.dashboard.clear();
        self.column = 0;
        self.row = 0;
    }

    pub fn loaded(&mut self, tasks: Vec<Task>, tags: Vec<Tag>) {
        self.dashboard.replace_tasks(tasks);
        self.dashboard.replace_tags(tags);
        self.clamp_selection();
    }

    pub fn task_created(&mut self, task: Task) {
        self.notice = Some(Notice::Info(format!("Created \"{}\"", task.title)));
        self.dashboard.task_created(task);
        self.form = None;
    }

    pub fn tag_created(&mut self, tag: Tag) {
        if let Some(form) = self.form.as_mut() {
            form.draft.toggle_tag(tag.id);
            form.new_tag_name.clear();
        }
        self.notice = Some(Notice::Info(format!("Tag \"{}\" added", tag.name)));
        self.dashboard.tag_created(tag);
    }

    pub fn status_changed(&mut self, task: Task) {
        self.dashboard.status_changed(task.id, task.status);
        self.clamp_selection();
    }

    pub fn task_deleted(&mut self, id: TaskId) {
        self.dashboard.task_deleted(id);
        self.clamp_selection();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "operation failed");
        self.notice = Some(Notice::Error(message));
    }
}
