//! Client-side copy of the signed-in user's tasks and tags.
//!
//! Filled wholesale from the API (last fetch wins) and patched locally once a
//! mutation has been accepted, so the views never wait for a refetch.

use chrono::{NaiveDate, TimeZone};

use crate::domain::board::{self, Board, DEFAULT_UPCOMING_LIMIT};
use crate::domain::calendar::{CalendarGrid, MonthCursor};
use crate::domain::tag::Tag;
use crate::domain::task::{Task, TaskId, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Board,
    Calendar,
}

impl View {
    pub fn toggled(self) -> Self {
        match self {
            View::Board => View::Calendar,
            View::Calendar => View::Board,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    view: View,
    cursor: MonthCursor,
}

impl Dashboard {
    pub fn new(today: NaiveDate) -> Self {
        Self { tasks: Vec::new(), tags: Vec::new(), view: View::Board, cursor: MonthCursor::containing(today) }
    }

    pub fn tasks(&self) -> &[Task] { &self.tasks }
    pub fn tags(&self) -> &[Tag] { &self.tags }
    pub fn task(&self, id: TaskId) -> Option<&Task> { self.tasks.iter().find(|t| t.id == id) }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) { self.tasks = tasks; }
    pub fn replace_tags(&mut self, tags: Vec<Tag>) { self.tags = tags; }

    pub fn task_created(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn tag_created(&mut self, tag: Tag) {
        if !self.tags.iter().any(|t| t.id == tag.id) { self.tags.push(tag); }
    }

    /// Returns false when the task is not in the local copy.
    pub fn status_changed(&mut self, id: TaskId, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => { task.status = status; true }
            None => false,
        }
    }

    pub fn task_deleted(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.tags.clear();
    }

    pub fn view(&self) -> View { self.view }
    pub fn toggle_view(&mut self) { self.view = self.view.toggled(); }

    pub fn cursor(&self) -> MonthCursor { self.cursor }
    pub fn previous_month(&mut self) { self.cursor = self.cursor.previous(); }
    pub fn next_month(&mut self) { self.cursor = self.cursor.next(); }
    pub fn go_to_today(&mut self, today: NaiveDate) { self.cursor = MonthCursor::containing(today); }

    pub fn board(&self) -> Board<'_> { board::partition_by_status(&self.tasks) }

    pub fn calendar<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> CalendarGrid {
        CalendarGrid::build(self.cursor.year(), self.cursor.month0(), &self.tasks, today, tz)
    }

    pub fn upcoming(&self) -> Vec<&Task> { board::upcoming(&self.tasks, DEFAULT_UPCOMING_LIMIT) }
}
