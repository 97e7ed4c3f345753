//! Kanban columns and the upcoming-deadlines list.

use super::task::{Task, TaskStatus};

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Tasks grouped by status, each column in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
    /// Tasks whose status this client does not recognize.
    pub other: Vec<&'a Task>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub other: usize,
}

impl BoardStats {
    pub fn total(&self) -> usize { self.todo + self.in_progress + self.done + self.other }
}

impl<'a> Board<'a> {
    pub fn column(&self, status: &TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
            TaskStatus::Other(_) => &self.other,
        }
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats { todo: self.todo.len(), in_progress: self.in_progress.len(), done: self.done.len(), other: self.other.len() }
    }

    pub fn is_empty(&self) -> bool { self.stats().total() == 0 }
}

pub fn partition_by_status(tasks: &[Task]) -> Board<'_> {
    let mut board = Board::default();
    for task in tasks {
        match task.status {
            TaskStatus::Todo => board.todo.push(task),
            TaskStatus::InProgress => board.in_progress.push(task),
            TaskStatus::Done => board.done.push(task),
            TaskStatus::Other(_) => board.other.push(task),
        }
    }
    board
}

/// The `limit` tasks due soonest. Ties keep their source order.
pub fn upcoming(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut due: Vec<&Task> = tasks.iter().filter(|t| t.due_date.is_some()).collect();
    // stable sort
    due.sort_by_key(|t| t.due_date);
    due.truncate(limit);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskId;
    use crate::domain::timestamp;

    fn task(id: i64, status: TaskStatus, due: Option<&str>) -> Task {
        Task {
            id: TaskId(id),
            title: format!("task {id}"),
            description: None,
            status,
            due_date: due.map(|d| timestamp::parse(d).unwrap()),
            tags: Vec::new(),
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<i64> { tasks.iter().map(|t| t.id.0).collect() }

    #[test]
    fn one_task_per_known_status() {
        let tasks = vec![task(1, TaskStatus::Done, None), task(2, TaskStatus::Todo, None), task(3, TaskStatus::InProgress, None)];
        let board = partition_by_status(&tasks);
        assert_eq!(ids(&board.todo), vec![2]);
        assert_eq!(ids(&board.in_progress), vec![3]);
        assert_eq!(ids(&board.done), vec![1]);
        assert!(board.other.is_empty());
        assert_eq!(board.stats(), BoardStats { todo: 1, in_progress: 1, done: 1, other: 0 });
    }

    #[test]
    fn empty_input_gives_empty_columns() {
        let board = partition_by_status(&[]);
        assert_eq!(board, Board::default());
        assert!(board.is_empty());
        assert!(upcoming(&[], DEFAULT_UPCOMING_LIMIT).is_empty());
    }

    #[test]
    fn columns_keep_source_order_and_unknown_statuses_stay_visible() {
        let tasks = vec![
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::Other("blocked".into()), None),
            task(3, TaskStatus::Todo, None),
            task(4, TaskStatus::Done, None),
            task(5, TaskStatus::Todo, None),
        ];
        let board = partition_by_status(&tasks);
        assert_eq!(ids(&board.todo), vec![1, 3, 5]);
        assert_eq!(ids(board.column(&TaskStatus::Other("anything".into()))), vec![2]);
        assert_eq!(board.stats().total(), tasks.len());
    }

    #[test]
    fn upcoming_sorts_stably_and_truncates() {
        let tasks = vec![
            task(1, TaskStatus::Todo, Some("2024-03-01T09:00:00Z")),
            task(2, TaskStatus::Todo, None),
            task(3, TaskStatus::Done, Some("2024-01-01T09:00:00Z")),
            task(4, TaskStatus::Todo, Some("2024-02-01T09:00:00Z")),
            task(5, TaskStatus::Todo, Some("2024-01-01T09:00:00Z")),
            task(6, TaskStatus::Todo, Some("2024-05-01T09:00:00Z")),
            task(7, TaskStatus::Todo, Some("2024-04-01T09:00:00Z")),
            task(8, TaskStatus::Todo, Some("2024-06-01T09:00:00Z")),
        ];
        let list = upcoming(&tasks, DEFAULT_UPCOMING_LIMIT);
        assert_eq!(ids(&list), vec![3, 5, 4, 1, 7]);
        assert!(list.windows(2).all(|w| w[0].due_date <= w[1].due_date));
        assert_eq!(upcoming(&tasks, 2).len(), 2);
        assert_eq!(upcoming(&tasks, 100).len(), 7);
        assert_eq!(upcoming(&tasks, DEFAULT_UPCOMING_LIMIT), list);
    }
}
