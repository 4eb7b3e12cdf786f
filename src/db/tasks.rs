//! Task storage and position-based ordering operations.
//!
//! Holds the task list and its total order. The order is defined by the
//! integer `position` column; tasks are always read back sorted by
//! `(position ASC, created_at ASC)`, which is the canonical display and
//! playback order. Position values may contain gaps after deletions —
//! relative rank is what matters, not contiguity.
//!
//! ## Features
//!
//! - **CRUD**: Create, fetch, partially update, and delete tasks
//! - **Pairwise Swap**: Atomic position exchange for move-up/move-down
//! - **Bulk Reassignment**: Atomic application of a full new ordering
//! - **Neighbor Lookup**: Deterministic predecessor/successor resolution
//!   using `(position, created_at)` lexicographic comparison
//!
//! Every multi-write operation runs inside a transaction: a failure partway
//! rolls back, so readers never observe a duplicated or lost position.

use crate::db::db::Db;
use crate::libs::error::{TaskError, TaskResult};
use crate::libs::task::{Direction, NewTask, Task, TaskOrder, TaskUpdate};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// Canonical ordered read. `id` is a final tie-break so the order is total
/// even for legacy rows sharing both position and creation time.
const SELECT_ORDERED: &str = "SELECT id, title, timer_enabled, hours, minutes, seconds, position, created_at, updated_at
    FROM tasks ORDER BY position ASC, created_at ASC, id ASC";

const SELECT_BY_ID: &str = "SELECT id, title, timer_enabled, hours, minutes, seconds, position, created_at, updated_at
    FROM tasks WHERE id = ?1";

const INSERT_TASK: &str = "INSERT INTO tasks (title, timer_enabled, hours, minutes, seconds, position, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)";

const UPDATE_TASK: &str = "UPDATE tasks SET title = ?1, timer_enabled = ?2, hours = ?3, minutes = ?4, seconds = ?5, updated_at = ?6
    WHERE id = ?7";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Next position for a newly created task: one past the current maximum,
/// or 0 for an empty table, placing the new task last.
const NEXT_POSITION: &str = "SELECT COALESCE(MAX(position) + 1, 0) FROM tasks";

/// Immediate predecessor in canonical order: the greatest row strictly
/// before `(position, created_at)` lexicographically.
const SELECT_PREDECESSOR: &str = "SELECT id, position FROM tasks
    WHERE position < ?1 OR (position = ?1 AND created_at < ?2)
    ORDER BY position DESC, created_at DESC, id DESC LIMIT 1";

/// Immediate successor in canonical order.
const SELECT_SUCCESSOR: &str = "SELECT id, position FROM tasks
    WHERE position > ?1 OR (position = ?1 AND created_at > ?2)
    ORDER BY position ASC, created_at ASC, id ASC LIMIT 1";

/// Conditional position write used by swap and bulk reassignment. An unknown
/// id simply matches zero rows.
const UPDATE_POSITION: &str = "UPDATE tasks SET position = ?1, updated_at = ?2 WHERE id = ?3";

/// Store for tasks and their display order.
///
/// Owns a database connection with migrations already applied, so ordered
/// reads never have to tolerate a missing or unpopulated `position` column.
pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    /// Opens the store in the platform data directory.
    pub fn new() -> Result<Tasks> {
        Ok(Tasks { conn: Db::new()?.conn })
    }

    /// Opens the store at an explicit database path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Tasks> {
        Ok(Tasks { conn: Db::open(path)?.conn })
    }

    /// All tasks in canonical order.
    pub fn fetch_ordered(&self) -> TaskResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(SELECT_ORDERED)?;
        let tasks = stmt.query_map([], map_task)?.collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> TaskResult<Option<Task>> {
        let mut stmt = self.conn.prepare(SELECT_BY_ID)?;
        let mut rows = stmt.query_map(params![id], map_task)?;

        rows.next().transpose().map_err(TaskError::from)
    }

    /// Creates a task at the end of the list and returns the stored row.
    pub fn insert(&mut self, new_task: &NewTask) -> TaskResult<Task> {
        let title = validated_title(&new_task.title)?;
        validate_duration(new_task.hours, new_task.minutes, new_task.seconds)?;

        let now = Local::now().naive_local();
        let position = self.next_insert_position()?;
        self.conn.execute(
            INSERT_TASK,
            params![title, new_task.timer_enabled, new_task.hours, new_task.minutes, new_task.seconds, position, now],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(TaskError::NotFound)
    }

    /// Applies a partial update field-by-field against the stored record and
    /// refreshes `updated_at`. Explicit `null` for any of these fields is
    /// rejected rather than treated as "unset".
    pub fn update(&mut self, id: i64, update: &TaskUpdate) -> TaskResult<Task> {
        let current = self.get(id)?.ok_or(TaskError::NotFound)?;

        let title = match &update.title {
            None => current.title,
            Some(None) => return Err(TaskError::InvalidInput("Task title cannot be null".to_string())),
            Some(Some(t)) => validated_title(t)?,
        };
        let timer_enabled = resolve_field(&update.timer_enabled, current.timer_enabled, "timerEnabled")?;
        let hours = resolve_field(&update.hours, current.hours, "hours")?;
        let minutes = resolve_field(&update.minutes, current.minutes, "minutes")?;
        let seconds = resolve_field(&update.seconds, current.seconds, "seconds")?;
        validate_duration(hours, minutes, seconds)?;

        let now = Local::now().naive_local();
        self.conn.execute(UPDATE_TASK, params![title, timer_enabled, hours, minutes, seconds, now, id])?;

        self.get(id)?.ok_or(TaskError::NotFound)
    }

    pub fn delete(&mut self, id: i64) -> TaskResult<()> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        if affected == 0 {
            return Err(TaskError::NotFound);
        }

        Ok(())
    }

    /// `max(position) + 1`, or 0 for an empty store. Read-then-use by the
    /// create path; task creation is not concurrent-contended here.
    pub fn next_insert_position(&self) -> TaskResult<i64> {
        let position: i64 = self.conn.query_row(NEXT_POSITION, [], |row| row.get(0))?;

        Ok(position)
    }

    /// Exchanges the positions of two tasks as a single atomic unit: both
    /// writes succeed or neither does.
    pub fn swap_positions(&mut self, task_a: i64, position_a: i64, task_b: i64, position_b: i64) -> TaskResult<()> {
        let now = Local::now().naive_local();
        let tx = self.conn.transaction()?;
        tx.execute(UPDATE_POSITION, params![position_b, now, task_a])?;
        tx.execute(UPDATE_POSITION, params![position_a, now, task_b])?;
        tx.commit()?;

        Ok(())
    }

    /// Applies every `(id, position)` pair as a single atomic unit. Unknown
    /// ids match zero rows and are silently skipped, tolerating client-side
    /// lists that raced with a concurrent delete. An empty list is rejected
    /// to catch client bugs early.
    pub fn bulk_set_positions(&mut self, orders: &[TaskOrder]) -> TaskResult<()> {
        if orders.is_empty() {
            return Err(TaskError::InvalidInput("taskOrders must be a non-empty array".to_string()));
        }

        let now = Local::now().naive_local();
        let tx = self.conn.transaction()?;
        for order in orders {
            tx.execute(UPDATE_POSITION, params![order.position, now, order.id])?;
        }
        tx.commit()?;

        Ok(())
    }

    /// Moves a task one step up or down by swapping positions with its
    /// immediate neighbor, then returns the refreshed canonical order.
    pub fn move_task(&mut self, id: i64, direction: Direction) -> TaskResult<Vec<Task>> {
        let task = self.get(id)?.ok_or(TaskError::NotFound)?;
        let (neighbor_id, neighbor_position) = self.neighbor(&task, direction)?.ok_or(TaskError::AlreadyAtBoundary)?;

        self.swap_positions(task.id, task.position, neighbor_id, neighbor_position)?;
        self.fetch_ordered()
    }

    /// Reassigns positions in bulk and returns the refreshed canonical order.
    pub fn bulk_reorder(&mut self, orders: &[TaskOrder]) -> TaskResult<Vec<Task>> {
        self.bulk_set_positions(orders)?;
        self.fetch_ordered()
    }

    /// Finds the unique neighbor in the given direction, using
    /// `(position, created_at)` comparison so legacy rows sharing a position
    /// still resolve deterministically.
    fn neighbor(&self, task: &Task, direction: Direction) -> TaskResult<Option<(i64, i64)>> {
        let query = match direction {
            Direction::Up => SELECT_PREDECESSOR,
            Direction::Down => SELECT_SUCCESSOR,
        };
        let mut stmt = self.conn.prepare(query)?;
        let mut rows = stmt.query_map(params![task.position, task.created_at], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;

        rows.next().transpose().map_err(TaskError::from)
    }
}

fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        timer_enabled: row.get(2)?,
        hours: row.get(3)?,
        minutes: row.get(4)?,
        seconds: row.get(5)?,
        position: row.get(6)?,
        created_at: row.get::<_, NaiveDateTime>(7)?,
        updated_at: row.get::<_, NaiveDateTime>(8)?,
    })
}

fn validated_title(title: &str) -> TaskResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::InvalidInput("Task title cannot be empty".to_string()));
    }

    Ok(trimmed.to_string())
}

fn validate_duration(hours: u32, minutes: u32, seconds: u32) -> TaskResult<()> {
    if hours > 23 {
        return Err(TaskError::InvalidInput("Hours must be between 0 and 23".to_string()));
    }
    if minutes > 59 {
        return Err(TaskError::InvalidInput("Minutes must be between 0 and 59".to_string()));
    }
    if seconds > 59 {
        return Err(TaskError::InvalidInput("Seconds must be between 0 and 59".to_string()));
    }

    Ok(())
}

fn resolve_field<T: Copy>(field: &Option<Option<T>>, current: T, name: &str) -> TaskResult<T> {
    match field {
        None => Ok(current),
        Some(None) => Err(TaskError::InvalidInput(format!("Field '{name}' cannot be null"))),
        Some(Some(value)) => Ok(*value),
    }
}
