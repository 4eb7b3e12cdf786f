//! # Tickline - Ordered Task List with Sequential Playback
//!
//! A personal productivity server: tasks with optional countdown timers,
//! position-based reordering, and a playback mode that walks the list one
//! timer at a time.
//!
//! ## Features
//!
//! - **Task Management**: Create, update, and delete tasks over a JSON API
//! - **Total Ordering**: Integer positions with atomic swap and bulk reorder
//! - **Sequential Playback**: Tick-driven countdown engine with pause,
//!   skip, grace-delay auto-advance, and manual-advance waiting states
//! - **Calendar Integration**: Read-only proxy to an external event provider
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tickline::db::tasks::Tasks;
//! use tickline::libs::task::Direction;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut tasks = Tasks::new()?;
//! let ordered = tasks.move_task(1, Direction::Up)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
pub mod web;
