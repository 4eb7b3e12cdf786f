//! Database layer built on SQLite.
//!
//! Provides connection management, versioned schema migrations, and the
//! ordered task store. Every handle comes out of [`db::Db`] with migrations
//! already applied, so the rest of the crate can assume the current schema.

/// Core database connection and initialization.
pub mod db;

/// Versioned schema migration system, including the one-time position
/// backfill for legacy rows.
pub mod migrations;

/// Task storage with position-based total ordering: CRUD, pairwise swap,
/// and atomic bulk reassignment.
pub mod tasks;
