//! Core library modules for the tickline application.
//!
//! Groups the domain types and supporting infrastructure: the task model and
//! its ordering vocabulary, the sequential playback engine, configuration,
//! data storage paths, the service error taxonomy, and console rendering.

pub mod config;
pub mod data_storage;
pub mod error;
pub mod playback;
pub mod task;
pub mod view;
