//! External API clients consumed by the application.

pub mod calendar;
