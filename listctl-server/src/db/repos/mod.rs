//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Aggregates are loaded with JOINs, one query per collection (no N+1)
//! - Uniqueness is enforced by constraints, violations become `Conflict`
//! - Multi-row writes run in a transaction

pub mod items;
pub mod lists;
pub mod users;

pub use items::{ItemChanges, ItemRepo, NewItem, TodoItem};
pub use lists::{ListRepo, ListSummary, TodoList};
pub use users::{User, UserRepo};
