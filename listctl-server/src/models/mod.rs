//! Domain input types with validation at construction
//!
//! Request payloads are turned into these types before reaching the
//! service layer. Invalid input returns ValidationError, not panic.

pub mod item;
pub mod list;
pub mod user;
pub mod validation;

pub use item::{ItemFlag, ItemText, ItemTitle};
pub use list::ListTitle;
pub use user::Username;
pub use validation::ValidationError;
