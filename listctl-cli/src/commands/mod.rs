//! Command implementations for listctl CLI

pub mod serve;
pub mod user;

pub use serve::run_serve;
pub use user::run_user;
