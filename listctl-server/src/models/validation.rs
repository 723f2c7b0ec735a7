//! Rejections for list, item and user input
//!
//! `field` is the JSON field name the client sent, so the message can be
//! returned as-is in a 400 body.

/// Why a title, text, username or flag was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Blank after trimming (titles) or absent (usernames)
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Longer than `max` characters
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Outside the accepted alphabet or shape (usernames, path ids)
    #[error("{field}: {reason}")]
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Not one of `Active`, `Finished` or `Canceled`
    #[error("invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },
}
