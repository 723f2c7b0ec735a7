//! Item field validation and the status flag

use std::fmt;

use serde::Serialize;

use super::ValidationError;

/// Maximum length for item titles
const MAX_TITLE_LEN: usize = 256;

/// Maximum length for item body text
const MAX_TEXT_LEN: usize = 4096;

/// Validated item title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTitle(String);

impl ItemTitle {
    /// Create a new item title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 256 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated item body.
///
/// The field is required but may be empty; only the length is bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemText(String);

impl ItemText {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::TooLong {
                field: "text",
                max: MAX_TEXT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Item status flag.
///
/// Transitions are unconstrained: any flag may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ItemFlag {
    #[default]
    Active,
    Finished,
    Canceled,
}

impl ItemFlag {
    /// Parse a flag name, ignoring ASCII case.
    ///
    /// ```
    /// use listctl_server::models::ItemFlag;
    ///
    /// assert_eq!(ItemFlag::parse("finished").unwrap(), ItemFlag::Finished);
    /// assert!(ItemFlag::parse("done").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ValidationError::InvalidVariant {
                field: "flag",
                value: s.to_owned(),
            }),
        }
    }

    /// Canonical name, also the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Finished => "Finished",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for ItemFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
