//! Username validation
//!
//! Usernames are owned by the upstream identity system; this only guards
//! what we are willing to look up or store.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 256;

/// Letters, digits and `-._@+`, the identity system's default username alphabet
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._@+-]+$").expect("invalid username regex"));

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate a username.
    ///
    /// ```
    /// use listctl_server::models::Username;
    ///
    /// assert!(Username::new("alice@example.com").is_ok());
    /// assert!(Username::new("alice smith").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }

        if s.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "may only contain letters, digits and -._@+",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
