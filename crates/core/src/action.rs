//! Action names.
//!
//! An [`ActionName`] is trimmed and lowercased on construction, so
//! `Deprovision` and `deprovision` name the same action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum allowed length for an [`ActionName`].
const ACTION_NAME_MAX_LEN: usize = 63;

/// Errors from constructing an [`ActionName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionNameError {
    /// The input was empty or contained only whitespace.
    #[error("action name cannot be empty or whitespace")]
    Empty,
    /// The normalized name contains characters other than `a-z`, `0-9`, `-` and `_`.
    #[error("action name contains invalid characters (only a-z, 0-9, - and _ allowed)")]
    InvalidCharacters,
    /// The normalized name exceeds [`ACTION_NAME_MAX_LEN`] characters.
    #[error("action name exceeds maximum length of {ACTION_NAME_MAX_LEN} characters")]
    TooLong,
}

/// The name of an action a bundle image knows how to run, such as
/// `deprovision`.
///
/// The name is passed verbatim as the first argument of the workload, so
/// it is trimmed and lowercased on construction and must then:
/// - Be non-empty.
/// - Contain only `a-z`, `0-9`, `-` and `_`.
/// - Be at most 63 characters long.
///
/// # Examples
///
/// ```
/// use brig_core::ActionName;
///
/// let name: ActionName = " Deprovision ".parse().unwrap();
/// assert_eq!(name, ActionName::deprovision());
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionName(String);

impl ActionName {
    /// Create a new `ActionName`, normalizing and validating the input.
    pub fn new(raw: &str) -> Result<Self, ActionNameError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ActionNameError::Empty);
        }
        if !normalized
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        {
            return Err(ActionNameError::InvalidCharacters);
        }
        if normalized.len() > ACTION_NAME_MAX_LEN {
            return Err(ActionNameError::TooLong);
        }

        Ok(Self(normalized))
    }

    /// The `deprovision` action.
    #[must_use]
    pub fn deprovision() -> Self {
        Self("deprovision".to_owned())
    }

    /// Return the inner string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActionName {
    type Err = ActionNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ActionName {
    type Error = ActionNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ActionName> for String {
    fn from(name: ActionName) -> Self {
        name.0
    }
}

impl AsRef<str> for ActionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for ActionName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
