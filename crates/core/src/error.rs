//! Core error types.

/// Errors raised while validating the core data model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A required field of a service instance is missing or blank.
    #[error("missing required field `{field}`: {reason}")]
    MissingField {
        /// Dotted path of the field, e.g. `spec.image`.
        field: &'static str,
        /// Operator-facing explanation.
        reason: String,
    },

    /// The action name failed validation.
    #[error("invalid action name: {0}")]
    InvalidActionName(#[from] crate::ActionNameError),
}

impl CoreError {
    /// Convenience constructor for [`CoreError::MissingField`].
    pub fn missing_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MissingField {
            field,
            reason: reason.into(),
        }
    }

    /// The field this error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } => Some(*field),
            Self::InvalidActionName(_) => None,
        }
    }
}
