// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors raised while accumulating header parameters and claims.

/// A header parameter or claim was rejected by its setter.
///
/// A rejected call never modifies the accumulator it was made on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Custom field name collides with a registered name
    #[error("'{0}' is a registered name and cannot be set as a custom field")]
    InvalidFieldName(String),

    /// Registered field was given an empty value
    #[error("'{0}' cannot be empty")]
    EmptyValue(&'static str),

    /// Registered field expects a URI
    #[error("'{field}' must be a valid URI: {reason}")]
    InvalidUri { field: &'static str, reason: String },

    /// The header was finalized without an algorithm
    #[error("the 'alg' header is required")]
    MissingAlgorithm,
}

impl FieldError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            FieldError::InvalidFieldName(_) => "invalid_field_name",
            FieldError::EmptyValue(_) => "empty_field_value",
            FieldError::InvalidUri { .. } => "invalid_field_uri",
            FieldError::MissingAlgorithm => "missing_algorithm",
        }
    }
}

/// Non-empty check shared by the registered setters.
pub(crate) fn require_text(field: &'static str, value: String) -> Result<String, FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::EmptyValue(field))
    } else {
        Ok(value)
    }
}

/// Absolute URI check; the original string is returned unchanged.
pub(crate) fn require_uri(field: &'static str, value: String) -> Result<String, FieldError> {
    let value = require_text(field, value)?;
    url::Url::parse(&value).map_err(|e| FieldError::InvalidUri {
        field,
        reason: e.to_string(),
    })?;
    Ok(value)
}
