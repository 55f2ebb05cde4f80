// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token encoding errors.
//!
//! Every failure of [`crate::JwtBuilder::build`] is reported as a single
//! [`JwtEncodingError`]. The variant identifies the phase that failed and the
//! underlying error is kept as the source.

use std::fmt;

use crate::encoder::HeaderConversionError;
use crate::jose::{FieldError, JwsAlgorithm};
use crate::keys::{KeySelectionError, KeySourceError};
use crate::signing::SignerError;

/// Phase of a build in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingPhase {
    /// Header or claims finalization
    Finalization,
    /// Signing key resolution
    KeySelection,
    /// Header/claims conversion to wire form
    Conversion,
    /// Signer construction
    SignerConstruction,
    /// Signature computation or serialization
    Signing,
}

impl fmt::Display for EncodingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncodingPhase::Finalization => "finalization",
            EncodingPhase::KeySelection => "key selection",
            EncodingPhase::Conversion => "conversion",
            EncodingPhase::SignerConstruction => "signer construction",
            EncodingPhase::Signing => "signing",
        })
    }
}

/// A token could not be encoded.
#[derive(Debug, thiserror::Error)]
pub enum JwtEncodingError {
    /// A header parameter or claim was rejected
    #[error("An error occurred while attempting to encode the Jwt: {0}")]
    InvalidField(#[source] FieldError),

    /// A header parameter could not be converted to wire form
    #[error("An error occurred while attempting to encode the Jwt: {0}")]
    HeaderConversion(#[source] HeaderConversionError),

    /// No key matched the algorithm
    #[error("An error occurred while attempting to encode the Jwt: Failed to select a key since there are no candidates for '{algorithm}'")]
    NoKeyFound { algorithm: JwsAlgorithm },

    /// More than one key matched the algorithm
    #[error(
        "An error occurred while attempting to encode the Jwt: Failed to select a key since there are multiple ({count}) candidates for '{algorithm}'"
    )]
    AmbiguousKey { algorithm: JwsAlgorithm, count: usize },

    /// The key source call failed
    #[error("An error occurred while attempting to encode the Jwt: Failed to select a key: {0}")]
    KeySource(#[source] KeySourceError),

    /// The resolved key could not be turned into a signer
    #[error("An error occurred while attempting to encode the Jwt: Failed to create a JWS signer: {0}")]
    SignerConstruction(#[source] SignerError),

    /// The signature could not be computed
    #[error("An error occurred while attempting to encode the Jwt: Failed to sign the JWT: {0}")]
    Signing(#[source] SignerError),

    /// The header or payload could not be serialized to JSON
    #[error("An error occurred while attempting to encode the Jwt: Failed to serialize the JWT: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl JwtEncodingError {
    /// Get the phase that failed.
    pub fn phase(&self) -> EncodingPhase {
        match self {
            JwtEncodingError::InvalidField(_) => EncodingPhase::Finalization,
            JwtEncodingError::NoKeyFound { .. }
            | JwtEncodingError::AmbiguousKey { .. }
            | JwtEncodingError::KeySource(_) => EncodingPhase::KeySelection,
            JwtEncodingError::HeaderConversion(_) => EncodingPhase::Conversion,
            JwtEncodingError::SignerConstruction(_) => EncodingPhase::SignerConstruction,
            JwtEncodingError::Signing(_) | JwtEncodingError::Serialization(_) => {
                EncodingPhase::Signing
            }
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            JwtEncodingError::InvalidField(e) => e.error_code(),
            JwtEncodingError::HeaderConversion(_) => "header_conversion_failed",
            JwtEncodingError::NoKeyFound { .. } => "no_key_found",
            JwtEncodingError::AmbiguousKey { .. } => "ambiguous_key",
            JwtEncodingError::KeySource(e) => e.error_code(),
            JwtEncodingError::SignerConstruction(_) => "signer_construction_failed",
            JwtEncodingError::Signing(_) => "signing_failed",
            JwtEncodingError::Serialization(_) => "serialization_failed",
        }
    }
}

impl From<FieldError> for JwtEncodingError {
    fn from(err: FieldError) -> Self {
        JwtEncodingError::InvalidField(err)
    }
}

impl From<HeaderConversionError> for JwtEncodingError {
    fn from(err: HeaderConversionError) -> Self {
        JwtEncodingError::HeaderConversion(err)
    }
}

impl From<KeySelectionError> for JwtEncodingError {
    fn from(err: KeySelectionError) -> Self {
        match err {
            KeySelectionError::NoKeyFound { algorithm } => JwtEncodingError::NoKeyFound { algorithm },
            KeySelectionError::AmbiguousKey { algorithm, count } => {
                JwtEncodingError::AmbiguousKey { algorithm, count }
            }
            KeySelectionError::Source(e) => JwtEncodingError::KeySource(e),
            KeySelectionError::Field(e) => JwtEncodingError::InvalidField(e),
        }
    }
}
