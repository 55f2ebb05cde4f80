// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key selection.
//!
//! Exactly one key must match the header's algorithm. Zero matches and
//! multiple matches are both errors: choosing between several keys that fit
//! the same algorithm is never done implicitly.

use tracing::{debug, warn};

use crate::jose::{FieldError, JoseHeaderBuilder, JwsAlgorithm};

use super::key::SigningKey;
use super::matcher::KeyMatcher;
use super::source::{KeySource, KeySourceError};

/// Key selection failed.
#[derive(Debug, thiserror::Error)]
pub enum KeySelectionError {
    #[error("no signing key found for algorithm '{algorithm}'")]
    NoKeyFound { algorithm: JwsAlgorithm },

    #[error("found {count} signing keys for algorithm '{algorithm}'")]
    AmbiguousKey { algorithm: JwsAlgorithm, count: usize },

    #[error("key source failed: {0}")]
    Source(#[from] KeySourceError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Resolve the single key for `algorithm` and back-fill the header.
///
/// `kid` and `x5t#S256` are copied from the resolved key only when the header
/// does not set them already.
pub fn select_signing_key<C>(
    source: &dyn KeySource<C>,
    algorithm: JwsAlgorithm,
    header: &mut JoseHeaderBuilder,
    context: Option<&C>,
) -> Result<SigningKey, KeySelectionError> {
    let matcher = KeyMatcher::for_header(algorithm, header);
    let mut candidates = source.get(&matcher, context)?;

    let key = match candidates.len() {
        0 => {
            warn!(alg = %algorithm, kid = ?matcher.key_id(), "No signing key matched");
            return Err(KeySelectionError::NoKeyFound { algorithm });
        }
        1 => candidates.remove(0),
        count => {
            warn!(alg = %algorithm, count, "Multiple signing keys matched, refusing to choose");
            return Err(KeySelectionError::AmbiguousKey { algorithm, count });
        }
    };

    if header.get_key_id().is_none() {
        if let Some(kid) = key.key_id() {
            header.key_id(kid)?;
        }
    }
    if header.get_x509_sha256_thumbprint().is_none() {
        if let Some(thumbprint) = key.x509_sha256_thumbprint() {
            header.x509_sha256_thumbprint(thumbprint)?;
        }
    }

    debug!(
        alg = %algorithm,
        kid = ?key.key_id(),
        fingerprint = %key.fingerprint(),
        "Selected signing key"
    );
    Ok(key)
}
