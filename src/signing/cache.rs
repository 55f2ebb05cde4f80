// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signer cache keyed by key material.
//!
//! Signing keys are few and long-lived, so the cache is unbounded. Two
//! builds racing on a miss may both construct a signer; the last insert wins,
//! and both signers are equivalent. Failed constructions are not cached.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::keys::{KeyFingerprint, SigningKey};

use super::signer::{DefaultSignerFactory, JwsSigner, SignerError, SignerFactory};

/// Concurrent map from key fingerprint to its signer.
pub struct SignerCache {
    factory: Arc<dyn SignerFactory>,
    signers: DashMap<KeyFingerprint, Arc<JwsSigner>>,
}

impl SignerCache {
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultSignerFactory))
    }

    pub fn with_factory(factory: Arc<dyn SignerFactory>) -> Self {
        Self {
            factory,
            signers: DashMap::new(),
        }
    }

    /// Get the signer for `key`, constructing it on a miss.
    pub fn get_or_create(&self, key: &SigningKey) -> Result<Arc<JwsSigner>, SignerError> {
        let fingerprint = key.fingerprint();
        if let Some(signer) = self.signers.get(&fingerprint) {
            return Ok(Arc::clone(signer.value()));
        }

        // Constructed outside any shard lock
        let signer = Arc::new(self.factory.create_signer(key)?);
        self.signers.insert(fingerprint, Arc::clone(&signer));
        debug!(
            fingerprint = %fingerprint,
            key_type = %key.key_type(),
            cached = self.signers.len(),
            "Created signer"
        );
        Ok(signer)
    }

    pub fn contains(&self, key: &SigningKey) -> bool {
        self.signers.contains_key(&key.fingerprint())
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Drop every cached signer.
    pub fn clear(&self) {
        self.signers.clear();
    }
}

impl Default for SignerCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignerCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerCache")
            .field("len", &self.signers.len())
            .finish_non_exhaustive()
    }
}
