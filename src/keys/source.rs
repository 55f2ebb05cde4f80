// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key sources.
//!
//! A [`KeySource`] returns the candidate signing keys for a [`KeyMatcher`].
//! Calls are blocking; any retry or backoff is the source's business.

use std::path::PathBuf;
use std::sync::Arc;

use super::key::SigningKey;
use super::matcher::KeyMatcher;

/// A key source call failed.
#[derive(Debug, thiserror::Error)]
pub enum KeySourceError {
    #[error("key source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read key from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl KeySourceError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            KeySourceError::Unavailable(_) => "key_source_unavailable",
            KeySourceError::Io { .. } => "key_source_io",
            KeySourceError::Other(_) => "key_source_error",
        }
    }
}

/// Provider of candidate signing keys.
///
/// `context` is an opaque caller value passed through unchanged.
pub trait KeySource<C = ()>: Send + Sync {
    fn get(&self, matcher: &KeyMatcher, context: Option<&C>) -> Result<Vec<SigningKey>, KeySourceError>;
}

impl<C, T> KeySource<C> for Arc<T>
where
    T: KeySource<C> + ?Sized,
{
    fn get(&self, matcher: &KeyMatcher, context: Option<&C>) -> Result<Vec<SigningKey>, KeySourceError> {
        (**self).get(matcher, context)
    }
}

/// Fixed, in-memory set of signing keys.
#[derive(Debug, Clone, Default)]
pub struct ImmutableKeySet {
    keys: Arc<[SigningKey]>,
}

impl ImmutableKeySet {
    pub fn new(keys: impl IntoIterator<Item = SigningKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn keys(&self) -> &[SigningKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<SigningKey> for ImmutableKeySet {
    fn from(key: SigningKey) -> Self {
        Self::new([key])
    }
}

impl<C> KeySource<C> for ImmutableKeySet {
    fn get(&self, matcher: &KeyMatcher, _context: Option<&C>) -> Result<Vec<SigningKey>, KeySourceError> {
        Ok(matcher.select(self.keys.iter()))
    }
}
