// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Signing Keys
//!
//! Key material, the filter used to pick a key for a header, the key source
//! contract and the single-key selection policy.

pub mod key;
pub mod matcher;
pub mod selector;
pub mod source;

pub use key::{KeyEncoding, KeyFingerprint, KeyUse, SigningKey};
pub use matcher::KeyMatcher;
pub use selector::{select_signing_key, KeySelectionError};
pub use source::{ImmutableKeySet, KeySource, KeySourceError};
