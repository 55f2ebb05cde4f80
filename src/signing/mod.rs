// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Signing
//!
//! Signers built from [`crate::keys::SigningKey`]s and the per-key signer cache.

pub mod cache;
pub mod signer;

pub use cache::SignerCache;
pub use signer::{DefaultSignerFactory, JwsSigner, SignerError, SignerFactory, MIN_HMAC_SECRET_LEN};
